use once_cell::sync::OnceCell;
use parking_lot::Mutex;

/// Engine-wide preset catalog shared by every equalizer instance.
///
/// Presets belong to the effect type, so the names are fetched once, by the
/// first discovery that sees a non-zero preset count, and never again.
#[derive(Debug, Default)]
pub struct PresetCatalog {
    count: Mutex<u16>,
    names: OnceCell<Vec<Option<String>>>,
}

impl PresetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last preset count reported by a discovery.
    pub fn count(&self) -> u16 {
        *self.count.lock()
    }

    pub(crate) fn set_count(&self, count: u16) {
        *self.count.lock() = count;
    }

    /// Preset names by index, `None` until the catalog has been populated.
    /// Individual slots are `None` when their query failed.
    pub fn names(&self) -> Option<&[Option<String>]> {
        self.names.get().map(Vec::as_slice)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names()?.get(index)?.as_deref()
    }

    pub fn is_populated(&self) -> bool {
        self.names.get().is_some()
    }

    /// Fill the name table with `count` entries from `fetch` unless it already
    /// exists. Concurrent callers block until the first one finishes.
    ///
    /// Returns `true` if this call populated the table.
    pub(crate) fn populate_once<F>(&self, count: u16, mut fetch: F) -> bool
    where
        F: FnMut(u16) -> Option<String>,
    {
        if self.is_populated() {
            return false;
        }
        let mut populated = false;
        self.names.get_or_init(|| {
            populated = true;
            (0..count).map(&mut fetch).collect()
        });
        populated
    }
}

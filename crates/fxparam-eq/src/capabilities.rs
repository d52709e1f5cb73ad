use serde::{Deserialize, Serialize};

/// Rarely-changing properties of one equalizer instance, filled in by
/// discovery. Fields whose query failed keep their zero default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualizerCapabilities {
    pub num_bands: u16,
    /// Lowest band level, in millibels.
    pub band_level_min: i32,
    /// Highest band level, in millibels.
    pub band_level_max: i32,
}

impl EqualizerCapabilities {
    pub fn level_range(&self) -> (i32, i32) {
        (self.band_level_min, self.band_level_max)
    }

    pub fn has_band(&self, band: u16) -> bool {
        band < self.num_bands
    }
}

/// Frequency layout of a single band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandInfo {
    pub band: u16,
    pub center_millihertz: i32,
    pub min_millihertz: i32,
    pub max_millihertz: i32,
}

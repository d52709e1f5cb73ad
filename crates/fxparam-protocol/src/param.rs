//! Equalizer parameter identifiers and the size table describing how each one
//! is laid out inside a [`ParamBuffer`](crate::ParamBuffer).

use std::fmt;
use std::mem::size_of;
use std::str::FromStr;

use thiserror::Error;
use tracing::error;

/// Maximum length of a string value (preset names), terminator included.
pub const EFFECT_STRING_LEN_MAX: usize = 64;

const SLOT: usize = size_of::<i32>();

/// Identifier of a queryable or settable equalizer attribute.
///
/// Raw values follow the equalizer protocol contract. Identifiers this crate
/// does not know about are carried as [`EqParam::Other`] so callers can still
/// forward them to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqParam {
    /// Number of frequency bands.
    NumBands,
    /// Minimum and maximum band level, in millibels.
    LevelRange,
    /// Level of one band, in millibels.
    BandLevel,
    /// Center frequency of one band, in millihertz.
    CenterFreq,
    /// Lower and upper frequency of one band, in millihertz.
    BandFreqRange,
    /// Band affecting a given frequency (millihertz).
    GetBand,
    /// Index of the preset currently in use.
    CurPreset,
    /// Number of presets the effect ships with.
    GetNumOfPresets,
    /// Name of one preset.
    GetPresetName,
    /// Identifier not covered by the size table.
    Other(i32),
}

impl EqParam {
    /// Every identifier with a documented layout.
    pub const KNOWN: [EqParam; 9] = [
        EqParam::NumBands,
        EqParam::LevelRange,
        EqParam::BandLevel,
        EqParam::CenterFreq,
        EqParam::BandFreqRange,
        EqParam::GetBand,
        EqParam::CurPreset,
        EqParam::GetNumOfPresets,
        EqParam::GetPresetName,
    ];

    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => EqParam::NumBands,
            1 => EqParam::LevelRange,
            2 => EqParam::BandLevel,
            3 => EqParam::CenterFreq,
            4 => EqParam::BandFreqRange,
            5 => EqParam::GetBand,
            6 => EqParam::CurPreset,
            7 => EqParam::GetNumOfPresets,
            8 => EqParam::GetPresetName,
            other => EqParam::Other(other),
        }
    }

    pub const fn raw(self) -> i32 {
        match self {
            EqParam::NumBands => 0,
            EqParam::LevelRange => 1,
            EqParam::BandLevel => 2,
            EqParam::CenterFreq => 3,
            EqParam::BandFreqRange => 4,
            EqParam::GetBand => 5,
            EqParam::CurPreset => 6,
            EqParam::GetNumOfPresets => 7,
            EqParam::GetPresetName => 8,
            EqParam::Other(raw) => raw,
        }
    }

    /// Whether the size table documents a layout for this identifier.
    ///
    /// An `Other` wrapping a known raw value is normalised first, so
    /// `Other(0)` counts as known.
    pub const fn is_known(self) -> bool {
        !matches!(EqParam::from_raw(self.raw()), EqParam::Other(_))
    }

    /// Header layout, without emitting diagnostics.
    pub const fn header_shape(self) -> HeaderShape {
        match EqParam::from_raw(self.raw()) {
            EqParam::NumBands
            | EqParam::LevelRange
            | EqParam::CurPreset
            | EqParam::GetNumOfPresets => HeaderShape::Single,
            EqParam::BandLevel
            | EqParam::CenterFreq
            | EqParam::BandFreqRange
            | EqParam::GetBand
            | EqParam::GetPresetName
            | EqParam::Other(_) => HeaderShape::Indexed,
        }
    }

    /// Value layout, without emitting diagnostics.
    pub const fn value_shape(self) -> ValueShape {
        match EqParam::from_raw(self.raw()) {
            EqParam::NumBands | EqParam::CurPreset | EqParam::GetNumOfPresets => {
                ValueShape::Short
            }
            EqParam::BandLevel | EqParam::GetBand | EqParam::CenterFreq | EqParam::Other(_) => {
                ValueShape::Int
            }
            EqParam::LevelRange | EqParam::BandFreqRange => ValueShape::Pair,
            EqParam::GetPresetName => ValueShape::String,
        }
    }

    fn name(self) -> Option<&'static str> {
        let name = match EqParam::from_raw(self.raw()) {
            EqParam::NumBands => "num-bands",
            EqParam::LevelRange => "level-range",
            EqParam::BandLevel => "band-level",
            EqParam::CenterFreq => "center-freq",
            EqParam::BandFreqRange => "band-freq-range",
            EqParam::GetBand => "get-band",
            EqParam::CurPreset => "cur-preset",
            EqParam::GetNumOfPresets => "num-presets",
            EqParam::GetPresetName => "preset-name",
            EqParam::Other(_) => return None,
        };
        Some(name)
    }
}

impl From<i32> for EqParam {
    fn from(raw: i32) -> Self {
        EqParam::from_raw(raw)
    }
}

impl From<EqParam> for i32 {
    fn from(param: EqParam) -> Self {
        param.raw()
    }
}

impl fmt::Display for EqParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "param#{}", self.raw()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised equalizer parameter '{0}'")]
pub struct ParseParamError(String);

impl FromStr for EqParam {
    type Err = ParseParamError;

    /// Accepts the kebab-case names used by `Display` or a raw integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<i32>() {
            return Ok(EqParam::from_raw(raw));
        }
        EqParam::KNOWN
            .iter()
            .copied()
            .find(|param| param.name() == Some(trimmed))
            .ok_or_else(|| ParseParamError(trimmed.to_owned()))
    }
}

/// Layout of the parameter-identification header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderShape {
    /// The identifier alone.
    Single,
    /// The identifier followed by a secondary index (band, preset, frequency).
    Indexed,
}

impl HeaderShape {
    pub const fn size(self) -> usize {
        match self {
            HeaderShape::Single => SLOT,
            HeaderShape::Indexed => 2 * SLOT,
        }
    }
}

/// Layout of the value region following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// 16-bit integer (counts, preset index).
    Short,
    /// Single 32-bit integer.
    Int,
    /// Two 32-bit integers, usually a `[min, max]` range.
    Pair,
    /// NUL-terminated string of at most [`EFFECT_STRING_LEN_MAX`] bytes.
    String,
}

impl ValueShape {
    pub const fn size(self) -> usize {
        match self {
            ValueShape::Short => size_of::<i16>(),
            ValueShape::Int => SLOT,
            ValueShape::Pair => 2 * SLOT,
            ValueShape::String => EFFECT_STRING_LEN_MAX,
        }
    }
}

/// Size in bytes of the header for `param`.
///
/// Unknown identifiers get the two-slot layout and an error diagnostic; the
/// engine decides whether the identifier is actually valid.
pub fn header_size(param: EqParam) -> usize {
    if !param.is_known() {
        error!(param = param.raw(), "trying to use an unknown EQ parameter");
    }
    param.header_shape().size()
}

/// Size in bytes of the value for `param`.
///
/// Unknown identifiers get a single 32-bit value and an error diagnostic.
pub fn value_size(param: EqParam) -> usize {
    if !param.is_known() {
        error!(param = param.raw(), "trying to access an unknown EQ parameter");
    }
    param.value_shape().size()
}

const fn max_layout_size() -> usize {
    let mut header = HeaderShape::Indexed.size();
    let mut value = EqParam::Other(-1).value_shape().size();
    let mut i = 0;
    while i < EqParam::KNOWN.len() {
        let param = EqParam::KNOWN[i];
        if param.header_shape().size() > header {
            header = param.header_shape().size();
        }
        if param.value_shape().size() > value {
            value = param.value_shape().size();
        }
        i += 1;
    }
    header + value
}

/// Capacity of the header plus value region, derived from the worst case of
/// the size table.
pub const PARAM_DATA_CAPACITY: usize = max_layout_size();

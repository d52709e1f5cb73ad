//! JSON description of a simulated equalizer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// Frequency layout of one simulated band, in millihertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandProfile {
    pub center: i32,
    pub min: i32,
    pub max: i32,
}

impl BandProfile {
    pub const fn new(min: i32, center: i32, max: i32) -> Self {
        Self { center, min, max }
    }

    pub fn contains(&self, millihertz: i32) -> bool {
        (self.min..=self.max).contains(&millihertz)
    }
}

/// Where an injected fault is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultStage {
    /// The transport call itself fails.
    Transport,
    /// The call succeeds but the engine writes a failure into the buffer.
    #[default]
    Engine,
}

/// Fail every call for `param` (optionally only for one secondary index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRule {
    pub param: i32,
    #[serde(default)]
    pub index: Option<i32>,
    pub status: i32,
    #[serde(default)]
    pub stage: FaultStage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerProfile {
    pub bands: Vec<BandProfile>,
    /// Lowest band level, in millibels.
    pub level_min: i32,
    /// Highest band level, in millibels.
    pub level_max: i32,
    pub presets: Vec<String>,
    pub current_preset: i16,
    /// Status returned by the init check.
    pub init_status: i32,
    pub faults: Vec<FaultRule>,
}

impl Default for EqualizerProfile {
    /// Five-band reference equalizer.
    fn default() -> Self {
        Self {
            bands: vec![
                BandProfile::new(30_000, 60_000, 120_000),
                BandProfile::new(120_001, 230_000, 460_000),
                BandProfile::new(460_001, 910_000, 1_800_000),
                BandProfile::new(1_800_001, 3_600_000, 7_000_000),
                BandProfile::new(7_000_001, 14_000_000, 20_000_000),
            ],
            level_min: -1500,
            level_max: 1500,
            presets: [
                "Normal",
                "Classical",
                "Dance",
                "Flat",
                "Folk",
                "Heavy Metal",
                "Hip Hop",
                "Jazz",
                "Pop",
                "Rock",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            current_preset: 0,
            init_status: 0,
            faults: Vec::new(),
        }
    }
}

impl EqualizerProfile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Self =
            serde_json::from_str(&contents).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.level_min > self.level_max {
            return Err(ProfileError::Invalid(format!(
                "level_min {} exceeds level_max {}",
                self.level_min, self.level_max
            )));
        }
        if self.bands.len() > usize::from(u16::MAX) {
            return Err(ProfileError::Invalid(format!(
                "{} bands do not fit a 16-bit count",
                self.bands.len()
            )));
        }
        if self.presets.len() > usize::from(u16::MAX) {
            return Err(ProfileError::Invalid(format!(
                "{} presets do not fit a 16-bit count",
                self.presets.len()
            )));
        }
        if let Some(band) = self
            .bands
            .iter()
            .position(|band| !(band.min <= band.center && band.center <= band.max))
        {
            return Err(ProfileError::Invalid(format!(
                "band {band} center lies outside its range"
            )));
        }
        Ok(())
    }
}

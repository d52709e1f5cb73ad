//! Equalizer capability discovery on top of the `fxparam-protocol` transport.
//!
//! [`discover`] attaches an equalizer to an audio session, queries its band
//! count, level range and presets, and caches them: per instance in
//! [`EqualizerCapabilities`], engine-wide in a [`PresetCatalog`].

pub mod capabilities;
pub mod catalog;
pub mod discovery;
pub mod equalizer;
pub mod profile;
pub mod simulated;

pub use capabilities::{BandInfo, EqualizerCapabilities};
pub use catalog::PresetCatalog;
pub use discovery::{discover, rediscover, DiscoveryError};
pub use equalizer::{EqError, Equalizer};
pub use profile::{BandProfile, EqualizerProfile, FaultRule, FaultStage, ProfileError};
pub use simulated::{Direction, RecordedCall, SimulatedEqualizer, SimulatedFactory};

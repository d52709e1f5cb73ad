use fxparam_protocol::{
    get_i16, get_i32, get_pair, get_string, set_i16, set_i32, ControlStatus, EffectDescriptor,
    EffectEngine, EqParam, ParamError, SessionId, Status,
};
use thiserror::Error;
use tracing::debug;

use crate::capabilities::{BandInfo, EqualizerCapabilities};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EqError {
    #[error("band {band} out of range (equalizer has {num_bands} bands)")]
    BandOutOfRange { band: u16, num_bands: u16 },
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("engine refused to change enabled state: {0}")]
    Enable(Status),
}

impl EqError {
    /// Whether the failure means the effect session must be recreated.
    pub fn control_status(&self) -> ControlStatus {
        match self {
            EqError::BandOutOfRange { .. } => ControlStatus::Ok,
            EqError::Param(err) => err.control_status(),
            EqError::Enable(status) => fxparam_protocol::classify(*status),
        }
    }
}

/// An attached equalizer instance together with its discovered capabilities.
pub struct Equalizer<E> {
    engine: E,
    descriptor: EffectDescriptor,
    session: SessionId,
    pub(crate) capabilities: EqualizerCapabilities,
}

impl<E: EffectEngine> Equalizer<E> {
    pub(crate) fn new(engine: E, descriptor: EffectDescriptor, session: SessionId) -> Self {
        Self {
            engine,
            descriptor,
            session,
            capabilities: EqualizerCapabilities::default(),
        }
    }

    pub fn capabilities(&self) -> &EqualizerCapabilities {
        &self.capabilities
    }

    pub fn descriptor(&self) -> &EffectDescriptor {
        &self.descriptor
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn check_band(&self, band: u16) -> Result<i32, EqError> {
        if self.capabilities.has_band(band) {
            Ok(i32::from(band))
        } else {
            Err(EqError::BandOutOfRange {
                band,
                num_bands: self.capabilities.num_bands,
            })
        }
    }

    /// Level of `band`, in millibels.
    pub fn band_level(&mut self, band: u16) -> Result<i32, EqError> {
        let index = self.check_band(band)?;
        Ok(get_i32(&mut self.engine, EqParam::BandLevel, index)?)
    }

    pub fn set_band_level(&mut self, band: u16, level: i32) -> Result<(), EqError> {
        let index = self.check_band(band)?;
        debug!(band, level, "setting band level");
        Ok(set_i32(&mut self.engine, EqParam::BandLevel, index, level)?)
    }

    /// Center frequency of `band`, in millihertz.
    pub fn center_freq(&mut self, band: u16) -> Result<i32, EqError> {
        let index = self.check_band(band)?;
        Ok(get_i32(&mut self.engine, EqParam::CenterFreq, index)?)
    }

    /// `(min, max)` frequency of `band`, in millihertz.
    pub fn band_freq_range(&mut self, band: u16) -> Result<(i32, i32), EqError> {
        let index = self.check_band(band)?;
        Ok(get_pair(&mut self.engine, EqParam::BandFreqRange, index)?)
    }

    /// Band that most affects `millihertz`.
    pub fn band_for_frequency(&mut self, millihertz: i32) -> Result<u16, EqError> {
        let band = get_i32(&mut self.engine, EqParam::GetBand, millihertz)?;
        Ok(band.clamp(0, i32::from(u16::MAX)) as u16)
    }

    pub fn current_preset(&mut self) -> Result<i16, EqError> {
        Ok(get_i16(&mut self.engine, EqParam::CurPreset, 0)?)
    }

    pub fn use_preset(&mut self, preset: i16) -> Result<(), EqError> {
        debug!(preset, "switching preset");
        Ok(set_i16(&mut self.engine, EqParam::CurPreset, 0, preset)?)
    }

    /// Name of preset `index`, straight from the engine.
    pub fn preset_name(&mut self, index: u16) -> Result<String, EqError> {
        Ok(get_string(
            &mut self.engine,
            EqParam::GetPresetName,
            i32::from(index),
        )?)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), EqError> {
        let status = self.engine.set_enabled(enabled);
        if status.is_ok() {
            Ok(())
        } else {
            Err(EqError::Enable(status))
        }
    }

    /// Frequency layout of every band. Bands whose queries fail are skipped.
    pub fn describe_bands(&mut self) -> Vec<BandInfo> {
        let mut bands = Vec::with_capacity(usize::from(self.capabilities.num_bands));
        for band in 0..self.capabilities.num_bands {
            let center = self.center_freq(band);
            let range = self.band_freq_range(band);
            match (center, range) {
                (Ok(center), Ok((min, max))) => {
                    debug!(band, min, center, max, "band layout");
                    bands.push(BandInfo {
                        band,
                        center_millihertz: center,
                        min_millihertz: min,
                        max_millihertz: max,
                    });
                }
                (Err(err), _) | (_, Err(err)) => {
                    debug!(band, %err, "skipping band");
                }
            }
        }
        bands
    }
}

impl<E> std::fmt::Debug for Equalizer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Equalizer")
            .field("descriptor", &self.descriptor)
            .field("session", &self.session)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

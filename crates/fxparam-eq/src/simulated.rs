//! In-process equalizer engine answering parameter buffers from a profile.
//!
//! Used by the command line front end and the tests in place of a real
//! effect engine.

use fxparam_protocol::{
    EffectDescriptor, EffectEngine, EffectFactory, EqParam, ParamBuffer, SessionId, Status,
};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::profile::{EqualizerProfile, FaultStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Get,
    Set,
}

/// One parameter call as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedCall {
    pub direction: Direction,
    pub param: EqParam,
    pub secondary: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SimulatedEqualizer {
    profile: EqualizerProfile,
    session: SessionId,
    init_status: Status,
    levels: Vec<i32>,
    current_preset: i16,
    enabled: bool,
    alive: bool,
    calls: Vec<RecordedCall>,
}

impl SimulatedEqualizer {
    pub fn new(profile: EqualizerProfile, session: SessionId) -> Self {
        let levels = vec![0; profile.bands.len()];
        Self {
            init_status: Status(profile.init_status),
            current_preset: profile.current_preset,
            profile,
            session,
            levels,
            enabled: false,
            alive: true,
            calls: Vec::new(),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Number of calls made for `param`, in either direction.
    pub fn call_count(&self, param: EqParam) -> usize {
        self.calls.iter().filter(|call| call.param == param).count()
    }

    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Tear the instance down; every later call reports `DEAD_OBJECT`.
    pub fn release(&mut self) {
        debug!(session = %self.session, "releasing simulated equalizer");
        self.alive = false;
    }

    fn record(&mut self, direction: Direction, buffer: &ParamBuffer) {
        self.calls.push(RecordedCall {
            direction,
            param: buffer.param(),
            secondary: buffer.secondary(),
        });
    }

    fn fault(&self, buffer: &ParamBuffer, stage: FaultStage) -> Option<Status> {
        let raw = buffer.param().raw();
        let secondary = buffer.secondary();
        self.profile
            .faults
            .iter()
            .find(|rule| {
                rule.stage == stage
                    && rule.param == raw
                    && rule.index.map_or(true, |index| Some(index) == secondary)
            })
            .map(|rule| Status(rule.status))
    }

    /// Transport-level outcome, before the buffer is looked at.
    fn gate(&self, buffer: &ParamBuffer) -> Status {
        if !self.alive {
            return Status::DEAD_OBJECT;
        }
        if !self.init_status.is_ok() {
            return Status::NO_INIT;
        }
        self.fault(buffer, FaultStage::Transport)
            .unwrap_or(Status::OK)
    }

    fn band(&self, buffer: &ParamBuffer) -> Option<usize> {
        let band = usize::try_from(buffer.secondary()?).ok()?;
        (band < self.profile.bands.len()).then_some(band)
    }

    fn band_for_frequency(&self, millihertz: i32) -> i32 {
        let bands = &self.profile.bands;
        let index = bands
            .iter()
            .position(|band| band.contains(millihertz))
            .or_else(|| {
                bands
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, band)| (i64::from(band.center) - i64::from(millihertz)).abs())
                    .map(|(index, _)| index)
            })
            .unwrap_or(0);
        index as i32
    }

    fn answer_get(&self, buffer: &mut ParamBuffer) -> Status {
        let param = buffer.param();
        if !param.is_known() || buffer.header_size() != param.header_shape().size() {
            return Status::BAD_VALUE;
        }
        match param {
            EqParam::NumBands => buffer.put_u16(self.profile.bands.len() as u16),
            EqParam::LevelRange => buffer.put_pair(self.profile.level_min, self.profile.level_max),
            EqParam::BandLevel => match self.band(buffer) {
                Some(band) => buffer.put_i32(self.levels[band]),
                None => return Status::BAD_VALUE,
            },
            EqParam::CenterFreq => match self.band(buffer) {
                Some(band) => buffer.put_i32(self.profile.bands[band].center),
                None => return Status::BAD_VALUE,
            },
            EqParam::BandFreqRange => match self.band(buffer) {
                Some(band) => {
                    let band = self.profile.bands[band];
                    buffer.put_pair(band.min, band.max);
                }
                None => return Status::BAD_VALUE,
            },
            EqParam::GetBand => {
                let frequency = buffer.secondary().unwrap_or_default();
                buffer.put_i32(self.band_for_frequency(frequency));
            }
            EqParam::CurPreset => buffer.put_i16(self.current_preset),
            EqParam::GetNumOfPresets => buffer.put_u16(self.profile.presets.len() as u16),
            EqParam::GetPresetName => {
                let name = buffer
                    .secondary()
                    .and_then(|index| usize::try_from(index).ok())
                    .and_then(|index| self.profile.presets.get(index));
                match name {
                    Some(name) => buffer.put_string(name),
                    None => return Status::BAD_VALUE,
                }
            }
            EqParam::Other(_) => return Status::BAD_VALUE,
        }
        Status::OK
    }

    fn answer_set(&mut self, buffer: &ParamBuffer) -> Status {
        let param = buffer.param();
        if buffer.header_size() != param.header_shape().size() {
            return Status::BAD_VALUE;
        }
        match param {
            EqParam::BandLevel => {
                let Some(band) = self.band(buffer) else {
                    return Status::BAD_VALUE;
                };
                let level = buffer.decode_i32();
                if !(self.profile.level_min..=self.profile.level_max).contains(&level) {
                    return Status::BAD_VALUE;
                }
                self.levels[band] = level;
            }
            EqParam::CurPreset => {
                let preset = buffer.decode_i16();
                let valid = usize::try_from(preset)
                    .map(|index| index < self.profile.presets.len())
                    .unwrap_or(false);
                if !valid {
                    return Status::BAD_VALUE;
                }
                self.current_preset = preset;
            }
            _ => return Status::BAD_VALUE,
        }
        Status::OK
    }
}

impl EffectEngine for SimulatedEqualizer {
    fn init_check(&self) -> Status {
        self.init_status
    }

    fn get_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        self.record(Direction::Get, buffer);
        let status = self.gate(buffer);
        if !status.is_ok() {
            return status;
        }
        let reply = self
            .fault(buffer, FaultStage::Engine)
            .unwrap_or_else(|| self.answer_get(buffer));
        trace!(param = %buffer.param(), %reply, "simulated get");
        buffer.set_status(reply);
        Status::OK
    }

    fn set_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        self.record(Direction::Set, buffer);
        let status = self.gate(buffer);
        if !status.is_ok() {
            return status;
        }
        let reply = match self.fault(buffer, FaultStage::Engine) {
            Some(status) => status,
            None => self.answer_set(buffer),
        };
        trace!(param = %buffer.param(), %reply, "simulated set");
        buffer.set_status(reply);
        Status::OK
    }

    fn set_enabled(&mut self, enabled: bool) -> Status {
        if !self.alive {
            return Status::DEAD_OBJECT;
        }
        if !self.init_status.is_ok() {
            return Status::NO_INIT;
        }
        self.enabled = enabled;
        Status::OK
    }
}

/// Creates [`SimulatedEqualizer`] instances from a shared profile.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFactory {
    profile: EqualizerProfile,
}

impl SimulatedFactory {
    pub const IMPLEMENTATION_ID: Uuid = Uuid::from_u128(0x8f6c_3a40_9e11_4c2b_a0d7_51f3_2e6b_9c01);

    pub fn new(profile: EqualizerProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &EqualizerProfile {
        &self.profile
    }

    pub fn descriptor() -> EffectDescriptor {
        EffectDescriptor::equalizer(Self::IMPLEMENTATION_ID)
    }
}

impl EffectFactory for SimulatedFactory {
    type Engine = SimulatedEqualizer;

    fn create_effect(&self, descriptor: &EffectDescriptor, session: SessionId) -> Self::Engine {
        let mut engine = SimulatedEqualizer::new(self.profile.clone(), session);
        if *descriptor != Self::descriptor() {
            debug!(?descriptor, "no simulated implementation for descriptor");
            engine.init_status = Status::NAME_NOT_FOUND;
        }
        engine
    }
}

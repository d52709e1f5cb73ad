//! Adapter between typed parameter requests and the engine's generic
//! get/set primitive.

use std::fmt;

use thiserror::Error;
use tracing::trace;
use uuid::Uuid;

use crate::buffer::{ParamBuffer, ParamValue};
use crate::param::{EqParam, ValueShape};
use crate::status::{classify, ControlStatus, Status};

/// Audio session an effect instance is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionId(pub i32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.0)
    }
}

/// Identifies which effect to instantiate: its type and the implementation
/// providing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDescriptor {
    pub type_id: Uuid,
    pub implementation_id: Uuid,
}

impl EffectDescriptor {
    /// Effect type shared by every equalizer implementation.
    pub const EQUALIZER_TYPE: Uuid = Uuid::from_u128(0x0bed4300_ddd6_11db_8f34_0002a5d5c51b);

    pub const fn new(type_id: Uuid, implementation_id: Uuid) -> Self {
        Self {
            type_id,
            implementation_id,
        }
    }

    /// Equalizer descriptor for the given implementation.
    pub const fn equalizer(implementation_id: Uuid) -> Self {
        Self::new(Self::EQUALIZER_TYPE, implementation_id)
    }
}

/// Handle to one effect instance inside the engine.
///
/// Every method returns the transport status. For parameter calls the engine
/// additionally writes its per-call status into the buffer.
pub trait EffectEngine {
    /// Outcome of instance construction.
    fn init_check(&self) -> Status;
    fn get_parameter(&mut self, buffer: &mut ParamBuffer) -> Status;
    fn set_parameter(&mut self, buffer: &mut ParamBuffer) -> Status;
    fn set_enabled(&mut self, enabled: bool) -> Status;
}

impl<E: EffectEngine + ?Sized> EffectEngine for Box<E> {
    fn init_check(&self) -> Status {
        (**self).init_check()
    }

    fn get_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        (**self).get_parameter(buffer)
    }

    fn set_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        (**self).set_parameter(buffer)
    }

    fn set_enabled(&mut self, enabled: bool) -> Status {
        (**self).set_enabled(enabled)
    }
}

/// Creates effect instances. Construction itself never fails; problems are
/// reported through [`EffectEngine::init_check`].
pub trait EffectFactory {
    type Engine: EffectEngine;

    fn create_effect(&self, descriptor: &EffectDescriptor, session: SessionId) -> Self::Engine;
}

/// Failure of a parameter round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The engine call itself could not be performed.
    #[error("transport failed for {param}: {status}")]
    Transport { param: EqParam, status: Status },
    /// The call reached the engine but it could not service the parameter.
    #[error("engine rejected {param}: {status}")]
    Engine { param: EqParam, status: Status },
    /// A typed accessor was used with an identifier of another value shape.
    /// Nothing was sent to the engine.
    #[error("{param} carries a {actual:?} value, not {requested:?}")]
    Shape {
        param: EqParam,
        requested: ValueShape,
        actual: ValueShape,
    },
}

impl ParamError {
    pub fn param(&self) -> EqParam {
        match self {
            ParamError::Transport { param, .. }
            | ParamError::Engine { param, .. }
            | ParamError::Shape { param, .. } => *param,
        }
    }

    /// The flattened native status. Shape mismatches report `BAD_VALUE`.
    pub fn status(&self) -> Status {
        match self {
            ParamError::Transport { status, .. } | ParamError::Engine { status, .. } => *status,
            ParamError::Shape { .. } => Status::BAD_VALUE,
        }
    }

    pub fn control_status(&self) -> ControlStatus {
        classify(self.status())
    }
}

/// Send a prepared read request and check both status levels.
///
/// On success the reply is left in `buffer` for decoding.
pub fn fetch<E: EffectEngine + ?Sized>(
    engine: &mut E,
    buffer: &mut ParamBuffer,
) -> Result<(), ParamError> {
    let param = buffer.param();
    trace!(%param, secondary = ?buffer.secondary(), "get parameter");
    let status = engine.get_parameter(buffer);
    check(param, status, buffer)
}

/// Send a prepared write request and check both status levels.
pub fn store<E: EffectEngine + ?Sized>(
    engine: &mut E,
    buffer: &mut ParamBuffer,
) -> Result<(), ParamError> {
    let param = buffer.param();
    trace!(%param, secondary = ?buffer.secondary(), "set parameter");
    let status = engine.set_parameter(buffer);
    check(param, status, buffer)
}

fn check(param: EqParam, status: Status, buffer: &ParamBuffer) -> Result<(), ParamError> {
    if !status.is_ok() {
        return Err(ParamError::Transport { param, status });
    }
    let status = buffer.status();
    if !status.is_ok() {
        return Err(ParamError::Engine { param, status });
    }
    Ok(())
}

/// Read `param` and copy its raw value into `out`.
///
/// `out` is left untouched on failure.
///
/// # Panics
///
/// Panics if `out` is shorter than the identifier's value size.
pub fn get_parameter<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
    out: &mut [u8],
) -> Result<(), ParamError> {
    let mut buffer = ParamBuffer::query(param, secondary);
    fetch(engine, &mut buffer)?;
    buffer.decode_value(out);
    Ok(())
}

/// Write the raw bytes of `value` to `param`.
pub fn set_parameter<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
    value: &[u8],
) -> Result<(), ParamError> {
    let mut buffer = ParamBuffer::update(param, secondary, value);
    store(engine, &mut buffer)
}

fn expect_shape(param: EqParam, requested: ValueShape) -> Result<(), ParamError> {
    let actual = param.value_shape();
    if actual == requested {
        Ok(())
    } else {
        Err(ParamError::Shape {
            param,
            requested,
            actual,
        })
    }
}

fn query_shaped<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
    shape: ValueShape,
) -> Result<ParamBuffer, ParamError> {
    expect_shape(param, shape)?;
    query(engine, param, secondary)
}

fn query<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<ParamBuffer, ParamError> {
    let mut buffer = ParamBuffer::query(param, secondary);
    fetch(engine, &mut buffer)?;
    Ok(buffer)
}

pub fn get_i16<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<i16, ParamError> {
    query_shaped(engine, param, secondary, ValueShape::Short).map(|buffer| buffer.decode_i16())
}

/// Read a 16-bit count.
pub fn get_u16<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<u16, ParamError> {
    query_shaped(engine, param, secondary, ValueShape::Short).map(|buffer| buffer.decode_u16())
}

pub fn get_i32<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<i32, ParamError> {
    query_shaped(engine, param, secondary, ValueShape::Int).map(|buffer| buffer.decode_i32())
}

pub fn get_pair<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<(i32, i32), ParamError> {
    query_shaped(engine, param, secondary, ValueShape::Pair).map(|buffer| buffer.decode_pair())
}

pub fn get_string<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<String, ParamError> {
    query_shaped(engine, param, secondary, ValueShape::String)
        .map(|buffer| buffer.decode_string())
}

/// Read `param` and decode it according to its value shape.
pub fn get_value<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
) -> Result<ParamValue, ParamError> {
    query(engine, param, secondary).map(|buffer| buffer.decode())
}

pub fn set_i16<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
    value: i16,
) -> Result<(), ParamError> {
    expect_shape(param, ValueShape::Short)?;
    set_parameter(engine, param, secondary, &value.to_ne_bytes())
}

pub fn set_i32<E: EffectEngine + ?Sized>(
    engine: &mut E,
    param: EqParam,
    secondary: i32,
    value: i32,
) -> Result<(), ParamError> {
    expect_shape(param, ValueShape::Int)?;
    set_parameter(engine, param, secondary, &value.to_ne_bytes())
}

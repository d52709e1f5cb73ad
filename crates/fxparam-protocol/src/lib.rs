//! Parameter marshalling for hosted audio effects.
//!
//! Typed equalizer get/set requests are packed into a fixed-capacity
//! [`ParamBuffer`], handed to an [`EffectEngine`], and the engine's two-level
//! status (transport, then per-call) is flattened into a [`ParamError`].

pub mod buffer;
pub mod param;
pub mod status;
pub mod transport;

pub use buffer::{ParamBuffer, ParamValue};
pub use param::{
    header_size, value_size, EqParam, HeaderShape, ParseParamError, ValueShape,
    EFFECT_STRING_LEN_MAX, PARAM_DATA_CAPACITY,
};
pub use status::{classify, ControlStatus, Status};
pub use transport::{
    fetch, get_i16, get_i32, get_pair, get_parameter, get_string, get_u16, get_value, set_i16,
    set_i32, set_parameter, store, EffectDescriptor, EffectEngine, EffectFactory, ParamError,
    SessionId,
};

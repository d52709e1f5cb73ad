//! Fixed-capacity parameter block exchanged with the effect engine.
//!
//! Layout of the data region: `[param id][secondary index?][value]`. Header
//! and value sizes come from the size table in [`crate::param`].

use std::fmt;
use std::mem::size_of;

use crate::param::{
    header_size, value_size, EqParam, HeaderShape, ValueShape, PARAM_DATA_CAPACITY,
};
use crate::status::Status;

const SLOT: usize = size_of::<i32>();

/// One parameter request or reply.
///
/// Built immediately before a transport call and dropped right after it, or
/// reused as caller-owned scratch through the `reset_*` methods.
#[derive(Clone, PartialEq, Eq)]
pub struct ParamBuffer {
    status: Status,
    psize: u32,
    vsize: u32,
    data: [u8; PARAM_DATA_CAPACITY],
}

impl ParamBuffer {
    /// Buffer for reading `param`. The value region is left zeroed.
    ///
    /// `secondary` is only written for identifiers with an indexed header and
    /// is ignored otherwise.
    pub fn query(param: EqParam, secondary: i32) -> Self {
        let mut buffer = Self::empty();
        buffer.reset_query(param, secondary);
        buffer
    }

    /// Buffer for writing `param`, with `value` copied into the value region.
    ///
    /// `value` is bounded to the declared value size; shorter input leaves the
    /// tail zeroed.
    pub fn update(param: EqParam, secondary: i32, value: &[u8]) -> Self {
        let mut buffer = Self::empty();
        buffer.reset_update(param, secondary, value);
        buffer
    }

    fn empty() -> Self {
        Self {
            status: Status::OK,
            psize: 0,
            vsize: 0,
            data: [0; PARAM_DATA_CAPACITY],
        }
    }

    pub fn reset_query(&mut self, param: EqParam, secondary: i32) {
        self.status = Status::OK;
        self.data.fill(0);
        let psize = header_size(param);
        self.data[..SLOT].copy_from_slice(&param.raw().to_ne_bytes());
        if psize == HeaderShape::Indexed.size() {
            self.data[SLOT..2 * SLOT].copy_from_slice(&secondary.to_ne_bytes());
        }
        self.psize = psize as u32;
        self.vsize = value_size(param) as u32;
    }

    pub fn reset_update(&mut self, param: EqParam, secondary: i32, value: &[u8]) {
        self.reset_query(param, secondary);
        let region = self.value_mut();
        let len = value.len().min(region.len());
        region[..len].copy_from_slice(&value[..len]);
    }

    /// Identifier stored in the first header slot.
    pub fn param(&self) -> EqParam {
        EqParam::from_raw(self.slot(0))
    }

    /// Secondary index, present only for two-slot headers.
    pub fn secondary(&self) -> Option<i32> {
        (self.header_size() == HeaderShape::Indexed.size()).then(|| self.slot(1))
    }

    fn slot(&self, index: usize) -> i32 {
        let start = index * SLOT;
        let mut raw = [0u8; SLOT];
        raw.copy_from_slice(&self.data[start..start + SLOT]);
        i32::from_ne_bytes(raw)
    }

    pub fn header_size(&self) -> usize {
        self.psize as usize
    }

    pub fn value_size(&self) -> usize {
        self.vsize as usize
    }

    /// Per-call status written by the engine.
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Bytes of the header region.
    pub fn header(&self) -> &[u8] {
        &self.data[..self.header_size()]
    }

    /// Bytes of the value region.
    pub fn value(&self) -> &[u8] {
        let start = self.header_size();
        &self.data[start..start + self.value_size()]
    }

    pub fn value_mut(&mut self) -> &mut [u8] {
        let start = self.header_size();
        let end = start + self.value_size();
        &mut self.data[start..end]
    }

    /// Copy the value region into `out`.
    ///
    /// Only meaningful once the engine reported success. The caller sizes
    /// `out` for the identifier; bytes past the value size are left alone.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than [`value_size`](Self::value_size).
    pub fn decode_value(&self, out: &mut [u8]) {
        debug_assert!(self.status.is_ok(), "decoding a failed parameter reply");
        let value = self.value();
        out[..value.len()].copy_from_slice(value);
    }

    /// Value bytes zero-extended or truncated to `N` bytes.
    fn value_prefix<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut raw = [0u8; N];
        let value = self.value();
        let start = offset.min(value.len());
        let len = (value.len() - start).min(N);
        raw[..len].copy_from_slice(&value[start..start + len]);
        raw
    }

    pub fn decode_i16(&self) -> i16 {
        i16::from_ne_bytes(self.value_prefix(0))
    }

    /// 16-bit counts are unsigned on the wire.
    pub fn decode_u16(&self) -> u16 {
        u16::from_ne_bytes(self.value_prefix(0))
    }

    pub fn decode_i32(&self) -> i32 {
        i32::from_ne_bytes(self.value_prefix(0))
    }

    pub fn decode_pair(&self) -> (i32, i32) {
        (
            i32::from_ne_bytes(self.value_prefix(0)),
            i32::from_ne_bytes(self.value_prefix(SLOT)),
        )
    }

    /// String value up to the first NUL, lossily converted to UTF-8.
    pub fn decode_string(&self) -> String {
        let value = self.value();
        let end = value.iter().position(|&b| b == 0).unwrap_or(value.len());
        String::from_utf8_lossy(&value[..end]).into_owned()
    }

    /// Decode the value region according to the identifier's value shape.
    pub fn decode(&self) -> ParamValue {
        match self.param().value_shape() {
            ValueShape::Short => ParamValue::Short(self.decode_i16()),
            ValueShape::Int => ParamValue::Int(self.decode_i32()),
            ValueShape::Pair => {
                let (first, second) = self.decode_pair();
                ParamValue::Pair(first, second)
            }
            ValueShape::String => ParamValue::Text(self.decode_string()),
        }
    }

    pub fn put_i16(&mut self, value: i16) {
        self.value_mut()[..2].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn put_u16(&mut self, value: u16) {
        self.value_mut()[..2].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn put_i32(&mut self, value: i32) {
        self.value_mut()[..SLOT].copy_from_slice(&value.to_ne_bytes());
    }

    pub fn put_pair(&mut self, first: i32, second: i32) {
        let region = self.value_mut();
        region[..SLOT].copy_from_slice(&first.to_ne_bytes());
        region[SLOT..2 * SLOT].copy_from_slice(&second.to_ne_bytes());
    }

    /// Store `text` NUL-terminated, truncated to fit the value region.
    pub fn put_string(&mut self, text: &str) {
        let region = self.value_mut();
        region.fill(0);
        let len = text.len().min(region.len().saturating_sub(1));
        region[..len].copy_from_slice(&text.as_bytes()[..len]);
    }
}

impl fmt::Debug for ParamBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamBuffer")
            .field("status", &self.status)
            .field("param", &self.param())
            .field("secondary", &self.secondary())
            .field("psize", &self.psize)
            .field("vsize", &self.vsize)
            .finish()
    }
}

/// Typed view of a decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Short(i16),
    Int(i32),
    Pair(i32, i32),
    Text(String),
}

impl ParamValue {
    /// Native-endian bytes laid out for a set request.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ParamValue::Short(value) => value.to_ne_bytes().to_vec(),
            ParamValue::Int(value) => value.to_ne_bytes().to_vec(),
            ParamValue::Pair(first, second) => {
                let mut bytes = first.to_ne_bytes().to_vec();
                bytes.extend_from_slice(&second.to_ne_bytes());
                bytes
            }
            ParamValue::Text(text) => {
                let mut bytes = text.as_bytes().to_vec();
                bytes.push(0);
                bytes
            }
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Short(value) => write!(f, "{value}"),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Pair(first, second) => write!(f, "[{first}, {second}]"),
            ParamValue::Text(text) => f.write_str(text),
        }
    }
}

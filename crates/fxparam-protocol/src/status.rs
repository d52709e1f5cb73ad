use std::fmt;

/// Native status code reported by the effect engine, either as the result of
/// a transport call or inside a [`ParamBuffer`](crate::ParamBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Status(pub i32);

impl Status {
    pub const OK: Status = Status(0);
    pub const UNKNOWN_ERROR: Status = Status(i32::MIN);
    pub const PERMISSION_DENIED: Status = Status(-1);
    pub const NAME_NOT_FOUND: Status = Status(-2);
    pub const NO_MEMORY: Status = Status(-12);
    pub const ALREADY_EXISTS: Status = Status(-17);
    pub const NO_INIT: Status = Status(-19);
    pub const BAD_VALUE: Status = Status(-22);
    pub const DEAD_OBJECT: Status = Status(-32);
    pub const INVALID_OPERATION: Status = Status(-38);
    pub const TIMED_OUT: Status = Status(-110);

    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::OK => "OK",
            Self::UNKNOWN_ERROR => "UNKNOWN_ERROR",
            Self::PERMISSION_DENIED => "PERMISSION_DENIED",
            Self::NAME_NOT_FOUND => "NAME_NOT_FOUND",
            Self::NO_MEMORY => "NO_MEMORY",
            Self::ALREADY_EXISTS => "ALREADY_EXISTS",
            Self::NO_INIT => "NO_INIT",
            Self::BAD_VALUE => "BAD_VALUE",
            Self::DEAD_OBJECT => "DEAD_OBJECT",
            Self::INVALID_OPERATION => "INVALID_OPERATION",
            Self::TIMED_OUT => "TIMED_OUT",
            _ => return None,
        };
        Some(name)
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "status {}", self.0),
        }
    }
}

/// Coarse outcome used to decide whether an effect session must be recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlStatus {
    /// Not a control-loss condition. Other failures are the caller's to handle.
    Ok,
    /// The session was torn down or the engine object died.
    ControlLost,
}

/// Classify a transport status.
///
/// Only `INVALID_OPERATION` and `DEAD_OBJECT` mean control was lost; every
/// other status, failures included, maps to [`ControlStatus::Ok`].
pub fn classify(status: Status) -> ControlStatus {
    match status {
        Status::INVALID_OPERATION | Status::DEAD_OBJECT => ControlStatus::ControlLost,
        _ => ControlStatus::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_operation_and_dead_object_lose_control() {
        assert_eq!(classify(Status::INVALID_OPERATION), ControlStatus::ControlLost);
        assert_eq!(classify(Status::DEAD_OBJECT), ControlStatus::ControlLost);
        for status in [
            Status::OK,
            Status::UNKNOWN_ERROR,
            Status::BAD_VALUE,
            Status::NO_INIT,
            Status::NO_MEMORY,
            Status::TIMED_OUT,
            Status(-5),
            Status(17),
        ] {
            assert_eq!(classify(status), ControlStatus::Ok, "{status}");
        }
    }

    #[test]
    fn display_names_known_codes() {
        assert_eq!(Status::DEAD_OBJECT.to_string(), "DEAD_OBJECT (-32)");
        assert_eq!(Status(-5).to_string(), "status -5");
        assert!(Status::default().is_ok());
    }
}

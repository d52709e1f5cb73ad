use std::io;
use std::sync::Arc;

use fxparam_protocol::{
    header_size, set_i32, value_size, EffectEngine, EqParam, ParamBuffer, Status,
};
use parking_lot::Mutex;
use tracing::Level;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

struct AcceptingEngine;

impl EffectEngine for AcceptingEngine {
    fn init_check(&self) -> Status {
        Status::OK
    }

    fn get_parameter(&mut self, _buffer: &mut ParamBuffer) -> Status {
        Status::OK
    }

    fn set_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        buffer.set_status(Status::OK);
        Status::OK
    }

    fn set_enabled(&mut self, _enabled: bool) -> Status {
        Status::OK
    }
}

#[test]
fn unknown_identifier_logs_an_error() {
    let logs = capture(|| {
        assert_eq!(header_size(EqParam::Other(300)), 8);
        assert_eq!(value_size(EqParam::Other(300)), 4);
    });
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("trying to use an unknown EQ parameter"), "{logs}");
    assert!(logs.contains("trying to access an unknown EQ parameter"), "{logs}");
    assert!(logs.contains("param=300"), "{logs}");
}

#[test]
fn setting_unknown_band_level_logs_but_succeeds() {
    let logs = capture(|| {
        set_i32(&mut AcceptingEngine, EqParam::Other(0x100), 2, -300).unwrap();
    });
    assert!(logs.contains("unknown EQ parameter"), "{logs}");
}

#[test]
fn known_identifiers_log_nothing() {
    let logs = capture(|| {
        for param in EqParam::KNOWN {
            header_size(param);
            value_size(param);
        }
        set_i32(&mut AcceptingEngine, EqParam::BandLevel, 1, 200).unwrap();
    });
    assert!(logs.is_empty(), "{logs}");
}

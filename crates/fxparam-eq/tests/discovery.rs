use std::sync::Arc;
use std::thread;

use fxparam_eq::{
    discover, rediscover, BandProfile, DiscoveryError, EqError, EqualizerProfile, FaultRule,
    FaultStage, PresetCatalog, SimulatedFactory,
};
use fxparam_protocol::{
    ControlStatus, EffectDescriptor, EffectEngine, EffectFactory, EqParam, ParamBuffer, SessionId,
    Status,
};
use pretty_assertions::assert_eq;

fn profile() -> EqualizerProfile {
    EqualizerProfile {
        bands: vec![
            BandProfile::new(30_000, 60_000, 120_000),
            BandProfile::new(120_001, 230_000, 460_000),
            BandProfile::new(460_001, 910_000, 1_800_000),
            BandProfile::new(1_800_001, 3_600_000, 7_000_000),
            BandProfile::new(7_000_001, 14_000_000, 20_000_000),
        ],
        level_min: -1200,
        level_max: 1200,
        presets: vec!["Rock".into(), "Jazz".into(), "Normal".into()],
        ..EqualizerProfile::default()
    }
}

fn fault(param: EqParam, index: Option<i32>, status: Status, stage: FaultStage) -> FaultRule {
    FaultRule {
        param: param.raw(),
        index,
        status: status.code(),
        stage,
    }
}

#[test]
fn caches_band_count_and_level_range() {
    let factory = SimulatedFactory::new(profile());
    let catalog = PresetCatalog::new();
    let eq = discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    assert_eq!(eq.capabilities().num_bands, 5);
    assert_eq!(eq.capabilities().band_level_min, -1200);
    assert_eq!(eq.capabilities().band_level_max, 1200);
}

#[test]
fn populates_preset_catalog_once() {
    let factory = SimulatedFactory::new(profile());
    let catalog = PresetCatalog::new();
    let first = discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    assert_eq!(catalog.count(), 3);
    let expected = vec![
        Some("Rock".to_owned()),
        Some("Jazz".to_owned()),
        Some("Normal".to_owned()),
    ];
    assert_eq!(catalog.names().unwrap().to_vec(), expected);
    assert_eq!(first.engine().call_count(EqParam::GetPresetName), 3);

    let second =
        discover(&factory, &SimulatedFactory::descriptor(), SessionId(2), &catalog).unwrap();
    assert_eq!(second.engine().call_count(EqParam::GetPresetName), 0);
    assert_eq!(second.engine().call_count(EqParam::GetNumOfPresets), 1);
    assert_eq!(catalog.count(), 3);
    assert_eq!(catalog.names().unwrap().to_vec(), expected);
}

#[test]
fn zero_presets_skip_name_enumeration() {
    let factory = SimulatedFactory::new(EqualizerProfile {
        presets: Vec::new(),
        ..profile()
    });
    let catalog = PresetCatalog::new();
    let eq = discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    assert_eq!(eq.engine().call_count(EqParam::GetPresetName), 0);
    assert_eq!(catalog.count(), 0);
    assert!(catalog.names().is_none());
}

#[test]
fn failed_init_check_aborts_discovery() {
    let factory = SimulatedFactory::new(EqualizerProfile {
        init_status: Status::NO_INIT.code(),
        ..profile()
    });
    let catalog = PresetCatalog::new();
    let err = discover(&factory, &SimulatedFactory::descriptor(), SessionId(4), &catalog)
        .unwrap_err();

    assert_eq!(
        err,
        DiscoveryError::InitCheck {
            session: SessionId(4),
            status: Status::NO_INIT
        }
    );
    assert_eq!(catalog.count(), 0);
    assert!(!catalog.is_populated());
}

#[test]
fn failed_steps_leave_defaults_and_continue() {
    let factory = SimulatedFactory::new(EqualizerProfile {
        faults: vec![
            fault(EqParam::NumBands, None, Status::BAD_VALUE, FaultStage::Engine),
            fault(EqParam::GetPresetName, Some(1), Status::TIMED_OUT, FaultStage::Transport),
        ],
        ..profile()
    });
    let catalog = PresetCatalog::new();
    let eq = discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    assert_eq!(eq.capabilities().num_bands, 0);
    assert_eq!(eq.capabilities().level_range(), (-1200, 1200));
    assert_eq!(
        catalog.names().unwrap().to_vec(),
        vec![Some("Rock".to_owned()), None, Some("Normal".to_owned())]
    );
}

#[test]
fn failed_preset_count_skips_catalog() {
    let factory = SimulatedFactory::new(EqualizerProfile {
        faults: vec![fault(
            EqParam::GetNumOfPresets,
            None,
            Status::BAD_VALUE,
            FaultStage::Engine,
        )],
        ..profile()
    });
    let catalog = PresetCatalog::new();
    let eq = discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    assert_eq!(eq.capabilities().num_bands, 5);
    assert_eq!(catalog.count(), 0);
    assert!(catalog.names().is_none());
    assert_eq!(eq.engine().call_count(EqParam::GetPresetName), 0);
}

#[test]
fn rediscover_keeps_catalog() {
    let factory = SimulatedFactory::new(profile());
    let catalog = PresetCatalog::new();
    let mut eq =
        discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    rediscover(&mut eq, &catalog);
    assert_eq!(eq.engine().call_count(EqParam::NumBands), 2);
    assert_eq!(eq.engine().call_count(EqParam::GetPresetName), 3);
    assert_eq!(eq.capabilities().num_bands, 5);
}

#[test]
fn concurrent_discoveries_share_one_catalog() {
    let factory = SimulatedFactory::new(profile());
    let catalog = Arc::new(PresetCatalog::new());

    let name_calls: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|session| {
                let factory = &factory;
                let catalog = Arc::clone(&catalog);
                scope.spawn(move || {
                    let eq = discover(
                        factory,
                        &SimulatedFactory::descriptor(),
                        SessionId(session),
                        &catalog,
                    )
                    .unwrap();
                    eq.engine().call_count(EqParam::GetPresetName)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(name_calls, 3);
    assert_eq!(catalog.name(2), Some("Normal"));
}

#[test]
fn band_controls_use_cached_band_count() {
    let factory = SimulatedFactory::new(profile());
    let catalog = PresetCatalog::new();
    let mut eq =
        discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    let calls_before = eq.engine().calls().len();
    assert_eq!(
        eq.set_band_level(5, 0).unwrap_err(),
        EqError::BandOutOfRange {
            band: 5,
            num_bands: 5
        }
    );
    assert_eq!(eq.engine().calls().len(), calls_before);

    eq.set_band_level(2, -600).unwrap();
    assert_eq!(eq.band_level(2).unwrap(), -600);
    assert_eq!(eq.center_freq(0).unwrap(), 60_000);
    assert_eq!(eq.band_freq_range(1).unwrap(), (120_001, 460_000));
    assert_eq!(eq.band_for_frequency(3_000_000).unwrap(), 3);

    let bands = eq.describe_bands();
    assert_eq!(bands.len(), 5);
    assert_eq!(bands[4].center_millihertz, 14_000_000);
}

#[test]
fn presets_can_be_switched_by_index() {
    let factory = SimulatedFactory::new(profile());
    let catalog = PresetCatalog::new();
    let mut eq =
        discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    eq.use_preset(1).unwrap();
    assert_eq!(eq.current_preset().unwrap(), 1);
    assert_eq!(eq.preset_name(1).unwrap(), "Jazz");

    let err = eq.use_preset(3).unwrap_err();
    assert_eq!(err.control_status(), ControlStatus::Ok);
}

#[test]
fn released_engine_reports_control_lost() {
    let factory = SimulatedFactory::new(profile());
    let catalog = PresetCatalog::new();
    let mut eq =
        discover(&factory, &SimulatedFactory::descriptor(), SessionId(1), &catalog).unwrap();

    eq.set_enabled(true).unwrap();
    assert!(eq.engine().is_enabled());

    eq.engine_mut().release();
    let err = eq.band_level(0).unwrap_err();
    assert_eq!(err.control_status(), ControlStatus::ControlLost);
    assert_eq!(
        eq.set_enabled(false).unwrap_err().control_status(),
        ControlStatus::ControlLost
    );
}

/// Engine reporting counts above `i16::MAX`.
struct WideEngine {
    count: u16,
}

impl EffectEngine for WideEngine {
    fn init_check(&self) -> Status {
        Status::OK
    }

    fn get_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        match buffer.param() {
            EqParam::NumBands | EqParam::GetNumOfPresets => buffer.put_u16(self.count),
            EqParam::LevelRange => buffer.put_pair(-100, 100),
            EqParam::GetPresetName => {
                let name = format!("preset {}", buffer.secondary().unwrap_or_default());
                buffer.put_string(&name);
            }
            _ => buffer.set_status(Status::BAD_VALUE),
        }
        Status::OK
    }

    fn set_parameter(&mut self, buffer: &mut ParamBuffer) -> Status {
        buffer.set_status(Status::BAD_VALUE);
        Status::OK
    }

    fn set_enabled(&mut self, _enabled: bool) -> Status {
        Status::OK
    }
}

struct WideFactory(u16);

impl EffectFactory for WideFactory {
    type Engine = WideEngine;

    fn create_effect(&self, _descriptor: &EffectDescriptor, _session: SessionId) -> WideEngine {
        WideEngine { count: self.0 }
    }
}

#[test]
fn counts_above_i16_max_are_kept() {
    let catalog = PresetCatalog::new();
    let eq = discover(
        &WideFactory(40_000),
        &SimulatedFactory::descriptor(),
        SessionId(1),
        &catalog,
    )
    .unwrap();

    assert_eq!(eq.capabilities().num_bands, 40_000);
    assert_eq!(catalog.count(), 40_000);
    assert_eq!(catalog.names().unwrap().len(), 40_000);
    assert_eq!(catalog.name(39_999), Some("preset 39999"));
}

#[test]
fn failed_preset_count_keeps_existing_catalog_count() {
    let catalog = PresetCatalog::new();
    discover(
        &SimulatedFactory::new(profile()),
        &SimulatedFactory::descriptor(),
        SessionId(1),
        &catalog,
    )
    .unwrap();

    let failing = SimulatedFactory::new(EqualizerProfile {
        faults: vec![fault(
            EqParam::GetNumOfPresets,
            None,
            Status::TIMED_OUT,
            FaultStage::Transport,
        )],
        ..profile()
    });
    discover(&failing, &SimulatedFactory::descriptor(), SessionId(2), &catalog).unwrap();

    assert_eq!(catalog.count(), 3);
    assert_eq!(catalog.names().unwrap().len(), 3);
}

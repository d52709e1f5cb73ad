//! One-time capability discovery run when an equalizer is attached.

use fxparam_protocol::{
    get_pair, get_string, get_u16, EffectDescriptor, EffectEngine, EffectFactory, EqParam,
    SessionId, Status,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::capabilities::EqualizerCapabilities;
use crate::catalog::PresetCatalog;
use crate::equalizer::Equalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("equalizer init check failed on {session}: {status}")]
    InitCheck { session: SessionId, status: Status },
}

/// Create an equalizer on `session` and populate its capabilities.
///
/// Only a failed init check aborts; every later query is best effort and
/// leaves its field at the default when it fails.
pub fn discover<F: EffectFactory>(
    factory: &F,
    descriptor: &EffectDescriptor,
    session: SessionId,
    catalog: &PresetCatalog,
) -> Result<Equalizer<F::Engine>, DiscoveryError> {
    debug!(%session, "initialising equalizer");
    let engine = factory.create_effect(descriptor, session);
    let status = engine.init_check();
    if !status.is_ok() {
        error!(%session, %status, "EQ init check failed");
        return Err(DiscoveryError::InitCheck { session, status });
    }

    let mut equalizer = Equalizer::new(engine, *descriptor, session);
    rediscover(&mut equalizer, catalog);
    Ok(equalizer)
}

/// Re-run the capability queries against an attached equalizer.
///
/// Band count and level range are overwritten on success; the preset names
/// in `catalog` are left alone once populated.
pub fn rediscover<E: EffectEngine>(equalizer: &mut Equalizer<E>, catalog: &PresetCatalog) {
    let mut capabilities = equalizer.capabilities;
    populate(equalizer.engine_mut(), &mut capabilities, catalog);
    equalizer.capabilities = capabilities;
}

fn populate<E: EffectEngine + ?Sized>(
    engine: &mut E,
    capabilities: &mut EqualizerCapabilities,
    catalog: &PresetCatalog,
) {
    match get_u16(engine, EqParam::NumBands, 0) {
        Ok(count) => capabilities.num_bands = count,
        Err(err) => warn!(%err, "band count unavailable"),
    }

    match get_pair(engine, EqParam::LevelRange, 0) {
        Ok((min, max)) => {
            capabilities.band_level_min = min;
            capabilities.band_level_max = max;
        }
        Err(err) => warn!(%err, "band level range unavailable"),
    }

    debug!(
        num_bands = capabilities.num_bands,
        min = capabilities.band_level_min,
        max = capabilities.band_level_max,
        "EQ init: band range in mB"
    );

    let presets = match get_u16(engine, EqParam::GetNumOfPresets, 0) {
        Ok(count) => {
            catalog.set_count(count);
            count
        }
        Err(err) => {
            warn!(%err, "preset count unavailable");
            0
        }
    };
    if presets == 0 {
        return;
    }

    let populated = catalog.populate_once(presets, |index| {
        match get_string(&mut *engine, EqParam::GetPresetName, i32::from(index)) {
            Ok(name) => {
                debug!(index, %name, "EQ init: preset");
                Some(name)
            }
            Err(err) => {
                warn!(index, %err, "preset name unavailable");
                None
            }
        }
    });
    if !populated {
        debug!(presets, "preset catalog already populated");
    }
}

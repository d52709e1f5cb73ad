use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fxparam_eq::{
    discover, BandInfo, Equalizer, EqualizerCapabilities, EqualizerProfile, PresetCatalog,
    SimulatedEqualizer, SimulatedFactory,
};
use fxparam_protocol::{
    classify, get_value, set_parameter, ControlStatus, EffectDescriptor, EqParam, ParamError,
    SessionId, ValueShape,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Equalizer parameter tools backed by a simulated effect engine")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Engine profile (JSON). Defaults to the built-in five-band equalizer.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,
    /// Audio session to attach the equalizer to.
    #[arg(long, global = true, default_value_t = 0)]
    session: i32,
}

#[derive(Subcommand)]
enum Commands {
    /// Run capability discovery and print the cached capabilities.
    Discover {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Read a single parameter.
    Get {
        /// Parameter name (e.g. `band-level`) or raw identifier.
        param: EqParam,
        /// Secondary index: band, preset or frequency in millihertz.
        #[arg(long, default_value_t = 0)]
        index: i32,
    },
    /// Write a single parameter.
    Set {
        /// Parameter name (e.g. `band-level`) or raw identifier.
        param: EqParam,
        #[arg(allow_hyphen_values = true)]
        value: i32,
        /// Secondary index: band, preset or frequency in millihertz.
        #[arg(long, default_value_t = 0)]
        index: i32,
    },
}

#[derive(Serialize)]
struct DiscoveryReport {
    session: SessionId,
    descriptor: EffectDescriptor,
    capabilities: EqualizerCapabilities,
    preset_count: u16,
    presets: Vec<Option<String>>,
    bands: Vec<BandInfo>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let catalog = PresetCatalog::new();
    let mut equalizer = attach(&cli.engine, &catalog)?;
    match cli.command {
        Commands::Discover { json } => execute_discover(&mut equalizer, &catalog, json),
        Commands::Get { param, index } => execute_get(&mut equalizer, param, index),
        Commands::Set {
            param,
            value,
            index,
        } => execute_set(&mut equalizer, param, index, value),
    }
}

fn attach(args: &EngineArgs, catalog: &PresetCatalog) -> Result<Equalizer<SimulatedEqualizer>> {
    let profile = match &args.profile {
        Some(path) => {
            debug!(path = %path.display(), "loading engine profile");
            EqualizerProfile::load(path)
                .with_context(|| format!("failed to load engine profile {}", path.display()))?
        }
        None => EqualizerProfile::default(),
    };
    let factory = SimulatedFactory::new(profile);
    let equalizer = discover(
        &factory,
        &SimulatedFactory::descriptor(),
        SessionId(args.session),
        catalog,
    )
    .context("equalizer discovery failed")?;
    debug!(
        session = args.session,
        bands = equalizer.capabilities().num_bands,
        presets = catalog.count(),
        "equalizer attached"
    );
    Ok(equalizer)
}

fn execute_discover(
    equalizer: &mut Equalizer<SimulatedEqualizer>,
    catalog: &PresetCatalog,
    json: bool,
) -> Result<()> {
    let report = DiscoveryReport {
        session: equalizer.session(),
        descriptor: *equalizer.descriptor(),
        capabilities: *equalizer.capabilities(),
        preset_count: catalog.count(),
        presets: catalog.names().map(<[_]>::to_vec).unwrap_or_default(),
        bands: equalizer.describe_bands(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let caps = report.capabilities;
    println!("Equalizer on {}", report.session);
    println!("  Implementation: {}", report.descriptor.implementation_id);
    println!("  Bands: {}", caps.num_bands);
    println!(
        "  Level range: [{} {}] mB",
        caps.band_level_min, caps.band_level_max
    );
    for band in &report.bands {
        println!(
            "  Band {}: {} - {} - {} Hz",
            band.band,
            band.min_millihertz / 1000,
            band.center_millihertz / 1000,
            band.max_millihertz / 1000
        );
    }
    println!("  Presets: {}", report.preset_count);
    for (index, name) in report.presets.iter().enumerate() {
        println!("    {index}: {}", name.as_deref().unwrap_or("<unavailable>"));
    }
    Ok(())
}

fn execute_get(
    equalizer: &mut Equalizer<SimulatedEqualizer>,
    param: EqParam,
    index: i32,
) -> Result<()> {
    match get_value(equalizer.engine_mut(), param, index) {
        Ok(value) => {
            println!("{param} = {value}");
            Ok(())
        }
        Err(err) => report_failure(err),
    }
}

fn execute_set(
    equalizer: &mut Equalizer<SimulatedEqualizer>,
    param: EqParam,
    index: i32,
    value: i32,
) -> Result<()> {
    let bytes = match param.value_shape() {
        ValueShape::Short => i16::try_from(value)
            .with_context(|| format!("{value} does not fit the 16-bit value of {param}"))?
            .to_ne_bytes()
            .to_vec(),
        ValueShape::Int => value.to_ne_bytes().to_vec(),
        ValueShape::Pair | ValueShape::String => bail!("{param} cannot be set from an integer"),
    };
    match set_parameter(equalizer.engine_mut(), param, index, &bytes) {
        Ok(()) => {
            println!("{param} <- {value}");
            Ok(())
        }
        Err(err) => report_failure(err),
    }
}

fn report_failure(err: ParamError) -> Result<()> {
    if classify(err.status()) == ControlStatus::ControlLost {
        bail!("{err} (control of the effect was lost)");
    }
    bail!("{err}")
}

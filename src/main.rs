// src/main.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::Parser;
use iaf_pipeline::analysis::{
    attenuation_iaf, render_iaf_png, savgol_iaf, AttenuationIafOptions, PlotStyle,
    SavgolIafOptions, SyntheticRecording,
};
use log::info;
/// Estimate the individual alpha frequency of a synthetic EEG recording.
#[derive(Parser, Debug)]
#[command(name = "iaf-demo", author, version, about, long_about = None)]
struct Cli {
    /// Use the two-condition attenuation estimator against a 35 Hz reference
    #[arg(long)]
    attenuation: bool,
    /// Oscillation frequency of the synthetic recording, in Hz
    #[arg(long, value_name = "HZ", default_value_t = 11.25)]
    frequency: f64,
    /// RNG seed for phases and noise
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file with estimator options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write a diagnostic PNG here
    #[arg(long, value_name = "FILE")]
    plot: Option<PathBuf>,
}
fn load_options<T: serde::de::DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("invalid options in {}", path.display()))
        }
        None => Ok(T::default()),
    }
}
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut synthetic = SyntheticRecording::at(cli.frequency);
    if let Some(seed) = cli.seed {
        synthetic = synthetic.seed(seed);
    }
    let alpha = synthetic.build()?;
    info!(
        "synthesised {} channels, {:.1} s at {} Hz",
        alpha.num_channels(),
        alpha.duration().as_secs_f64(),
        alpha.sample_rate_hz()
    );
    let outcome = if cli.attenuation {
        let options: AttenuationIafOptions = load_options(cli.config.as_deref())?;
        // Reference condition: the same montage with its oscillation outside the alpha range.
        let reference = SyntheticRecording {
            frequency_hz: 35.0,
            ..synthetic.clone().seed(synthetic.seed.wrapping_add(1))
        }
        .build()?;
        attenuation_iaf([&reference, &alpha], &options)?
    } else {
        let options: SavgolIafOptions = load_options(cli.config.as_deref())?;
        savgol_iaf(&alpha, &options)?
    };
    println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    if let Some(path) = cli.plot {
        let png = render_iaf_png(&outcome, PlotStyle::default())?;
        std::fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))?;
        info!("diagnostic plot written to {}", path.display());
    }
    Ok(())
}

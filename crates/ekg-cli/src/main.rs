use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ekg_lib::{
    config::{read_config, SimConfig},
    detectors::crossing::rising_crossing_indices,
    io::{csv as csv_io, text as text_io},
    metrics::rate::{estimate_heart_rate, RateEstimate},
    HeartRateMonitor, MonitorEvent, SignalGenerator, WaveformConfig,
};
use plotters::prelude::*;
use serde::Serialize;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "ekg",
    version,
    about = "Synthetic EKG waveform generator and heart-rate estimator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SampleFormat {
    Text,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a uniform-random waveform to stdout or --out
    Generate {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 0.0)]
        low: f64,
        #[arg(long, default_value_t = 1.0)]
        high: f64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "text")]
        format: SampleFormat,
    },
    /// Estimate beats per minute from newline-delimited samples read from stdin or --input file
    Estimate {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,
        #[arg(long, default_value_t = 10.0)]
        window_s: f64,
    },
    /// Generate a waveform and estimate its rate in one shot
    Simulate {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        emit_samples: Option<PathBuf>,
    },
    /// Render samples to a PNG, optionally marking threshold crossings
    Plot {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            count,
            low,
            high,
            seed,
            out,
            format,
        } => cmd_generate(count, low, high, seed, out.as_deref(), format)?,
        Commands::Estimate {
            input,
            threshold,
            window_s,
        } => cmd_estimate(input.as_deref(), threshold, window_s)?,
        Commands::Simulate {
            config,
            seed,
            emit_samples,
        } => cmd_simulate(config.as_deref(), seed, emit_samples.as_deref())?,
        Commands::Plot {
            input,
            out,
            threshold,
        } => cmd_plot(input.as_deref(), &out, threshold)?,
    }
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn read_samples(input: Option<&Path>) -> Result<Vec<f64>> {
    match input {
        Some(path) if is_csv(path) => csv_io::read_samples_csv(path),
        Some(path) => text_io::read_samples(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_samples(&buf)
        }
    }
}

fn write_samples(out: Option<&Path>, format: SampleFormat, samples: &[f64]) -> Result<()> {
    match (out, format) {
        (Some(path), SampleFormat::Text) => text_io::write_samples(path, samples),
        (Some(path), SampleFormat::Csv) => csv_io::write_samples_csv(path, samples),
        (None, SampleFormat::Text) => {
            for value in samples {
                println!("{value}");
            }
            Ok(())
        }
        (None, SampleFormat::Csv) => bail!("--format csv requires --out"),
    }
}

fn cmd_generate(
    count: usize,
    low: f64,
    high: f64,
    seed: Option<u64>,
    out: Option<&Path>,
    format: SampleFormat,
) -> Result<()> {
    let config = WaveformConfig {
        count,
        low,
        high,
        seed,
    };
    let mut generator = SignalGenerator::from_config(config)?;
    let sequence = generator.generate();
    write_samples(out, format, sequence.values())
}

fn cmd_estimate(input: Option<&Path>, threshold: f64, window_s: f64) -> Result<()> {
    let samples = read_samples(input)?;
    let estimate = estimate_heart_rate(&samples, threshold, window_s)?;
    println!("{}", serde_json::to_string(&estimate)?);
    Ok(())
}

#[derive(Serialize)]
struct SimulateReport {
    config: SimConfig,
    samples: usize,
    estimate: RateEstimate,
}

fn cmd_simulate(
    config_path: Option<&Path>,
    seed: Option<u64>,
    emit_samples: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => read_config(path)?,
        None => SimConfig::default(),
    };
    if seed.is_some() {
        config.waveform.seed = seed;
    }

    let mut monitor = HeartRateMonitor::new(config.estimator)?;
    monitor.subscribe(|event| match event {
        MonitorEvent::SequenceReplaced { len } => {
            log::debug!("sequence replaced ({len} samples)")
        }
        MonitorEvent::RateChanged { bpm } => log::info!("heart rate now {bpm:.1} bpm"),
    });
    let mut generator = SignalGenerator::from_config(config.waveform)?;
    monitor.regenerate(&mut generator);

    if let Some(path) = emit_samples {
        let samples = monitor.sequence().values();
        if is_csv(path) {
            csv_io::write_samples_csv(path, samples)?;
        } else {
            text_io::write_samples(path, samples)?;
        }
    }

    let report = SimulateReport {
        config,
        samples: monitor.sequence().len(),
        estimate: monitor.estimate(),
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_plot(input: Option<&Path>, out: &Path, threshold: Option<f64>) -> Result<()> {
    let samples = read_samples(input)?;
    if samples.is_empty() {
        bail!("no samples to plot");
    }
    render_waveform(out, &samples, threshold)
}

fn render_waveform(path: &Path, samples: &[f64], threshold: Option<f64>) -> Result<()> {
    let backend = BitMapBackend::new(path, (800, 480));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &value in samples {
        y_min = y_min.min(value);
        y_max = y_max.max(value);
    }
    if let Some(level) = threshold {
        y_min = y_min.min(level);
        y_max = y_max.max(level);
    }
    if y_min == y_max {
        y_min -= 0.5;
        y_max += 0.5;
    }
    let x_max = (samples.len() - 1).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("EKG waveform", ("sans-serif", 24))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;
    chart.configure_mesh().draw()?;

    chart.draw_series(LineSeries::new(
        samples.iter().enumerate().map(|(i, &v)| (i as f64, v)),
        &RED,
    ))?;

    if let Some(level) = threshold {
        chart.draw_series(LineSeries::new([(0.0, level), (x_max, level)], &BLUE))?;
        let marks = rising_crossing_indices(samples, level);
        chart.draw_series(
            marks
                .into_iter()
                .map(|i| Circle::new((i as f64, samples[i]), 3, BLUE.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

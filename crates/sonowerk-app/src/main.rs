// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sonowerk — bone-surface enhancement for tracked ultrasound sequences
//
// Entry point. Initialises logging, reads the processor configuration, runs
// the enhancer over a directory of frames and writes the results.

mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sonowerk_core::error::Result;
use sonowerk_core::{ConfigElement, TransformName};
use sonowerk_enhance::enhance::PROCESSOR_ELEMENT;
use sonowerk_enhance::{FrameTransforms, TransformProvider, TransverseProcessEnhancer, process_sequence};
use tracing::{error, info};

use services::frames;

/// Enhance bone surfaces in a directory of ultrasound frames.
#[derive(Parser, Debug)]
#[command(name = "sonowerk", version, long_about = None)]
struct Args {
    /// Configuration file (JSON configuration element)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of input frames
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for enhanced frames
    #[arg(short, long)]
    output: PathBuf,

    /// Refresh frame geometry from this recorded transform, e.g. "ImageToReference"
    #[arg(long)]
    transform: Option<String>,

    /// Write the effective configuration to this file after reading it
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Sonowerk starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Enhancement failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut enhancer = TransverseProcessEnhancer::default();
    if let Some(path) = &args.config {
        let element = ConfigElement::from_json(&std::fs::read_to_string(path)?)?;
        enhancer.read_configuration(&element)?;
        info!(path = %path.display(), "Configuration loaded");
    }

    if let Some(path) = &args.write_config {
        let mut element = ConfigElement::new(PROCESSOR_ELEMENT);
        enhancer.write_configuration(&mut element)?;
        std::fs::write(path, element.to_json()?)?;
        info!(path = %path.display(), "Configuration written");
    }

    let transform = args.transform.as_deref().map(TransformName::parse).transpose()?;
    let provider = FrameTransforms;
    let transforms = transform
        .as_ref()
        .map(|name| (&provider as &dyn TransformProvider, name));

    let loaded = frames::load_frames(&args.input)?;
    let inputs: Vec<_> = loaded.iter().map(|l| l.frame.clone()).collect();
    let outcome = process_sequence(&mut enhancer, &inputs, transforms)?;

    let mut written = 0usize;
    for (source, output) in loaded.iter().zip(&outcome.outputs) {
        if let Some(frame) = output {
            frames::save_frame(&args.output, &source.path, frame)?;
            written += 1;
        }
    }

    if enhancer.debug_collections().is_enabled() {
        enhancer.save_debug_sequences()?;
    }

    info!(
        written,
        skipped = outcome.skipped.len(),
        output = %args.output.display(),
        "Sonowerk finished"
    );
    Ok(())
}

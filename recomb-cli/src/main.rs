use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;

/// Recombines donor GVCFs into per-target GVCFs according to a donor-keyed
/// set of BED recombination maps, resizing each map around indels that
/// straddle a donor boundary before writing.
#[derive(Debug, Parser)]
#[command(name = "recomb-cli", version, about)]
struct Args {
    /// Directory of per-donor BED files describing donor -> target ranges.
    #[arg(long, value_name = "DIR")]
    bed_dir: PathBuf,

    /// Directory of per-donor GVCF (optionally gzipped) files.
    #[arg(long, value_name = "DIR")]
    gvcf_dir: PathBuf,

    /// Reference FASTA used for ref-block allele lookups.
    #[arg(long, value_name = "FILE")]
    reference: PathBuf,

    /// Output directory for the recombined per-target GVCFs.
    #[arg(long, value_name = "DIR")]
    out_gvcf_dir: PathBuf,

    /// Output directory for the resized per-target BED audit files.
    #[arg(long, value_name = "DIR")]
    out_bed_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::new().filter_level(log::LevelFilter::Info).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    log::info!("loading recombination maps from {}", args.bed_dir.display());
    let bed = recomb_bed::load_dir(&args.bed_dir).context("loading BED recombination maps")?;

    log::info!("resizing recombination maps around straddling indels");
    let resized = recomb_engine::resizer::resize(&bed, &args.gvcf_dir).context("resizing recombination maps")?;

    log::info!("loading reference genome from {}", args.reference.display());
    let reference = biocore::fasta::load_file(&args.reference).context("loading reference FASTA")?;

    log::info!("writing recombined GVCFs to {}", args.out_gvcf_dir.display());
    recomb_engine::writer::write_recombined(&resized, &args.gvcf_dir, &reference, &args.out_gvcf_dir, &args.out_bed_dir)
        .context("writing recombined GVCFs")?;

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::annotate::{annotate_file, AnnotateConfig};
use crate::report::MatchSummary;
use crate::vendor::VendorFormat;

#[derive(Debug, Parser)]
#[command(author, version, about = "Annotate DTC genotype exports against a clinical reference table", long_about = None)]
struct Cli {
    /// Input vendor genotype file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output CSV path
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Vendor file format
    #[arg(long, value_enum, default_value_t = VendorFormat::TwentyThreeAndMe)]
    method: VendorFormat,

    /// Reference annotation table (gzip-compressed TSV)
    #[arg(long, value_name = "TABLE")]
    table: PathBuf,

    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let config = AnnotateConfig {
        input: cli.input,
        output: cli.output.clone(),
        method: cli.method,
        table: cli.table,
    };

    let summary = annotate_file(&config)?;
    print_summary(&summary);
    println!("Annotation written to {}", cli.output.display());

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

fn print_summary(summary: &MatchSummary) {
    println!(
        "Annotated {matched} of {parsed} parsed records (conversion rate {rate:.2}%).",
        matched = summary.matched_records,
        parsed = summary.parsed_records,
        rate = summary.conversion_rate(),
    );

    if summary.matched_records > 0 {
        println!(
            "Zygosity: {wt} WT, {het} HET, {hom} HOM.",
            wt = summary.wt_records,
            het = summary.het_records,
            hom = summary.hom_records,
        );
    }

    if summary.unmatched_positions > 0 {
        println!(
            "Dropped {count} records with no reference table entry.",
            count = summary.unmatched_positions
        );
    }

    if summary.no_call_records > 0 {
        println!(
            "Dropped {count} no-call genotypes.",
            count = summary.no_call_records
        );
    }

    if summary.unknown_genotypes > 0 {
        println!(
            "Dropped {count} genotypes outside the site allele combinations.",
            count = summary.unknown_genotypes
        );
    }

    if summary.par_region_records > 0 {
        println!(
            "Dropped {count} pseudo-autosomal rows.",
            count = summary.par_region_records
        );
    }

    if summary.malformed_lines > 0 {
        println!(
            "Ignored {count} malformed input lines.",
            count = summary.malformed_lines
        );
    }
}

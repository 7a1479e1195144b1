//! Match statistics and the structured run report.
//!
//! The conversion rate is the operator's primary signal that a vendor file
//! produced sensible output, so the counters here are part of the output
//! contract. A JSON report with the full breakdown is written alongside
//! the output CSV for downstream tool consumption.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::annotate::AnnotateConfig;
use crate::join::Zygosity;
use crate::table::TableStats;

/// Counters accumulated across parsing and joining of one vendor file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchSummary {
    /// Calls successfully parsed from the vendor file.
    pub parsed_records: usize,
    /// Calls that matched a reference site and were classified.
    pub matched_records: usize,
    /// Input lines skipped because they had too few fields.
    pub malformed_lines: usize,
    /// Pseudo-autosomal rows excluded by the vendor parser.
    pub par_region_records: usize,
    /// Calls with no reference table entry at their position.
    pub unmatched_positions: usize,
    /// Calls dropped for the `--` no-call genotype.
    pub no_call_records: usize,
    /// Calls whose genotype fit none of the site's allele combinations.
    pub unknown_genotypes: usize,
    pub wt_records: usize,
    pub het_records: usize,
    pub hom_records: usize,
}

impl MatchSummary {
    /// Percentage of parsed calls that survived the join, or zero when
    /// nothing parsed.
    pub fn conversion_rate(&self) -> f64 {
        if self.parsed_records == 0 {
            return 0.0;
        }
        self.matched_records as f64 / self.parsed_records as f64 * 100.0
    }

    pub fn record_match(&mut self, zygosity: Zygosity) {
        self.matched_records += 1;
        match zygosity {
            Zygosity::Wt => self.wt_records += 1,
            Zygosity::Het => self.het_records += 1,
            Zygosity::Hom => self.hom_records += 1,
        }
    }
}

/// Complete report of an annotation run, serialized to JSON alongside the
/// output file.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub version: String,
    pub timestamp: String,
    pub input: InputInfo,
    pub output: OutputInfo,
    pub table: TableInfo,
    pub statistics: Statistics,
}

#[derive(Clone, Debug, Serialize)]
pub struct InputInfo {
    pub path: String,
    pub method: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputInfo {
    pub path: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct TableInfo {
    pub path: String,
    #[serde(flatten)]
    pub stats: TableStats,
}

#[derive(Clone, Debug, Serialize)]
pub struct Statistics {
    pub parsed_records: usize,
    pub matched_records: usize,
    pub conversion_rate: f64,
    pub malformed_lines: usize,
    pub par_region_records: usize,
    pub unmatched_positions: usize,
    pub no_call_records: usize,
    pub unknown_genotypes: usize,
    pub wt_records: usize,
    pub het_records: usize,
    pub hom_records: usize,
}

impl From<&MatchSummary> for Statistics {
    fn from(s: &MatchSummary) -> Self {
        Statistics {
            parsed_records: s.parsed_records,
            matched_records: s.matched_records,
            conversion_rate: s.conversion_rate(),
            malformed_lines: s.malformed_lines,
            par_region_records: s.par_region_records,
            unmatched_positions: s.unmatched_positions,
            no_call_records: s.no_call_records,
            unknown_genotypes: s.unknown_genotypes,
            wt_records: s.wt_records,
            het_records: s.het_records,
            hom_records: s.hom_records,
        }
    }
}

impl RunReport {
    pub fn new(config: &AnnotateConfig, table_stats: TableStats, summary: &MatchSummary) -> Self {
        let now = time::OffsetDateTime::now_utc();
        let timestamp = now
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown"));

        RunReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            input: InputInfo {
                path: config.input.display().to_string(),
                method: config.method.as_str().to_string(),
            },
            output: OutputInfo {
                path: config.output.display().to_string(),
            },
            table: TableInfo {
                path: config.table.display().to_string(),
                stats: table_stats,
            },
            statistics: Statistics::from(summary),
        }
    }

    /// Write the report as JSON next to the output; `out.csv` gets
    /// `out_report.json`.
    pub fn write(&self, output_path: &Path) -> io::Result<()> {
        let stem = output_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        let report_path = output_path.with_file_name(format!("{stem}_report.json"));

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        std::fs::write(&report_path, json)?;
        tracing::info!("wrote run report to {}", report_path.display());

        Ok(())
    }
}

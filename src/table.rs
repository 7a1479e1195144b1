//! Loader for the curated annotation reference table.
//!
//! The table arrives as a gzip-compressed, tab-delimited file with a header
//! row. Each row is normalized (chromosome naming, indel allele encoding)
//! and indexed by chromosome and position for exact lookup during the join.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::normalize::{normalize_alleles, normalize_chromosome};
use crate::smart_reader::open_input;

/// Columns the reference table must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Chrom", "Start", "Ref", "Alt", "Gene", "RSID", "gnomAD_AF", "CLNSIG", "CLNDN",
];

/// One annotated site from the reference table, alleles already normalized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceSite {
    pub chrom: String,
    pub start: String,
    pub ref_allele: String,
    pub alt_allele: String,
    pub gene: String,
    pub rsid: String,
    pub gnomad_af: String,
    pub clnsig: String,
    pub clndn: String,
}

/// Counters describing a table load.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TableStats {
    /// Data rows read from the source file.
    pub total_rows: usize,
    /// Sites retained in the lookup structure.
    pub indexed_sites: usize,
    /// Equal-length multi-base records dropped as unsupported.
    pub mnv_dropped: usize,
}

/// Errors that abort a table load.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed table row: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// In-memory lookup over the reference table, keyed chromosome → position.
///
/// Built once per run and read-only afterwards. Duplicate
/// (chromosome, position) keys resolve last-write-wins.
pub struct AnnotationTable {
    sites: HashMap<String, HashMap<String, ReferenceSite>>,
    stats: TableStats,
}

impl AnnotationTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let reader = open_input(path.as_ref())?;
        let mut rows = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);

        let headers = rows.headers()?.clone();
        let col_index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();

        for name in REQUIRED_COLUMNS {
            if !col_index.contains_key(name) {
                return Err(TableError::MissingColumn(name.to_string()));
            }
        }

        let chrom_idx = col_index["Chrom"];
        let start_idx = col_index["Start"];
        let ref_idx = col_index["Ref"];
        let alt_idx = col_index["Alt"];
        let gene_idx = col_index["Gene"];
        let rsid_idx = col_index["RSID"];
        let af_idx = col_index["gnomAD_AF"];
        let clnsig_idx = col_index["CLNSIG"];
        let clndn_idx = col_index["CLNDN"];

        let mut sites: HashMap<String, HashMap<String, ReferenceSite>> = HashMap::new();
        let mut stats = TableStats::default();

        for result in rows.records() {
            let row = result?;
            stats.total_rows += 1;

            let chrom = normalize_chromosome(row.get(chrom_idx).unwrap_or_default());
            let raw_ref = row.get(ref_idx).unwrap_or_default();
            let raw_alt = row.get(alt_idx).unwrap_or_default();

            let Some((ref_allele, alt_allele)) = normalize_alleles(raw_ref, raw_alt) else {
                stats.mnv_dropped += 1;
                continue;
            };

            let site = ReferenceSite {
                start: row.get(start_idx).unwrap_or_default().to_string(),
                gene: row.get(gene_idx).unwrap_or_default().to_string(),
                rsid: row.get(rsid_idx).unwrap_or_default().to_string(),
                gnomad_af: row.get(af_idx).unwrap_or_default().to_string(),
                clnsig: row.get(clnsig_idx).unwrap_or_default().to_string(),
                clndn: row.get(clndn_idx).unwrap_or_default().to_string(),
                chrom,
                ref_allele,
                alt_allele,
            };

            sites
                .entry(site.chrom.clone())
                .or_default()
                .insert(site.start.clone(), site);
        }

        stats.indexed_sites = sites.values().map(HashMap::len).sum();

        Ok(Self { sites, stats })
    }

    pub fn get(&self, chromosome: &str, position: &str) -> Option<&ReferenceSite> {
        self.sites.get(chromosome)?.get(position)
    }

    pub fn len(&self) -> usize {
        self.stats.indexed_sites
    }

    pub fn is_empty(&self) -> bool {
        self.stats.indexed_sites == 0
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) fn from_sites(entries: Vec<ReferenceSite>) -> Self {
        let mut sites: HashMap<String, HashMap<String, ReferenceSite>> = HashMap::new();
        for site in entries {
            sites
                .entry(site.chrom.clone())
                .or_default()
                .insert(site.start.clone(), site);
        }
        let indexed_sites = sites.values().map(HashMap::len).sum();
        Self {
            sites,
            stats: TableStats {
                total_rows: indexed_sites,
                indexed_sites,
                mnv_dropped: 0,
            },
        }
    }
}

impl std::fmt::Debug for AnnotationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationTable")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

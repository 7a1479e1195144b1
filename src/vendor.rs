//! Parsers for the supported consumer genotyping file formats.
//!
//! Every parser produces the same thing: a sequence of [`ObservedCall`]
//! tuples ready for the join. The raw 4-column shape is shared by two
//! vendors (one of which reports haploid calls as a single base); the
//! AncestryDNA-style shape is header-driven with split allele columns.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

use thiserror::Error;

use crate::report::MatchSummary;
use crate::smart_reader::open_input;

/// Genotype value vendors emit for an uncalled site.
pub const NO_CALL: &str = "--";

/// A single genotype call from a vendor export.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObservedCall {
    pub rsid: String,
    pub chromosome: String,
    pub position: String,
    pub genotype: String,
}

impl ObservedCall {
    pub fn is_no_call(&self) -> bool {
        self.genotype == NO_CALL
    }
}

impl fmt::Display for ObservedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.rsid, self.chromosome, self.position, self.genotype
        )
    }
}

/// Vendor file format selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum VendorFormat {
    /// Raw 4-column export; single-base calls on X/Y/MT are doubled.
    #[value(name = "23andme")]
    TwentyThreeAndMe,
    /// Header-driven export with separate allele1/allele2 columns.
    Ancestry,
    /// Raw 4-column export, genotypes taken as-is.
    Wegene,
}

impl VendorFormat {
    pub fn parser(self) -> Box<dyn VendorParser> {
        match self {
            Self::TwentyThreeAndMe => Box::new(SingleBaseAlleleParser),
            Self::Ancestry => Box::new(TwoColumnAlleleParser),
            Self::Wegene => Box::new(RawGenotypeParser),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwentyThreeAndMe => "23andme",
            Self::Ancestry => "ancestry",
            Self::Wegene => "wegene",
        }
    }
}

/// Errors that abort reading a vendor file outright. Per-line problems in
/// the raw formats are skipped and counted instead.
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed input row: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// The one capability the join needs from a vendor format.
pub trait VendorParser {
    fn read_calls(
        &self,
        path: &Path,
        summary: &mut MatchSummary,
    ) -> Result<Vec<ObservedCall>, VendorError>;
}

/// Raw 4-column parser (RSID, chromosome, position, genotype).
pub struct RawGenotypeParser;

/// Raw 4-column parser that doubles single-base genotypes, so haploid
/// calls on sex and mitochondrial chromosomes match diploid-width sites.
pub struct SingleBaseAlleleParser;

/// Header-driven parser for exports with separate `allele1`/`allele2`
/// columns and numeric sex-chromosome codes.
pub struct TwoColumnAlleleParser;

impl VendorParser for RawGenotypeParser {
    fn read_calls(
        &self,
        path: &Path,
        summary: &mut MatchSummary,
    ) -> Result<Vec<ObservedCall>, VendorError> {
        let reader = Reader::new(open_input(path)?);
        Ok(collect_calls(reader, summary))
    }
}

impl VendorParser for SingleBaseAlleleParser {
    fn read_calls(
        &self,
        path: &Path,
        summary: &mut MatchSummary,
    ) -> Result<Vec<ObservedCall>, VendorError> {
        let reader = Reader::with_single_base_doubling(open_input(path)?);
        Ok(collect_calls(reader, summary))
    }
}

fn collect_calls<R: BufRead>(reader: Reader<R>, summary: &mut MatchSummary) -> Vec<ObservedCall> {
    let mut calls = Vec::new();
    for result in reader {
        match result {
            Ok(call) => calls.push(call),
            Err(e) => {
                summary.malformed_lines += 1;
                tracing::warn!("skipping input line: {}", e);
            }
        }
    }
    calls
}

const ANCESTRY_COLUMNS: [&str; 5] = ["rsid", "chromosome", "position", "allele1", "allele2"];

impl VendorParser for TwoColumnAlleleParser {
    fn read_calls(
        &self,
        path: &Path,
        summary: &mut MatchSummary,
    ) -> Result<Vec<ObservedCall>, VendorError> {
        let mut rows = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .from_reader(open_input(path)?);

        let headers = rows.headers()?.clone();
        let col_index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();

        for name in ANCESTRY_COLUMNS {
            if !col_index.contains_key(name) {
                return Err(VendorError::MissingColumn(name.to_string()));
            }
        }

        let rsid_idx = col_index["rsid"];
        let chrom_idx = col_index["chromosome"];
        let pos_idx = col_index["position"];
        let allele1_idx = col_index["allele1"];
        let allele2_idx = col_index["allele2"];

        let mut calls = Vec::new();
        for result in rows.records() {
            let row = result?;

            let Some(chromosome) = map_chromosome_code(row.get(chrom_idx).unwrap_or_default())
            else {
                summary.par_region_records += 1;
                continue;
            };

            let genotype = format!(
                "{}{}",
                row.get(allele1_idx).unwrap_or_default(),
                row.get(allele2_idx).unwrap_or_default()
            );

            calls.push(ObservedCall {
                rsid: row.get(rsid_idx).unwrap_or_default().to_string(),
                position: row.get(pos_idx).unwrap_or_default().to_string(),
                chromosome,
                genotype,
            });
        }

        Ok(calls)
    }
}

/// Remap numeric sex-chromosome codes; `None` marks the pseudo-autosomal
/// region, which is excluded from output.
fn map_chromosome_code(code: &str) -> Option<String> {
    match code {
        "23" => Some(String::from("X")),
        "24" => Some(String::from("Y")),
        "25" => None,
        "26" => Some(String::from("MT")),
        other => Some(other.to_string()),
    }
}

/// Iterator over calls in a raw 4-column vendor file. Comment and blank
/// lines are skipped; short lines surface as per-line errors.
pub struct Reader<R> {
    inner: R,
    line: u64,
    buf: String,
    double_single_base: bool,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
            double_single_base: false,
        }
    }

    pub fn with_single_base_doubling(inner: R) -> Self {
        Self {
            double_single_base: true,
            ..Self::new(inner)
        }
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<ObservedCall, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    let trimmed = self.buf.trim_end_matches(['\n', '\r']);
                    if trimmed.trim().is_empty() || trimmed.starts_with('#') {
                        continue;
                    }

                    let parsed = parse_raw_line(trimmed).map(|mut call| {
                        if self.double_single_base && call.genotype.chars().count() == 1 {
                            call.genotype = call.genotype.repeat(2);
                        }
                        call
                    });

                    return Some(parsed.map_err(|kind| ParseError {
                        line: self.line,
                        kind,
                    }));
                }
                Err(e) => {
                    return Some(Err(ParseError {
                        line: self.line,
                        kind: ParseErrorKind::Io(e),
                    }));
                }
            }
        }
    }
}

/// Errors that can arise while parsing one raw vendor line.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("expected at least four tab- or space-delimited fields, found {0}")]
    FieldCount(usize),
}

fn parse_raw_line(line: &str) -> Result<ObservedCall, ParseErrorKind> {
    let mut fields = line.split_whitespace();

    let count = || line.split_whitespace().count();
    let rsid = fields
        .next()
        .ok_or_else(|| ParseErrorKind::FieldCount(count()))?;
    let chromosome = fields
        .next()
        .ok_or_else(|| ParseErrorKind::FieldCount(count()))?;
    let position = fields
        .next()
        .ok_or_else(|| ParseErrorKind::FieldCount(count()))?;
    let genotype = fields
        .next()
        .ok_or_else(|| ParseErrorKind::FieldCount(count()))?;

    Ok(ObservedCall {
        rsid: rsid.to_string(),
        chromosome: chromosome.to_string(),
        position: position.to_string(),
        genotype: genotype.to_string(),
    })
}

//! Join of observed vendor calls against the annotation table.
//!
//! For each call the site is looked up by (chromosome, position). The
//! observed genotype must be one of the combinations of the site's
//! normalized alleles; zygosity then falls out of counting how often the
//! reference allele appears in the two-character genotype string. Calls
//! that fail any step are dropped and counted, never emitted with a
//! placeholder classification.

use std::fmt;

use serde::Serialize;

use crate::report::MatchSummary;
use crate::table::{AnnotationTable, ReferenceSite};
use crate::vendor::ObservedCall;

/// Classification of a matched genotype against its site's reference allele.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zygosity {
    /// Homozygous reference.
    Wt,
    /// Heterozygous.
    Het,
    /// Homozygous alternate.
    Hom,
}

impl Zygosity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wt => "WT",
            Self::Het => "HET",
            Self::Hom => "HOM",
        }
    }
}

impl fmt::Display for Zygosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the output table: the reference site plus the observed
/// genotype and its classification.
#[derive(Clone, Debug, Serialize)]
pub struct AnnotatedRecord {
    #[serde(rename = "Chrom")]
    pub chrom: String,
    #[serde(rename = "Start")]
    pub start: String,
    #[serde(rename = "Ref")]
    pub ref_allele: String,
    #[serde(rename = "Alt")]
    pub alt_allele: String,
    #[serde(rename = "Gene")]
    pub gene: String,
    #[serde(rename = "RSID")]
    pub rsid: String,
    #[serde(rename = "gnomAD_AF")]
    pub gnomad_af: String,
    #[serde(rename = "CLNSIG")]
    pub clnsig: String,
    #[serde(rename = "CLNDN")]
    pub clndn: String,
    #[serde(rename = "Genotype")]
    pub genotype: String,
    #[serde(rename = "Check")]
    pub zygosity: Zygosity,
}

impl AnnotatedRecord {
    fn new(site: &ReferenceSite, genotype: String, zygosity: Zygosity) -> Self {
        Self {
            chrom: site.chrom.clone(),
            start: site.start.clone(),
            ref_allele: site.ref_allele.clone(),
            alt_allele: site.alt_allele.clone(),
            gene: site.gene.clone(),
            rsid: site.rsid.clone(),
            gnomad_af: site.gnomad_af.clone(),
            clnsig: site.clnsig.clone(),
            clndn: site.clndn.clone(),
            genotype,
            zygosity,
        }
    }
}

/// The genotype strings consistent with a site's alleles under either
/// allele order, deduplicated preserving first occurrence. Construction is
/// order-symmetric after normalization, so the dedup is defensive only.
pub fn genotype_candidates(reference: &str, alternate: &str) -> Vec<String> {
    let all = [
        format!("{reference}{reference}"),
        format!("{reference}{alternate}"),
        format!("{alternate}{alternate}"),
        format!("{alternate}{reference}"),
    ];

    let mut unique = Vec::with_capacity(all.len());
    for candidate in all {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Classify a two-character genotype by counting occurrences of the
/// single-character reference allele. Any other genotype or allele width
/// is rejected rather than miscounted.
pub fn classify(genotype: &str, reference_allele: &str) -> Option<Zygosity> {
    let mut allele_chars = reference_allele.chars();
    let reference_char = allele_chars.next()?;
    if allele_chars.next().is_some() {
        return None;
    }

    if genotype.chars().count() != 2 {
        return None;
    }

    match genotype.chars().filter(|&c| c == reference_char).count() {
        2 => Some(Zygosity::Wt),
        1 => Some(Zygosity::Het),
        0 => Some(Zygosity::Hom),
        _ => None,
    }
}

/// Run every observed call through the join, accumulating drop counters
/// into `summary`. Output order follows input order.
pub fn annotate_calls(
    calls: Vec<ObservedCall>,
    table: &AnnotationTable,
    summary: &mut MatchSummary,
) -> Vec<AnnotatedRecord> {
    let mut records = Vec::new();

    for call in calls {
        let Some(site) = table.get(&call.chromosome, &call.position) else {
            summary.unmatched_positions += 1;
            continue;
        };

        if call.is_no_call() {
            summary.no_call_records += 1;
            continue;
        }

        let candidates = genotype_candidates(&site.ref_allele, &site.alt_allele);
        if !candidates.iter().any(|c| *c == call.genotype) {
            summary.unknown_genotypes += 1;
            continue;
        }

        let Some(zygosity) = classify(&call.genotype, &site.ref_allele) else {
            summary.unknown_genotypes += 1;
            continue;
        };

        summary.record_match(zygosity);
        records.push(AnnotatedRecord::new(site, call.genotype, zygosity));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ReferenceSite;

    fn site(chrom: &str, start: &str, ref_allele: &str, alt_allele: &str) -> ReferenceSite {
        ReferenceSite {
            chrom: chrom.to_string(),
            start: start.to_string(),
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
            gene: String::from("GENE"),
            rsid: String::from("rs1"),
            gnomad_af: String::from("0.1"),
            clnsig: String::from("Benign"),
            clndn: String::from("none"),
        }
    }

    fn call(chrom: &str, pos: &str, genotype: &str) -> ObservedCall {
        ObservedCall {
            rsid: String::from("rs1"),
            chromosome: chrom.to_string(),
            position: pos.to_string(),
            genotype: genotype.to_string(),
        }
    }

    #[test]
    fn candidates_cover_both_allele_orders() {
        assert_eq!(genotype_candidates("A", "G"), ["AA", "AG", "GG", "GA"]);
        assert_eq!(genotype_candidates("I", "D"), ["II", "ID", "DD", "DI"]);
    }

    #[test]
    fn classify_counts_reference_occurrences() {
        assert_eq!(classify("AA", "A"), Some(Zygosity::Wt));
        assert_eq!(classify("AG", "A"), Some(Zygosity::Het));
        assert_eq!(classify("GA", "A"), Some(Zygosity::Het));
        assert_eq!(classify("GG", "A"), Some(Zygosity::Hom));
    }

    #[test]
    fn classify_rejects_unexpected_widths() {
        assert_eq!(classify("A", "A"), None);
        assert_eq!(classify("AAG", "A"), None);
        assert_eq!(classify("", "A"), None);
        assert_eq!(classify("AA", "AT"), None);
        assert_eq!(classify("AA", ""), None);
    }

    #[test]
    fn matched_calls_are_classified_in_input_order() {
        let table = AnnotationTable::from_sites(vec![
            site("1", "100", "A", "G"),
            site("1", "200", "T", "C"),
        ]);
        let calls = vec![
            call("1", "200", "CC"),
            call("1", "100", "AG"),
            call("1", "100", "AA"),
        ];

        let mut summary = MatchSummary::default();
        summary.parsed_records = calls.len();
        let records = annotate_calls(calls, &table, &mut summary);

        let zygosities: Vec<_> = records.iter().map(|r| r.zygosity).collect();
        assert_eq!(zygosities, [Zygosity::Hom, Zygosity::Het, Zygosity::Wt]);
        assert_eq!(summary.matched_records, 3);
        assert_eq!(summary.wt_records, 1);
        assert_eq!(summary.het_records, 1);
        assert_eq!(summary.hom_records, 1);
    }

    #[test]
    fn unmatched_positions_are_dropped_silently() {
        let table = AnnotationTable::from_sites(vec![site("1", "100", "A", "G")]);
        let mut summary = MatchSummary::default();
        let records = annotate_calls(vec![call("2", "100", "AA")], &table, &mut summary);
        assert!(records.is_empty());
        assert_eq!(summary.unmatched_positions, 1);
    }

    #[test]
    fn no_call_never_produces_a_record() {
        let table = AnnotationTable::from_sites(vec![site("1", "100", "A", "G")]);
        let mut summary = MatchSummary::default();
        let records = annotate_calls(vec![call("1", "100", "--")], &table, &mut summary);
        assert!(records.is_empty());
        assert_eq!(summary.no_call_records, 1);
        assert_eq!(summary.matched_records, 0);
    }

    #[test]
    fn genotype_outside_allele_combinations_is_dropped() {
        let table = AnnotationTable::from_sites(vec![site("1", "100", "A", "G")]);
        let mut summary = MatchSummary::default();
        let records = annotate_calls(vec![call("1", "100", "AT")], &table, &mut summary);
        assert!(records.is_empty());
        assert_eq!(summary.unknown_genotypes, 1);
    }

    #[test]
    fn deletion_site_classifies_homozygous_deletion_as_hom() {
        // Table row Ref=A, Alt=- normalizes to (I, D); a DD genotype
        // carries zero copies of the reference marker.
        let table = AnnotationTable::from_sites(vec![site("1", "100", "I", "D")]);
        let mut summary = MatchSummary::default();
        let records = annotate_calls(
            vec![call("1", "100", "DD"), call("1", "100", "ID")],
            &table,
            &mut summary,
        );
        assert_eq!(records[0].zygosity, Zygosity::Hom);
        assert_eq!(records[1].zygosity, Zygosity::Het);
    }

    #[test]
    fn sites_match_identically_under_swapped_allele_order() {
        let forward = AnnotationTable::from_sites(vec![site("1", "100", "A", "G")]);
        let reversed = AnnotationTable::from_sites(vec![site("1", "100", "G", "A")]);

        for genotype in ["AA", "AG", "GA", "GG"] {
            let mut s1 = MatchSummary::default();
            let mut s2 = MatchSummary::default();
            let m1 = annotate_calls(vec![call("1", "100", genotype)], &forward, &mut s1);
            let m2 = annotate_calls(vec![call("1", "100", genotype)], &reversed, &mut s2);
            assert_eq!(m1.len(), 1, "genotype {genotype} must match either order");
            assert_eq!(m2.len(), 1, "genotype {genotype} must match either order");
        }
    }
}

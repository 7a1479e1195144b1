//! Canonicalization of reference-table allele pairs and chromosome names.
//!
//! Vendor genotypes encode insertions and deletions as single `I`/`D`
//! characters, while annotation sources carry the full allele sequences.
//! Rewriting each table record into the same single-character encoding is
//! what makes the two comparable at all; getting this wrong silently
//! produces wrong clinical calls downstream.

/// Marker allele for the inserted (longer) side of an indel.
pub const INSERTION_ALLELE: &str = "I";

/// Marker allele for the deleted (shorter) side of an indel.
pub const DELETION_ALLELE: &str = "D";

const GAP: &str = "-";

/// Rewrite a reference/alternate allele pair into its canonical form.
///
/// Length-mismatched pairs become `I`/`D` markers oriented so the longer
/// allele maps to `I`. Equal-length single-base pairs pass through
/// unchanged unless one side is the `-` gap placeholder, which is treated
/// as the deleted side. Equal-length pairs longer than one base are
/// multi-nucleotide variants and return `None`; callers drop the record.
pub fn normalize_alleles(reference: &str, alternate: &str) -> Option<(String, String)> {
    if reference.len() > alternate.len() {
        Some((INSERTION_ALLELE.to_string(), DELETION_ALLELE.to_string()))
    } else if reference.len() < alternate.len() {
        Some((DELETION_ALLELE.to_string(), INSERTION_ALLELE.to_string()))
    } else if reference.len() == 1 {
        if alternate == GAP {
            Some((INSERTION_ALLELE.to_string(), DELETION_ALLELE.to_string()))
        } else if reference == GAP {
            Some((DELETION_ALLELE.to_string(), INSERTION_ALLELE.to_string()))
        } else {
            Some((reference.to_string(), alternate.to_string()))
        }
    } else {
        None
    }
}

/// Normalize a chromosome name for table indexing: `chrM` becomes `MT`,
/// any other leading `chr` prefix is stripped.
pub fn normalize_chromosome(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "chrM" {
        return String::from("MT");
    }
    trimmed.strip_prefix("chr").unwrap_or(trimmed).to_string()
}

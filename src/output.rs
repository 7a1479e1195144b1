use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::join::AnnotatedRecord;

/// Output column order; the header is written even when no record matched.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "Chrom", "Start", "Ref", "Alt", "Gene", "RSID", "gnomAD_AF", "CLNSIG", "CLNDN", "Genotype",
    "Check",
];

/// Write the annotated table as UTF-8 CSV, one row per record, in the
/// order the records were matched.
pub fn write_csv<P>(path: P, records: &[AnnotatedRecord]) -> Result<()>
where
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())
        .with_context(|| format!("failed to create output file at {}", path.as_ref().display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(OUTPUT_COLUMNS)
        .context("failed to write CSV header")?;

    for record in records {
        writer
            .serialize(record)
            .context("failed to write CSV record")?;
    }

    writer.flush().context("failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::Zygosity;

    fn record() -> AnnotatedRecord {
        AnnotatedRecord {
            chrom: String::from("1"),
            start: String::from("100"),
            ref_allele: String::from("A"),
            alt_allele: String::from("G"),
            gene: String::from("BRCA1"),
            rsid: String::from("rs1"),
            gnomad_af: String::from("0.01"),
            clnsig: String::from("Benign"),
            clndn: String::from("not_provided"),
            genotype: String::from("AG"),
            zygosity: Zygosity::Het,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[record()]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Chrom,Start,Ref,Alt,Gene,RSID,gnomAD_AF,CLNSIG,CLNDN,Genotype,Check"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,100,A,G,BRCA1,rs1,0.01,Benign,not_provided,AG,HET"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_output_still_carries_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.trim_end(),
            "Chrom,Start,Ref,Alt,Gene,RSID,gnomAD_AF,CLNSIG,CLNDN,Genotype,Check"
        );
    }
}

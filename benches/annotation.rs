use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flate2::{write::GzEncoder, Compression};
use tempfile::tempdir;

use annotate_genome::{
    annotate_file, join,
    table::AnnotationTable,
    AnnotateConfig, VendorFormat,
};

fn create_table(dir: &tempfile::TempDir, sites: usize) -> PathBuf {
    let path = dir.path().join("core.txt.gz");
    let file = File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    writeln!(
        encoder,
        "Chrom\tStart\tRef\tAlt\tGene\tRSID\tgnomAD_AF\tCLNSIG\tCLNDN"
    )
    .unwrap();
    for i in 1..=sites {
        writeln!(
            encoder,
            "1\t{i}\tA\tG\tGENE{i}\trs{i}\t0.01\tBenign\tnone"
        )
        .unwrap();
    }
    encoder.finish().unwrap();
    path
}

fn create_input(dir: &tempfile::TempDir, records: usize) -> PathBuf {
    let path = dir.path().join("input.txt");
    let mut content = String::new();
    for i in 1..=records {
        content.push_str(&format!("rs{i}\t1\t{i}\tAG\n"));
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn bench_full_run(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let table = create_table(&dir, 10_000);
    let input = create_input(&dir, 10_000);

    c.bench_function("annotate_10k_sites", |b| {
        b.iter(|| {
            let config = AnnotateConfig {
                input: input.clone(),
                output: dir.path().join("out.csv"),
                method: VendorFormat::Wegene,
                table: table.clone(),
            };
            black_box(annotate_file(&config).unwrap());
        })
    });
}

fn bench_table_load(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let table = create_table(&dir, 10_000);

    c.bench_function("load_table_10k_sites", |b| {
        b.iter(|| black_box(AnnotationTable::load(&table).unwrap()))
    });
}

fn bench_classification(c: &mut Criterion) {
    c.bench_function("candidates_and_classify", |b| {
        b.iter(|| {
            let candidates = join::genotype_candidates(black_box("A"), black_box("G"));
            black_box(&candidates);
            black_box(join::classify(black_box("AG"), black_box("A")))
        })
    });
}

criterion_group!(benches, bench_full_run, bench_table_load, bench_classification);
criterion_main!(benches);

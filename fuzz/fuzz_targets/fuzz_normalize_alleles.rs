#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let (reference, alternate) = match input.split_once('\t') {
        Some(pair) => pair,
        None => return,
    };

    // Normalization should never panic and must be idempotent
    if let Some((r, a)) = annotate_genome::normalize::normalize_alleles(reference, alternate) {
        let again = annotate_genome::normalize::normalize_alleles(&r, &a);
        assert_eq!(again, Some((r, a)), "normalization must be idempotent");
    }
});

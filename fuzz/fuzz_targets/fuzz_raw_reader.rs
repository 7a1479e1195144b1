#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let cursor = Cursor::new(data);
    let reader = annotate_genome::vendor::Reader::with_single_base_doubling(cursor);

    // Iterate all records - should never panic
    for result in reader.take(1000) {
        match result {
            Ok(call) => {
                // Exercise Display impl
                let _ = format!("{}", call);
                // Exercise is_no_call
                let _ = call.is_no_call();
            }
            Err(_) => {
                // Parse errors are expected for random input
            }
        }
    }
});

#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = diskunion::arbitrary::arbtests::trace_conserves_edges(&mut Unstructured::new(data));
});

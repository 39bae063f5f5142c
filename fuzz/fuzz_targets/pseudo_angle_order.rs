#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = diskunion::arbitrary::arbtests::pseudo_angle_order(&mut Unstructured::new(data));
});

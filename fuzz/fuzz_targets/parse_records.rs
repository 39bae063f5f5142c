#![no_main]

use libfuzzer_sys::fuzz_target;

// Garbage records must be rejected or traced, never panic or hang.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let centers = [(0.0, 0.0), (0.6, 0.0), (1.2, 0.0), (0.3, 0.5)];
    let _ = diskunion::union_boundary(centers, 0.5, text);
});

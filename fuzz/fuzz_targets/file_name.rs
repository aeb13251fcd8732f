//! Fuzz target for output file name derivation with arbitrary source names.
//!
//! Run with: cargo +nightly fuzz run file_name
//!
//! Properties checked for every accepted name:
//! - The derived name is a single path component
//! - Only a recognised suffix is ever removed
//! - Format detection agrees with suffix matching

#![no_main]

use libfuzzer_sys::fuzz_target;
use uncompress::codec::{detect_format, match_suffix};
use uncompress::resolve::derive_file_name;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    let suffix = match_suffix(name);
    assert_eq!(
        detect_format(name).ok().map(|s| s.format),
        suffix.map(|s| s.format)
    );

    if let Ok(derived) = derive_file_name(name) {
        assert!(!derived.is_empty());
        assert!(derived != "." && derived != "..");
        assert!(
            !derived.contains(['/', '\\', '\0']),
            "Separator in derived name: {:?}",
            derived
        );
        if suffix.is_none() {
            assert_eq!(derived, name);
        }
    }
});

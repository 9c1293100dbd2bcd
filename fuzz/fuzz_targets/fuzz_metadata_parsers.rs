//! Fuzz target for archive metadata parsing (manifest, pom.properties, pom.xml,
//! package.json).
//!
//! Goal: The parsers should **never panic** on any input.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_metadata_parsers
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = licenseguard_finder::fuzz::parse_package_json(data);

    if let Ok(text) = std::str::from_utf8(data) {
        licenseguard_finder::fuzz::parse_manifest(text);
        let _ = licenseguard_finder::fuzz::parse_properties(text);
        let _ = licenseguard_finder::fuzz::parse_pom(text);
    }
});

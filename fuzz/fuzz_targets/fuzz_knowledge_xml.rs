//! Fuzz target for the license, provider and notice XML loaders.
//!
//! Goal: The loaders should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_knowledge_xml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(kb) = licenseguard_domain::KnowledgeBase::from_xml(data)
        && let Ok(text) = std::str::from_utf8(data)
    {
        let _ = kb.match_license_text(text);
        let _ = kb.license_by_name_or_url(text);
    }
    let _ = licenseguard_domain::load_providers(data);
    let _ = licenseguard_domain::load_notices(data);
});

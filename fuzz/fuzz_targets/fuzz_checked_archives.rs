//! Fuzz target for the checked-archives override CSV.
//!
//! Goal: Loading should **never panic** on any input. Bad rows are skipped and a
//! bad pattern is an error.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_checked_archives
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use licenseguard_digest::DigestAlgorithm;
use licenseguard_domain::{
    CheckedArchives, CheckedArchivesContext, KnowledgeBase, License, Notices, Providers,
};
use licenseguard_types::LegalStatus;
use std::sync::LazyLock;

static KNOWLEDGE: LazyLock<KnowledgeBase> = LazyLock::new(|| {
    KnowledgeBase::new([
        License::new("MIT", "MIT License", LegalStatus::Accepted),
        License::new("Apache-2.0", "Apache License 2.0", LegalStatus::Accepted),
    ])
});

fuzz_target!(|data: &[u8]| {
    let providers = Providers::new();
    let notices = Notices::new();
    let ctx = CheckedArchivesContext {
        knowledge: &KNOWLEDGE,
        providers: &providers,
        notices: &notices,
        digest_algorithm: DigestAlgorithm::Sha1,
    };
    let _ = CheckedArchives::load(data, &ctx);
});

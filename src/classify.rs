//! Location-eligibility heuristics for posting headers.
//!
//! US-only detection is best-effort keyword matching, not an authoritative
//! reading of a company's hiring policy.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::Classification;

/// Phrases that mark a posting as open beyond the US. These win over any US phrase.
pub const INTERNATIONAL_KEYWORDS: &[&str] = &[
    "global", "worldwide", "anywhere",
    "eu ", "europe", "uk", "united kingdom", "london", "berlin", "germany",
    "canada", "toronto", "vancouver", "montreal", "australia", "sydney",
    "netherlands", "amsterdam", "sweden", "stockholm", "france", "paris",
    "ireland", "dublin", "singapore", "apac", "emea", "latam", "brazil",
    "india", "bangalore", "switzerland", "zurich", "outside us",
    "remote (world", "remote (everyone)", "remote (global)",
];

pub const US_KEYWORDS: &[&str] = &[
    "us only", "usa only", "u.s. only", "united states", "usa", "america",
    "sf", "san francisco", "bay area", "nyc", "new york", "seattle",
    "austin", "boston", "los angeles", "chicago", "denver", "palo alto",
    "menlo park", "mountain view", "sunnyvale", "santa monica", "culver city",
    "cambridge, ma", "dc", "washington", "est timezone", "pst timezone", "cst timezone",
    "us timezone", "us citizens",
];

static US_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(us|usa|u\.s\.)\b").expect("valid US word pattern"));

// "Remote (US)", "Remote in US". Informational only: it never changes the outcome.
static US_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"remote[\s\-\w]*\(?u\.?s\.?\)?").expect("valid US remote pattern")
});

pub fn classify(header: &str) -> Classification {
    let lower = header.to_lowercase();
    Classification {
        is_us_only: is_us_only_lower(&lower),
        is_remote: lower.contains("remote"),
        is_visa: lower.contains("visa"),
    }
}

fn is_us_only_lower(lower: &str) -> bool {
    if INTERNATIONAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return false;
    }

    if lower.contains("remote") && US_REMOTE.is_match(lower) {
        tracing::trace!(header = lower, "remote posting scoped to the US");
    }

    if US_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }

    US_WORD.is_match(lower)
}

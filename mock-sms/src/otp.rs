//! OTP extraction from SMS bodies.
//!
//! DESIGN
//! ======
//! Templates vary between notification senders, so extraction is heuristic.
//! A labeled code (`code is: 841317`, `OTP=1234`, `PIN 0042`) wins outright.
//! Otherwise every standalone run of 4 to 8 digits is a candidate and the
//! most OTP-like length is chosen: 6, then 4, 5, 8, 7. Runs longer than 8
//! digits (phone numbers, order ids) are never candidates, and neither are
//! fragments of them.

use std::sync::LazyLock;

use regex::Regex;

static LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:code|otp|passcode|pin)\b(?:\s+is)?\s*[:=]?\s*([0-9]{4,8})(?:[^0-9]|$)")
        .unwrap_or_else(|e| panic!("labeled otp pattern: {e}"))
});

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").unwrap_or_else(|e| panic!("digit run pattern: {e}")));

/// Preferred candidate lengths, best first.
const LENGTH_PREFERENCE: [usize; 5] = [6, 4, 5, 8, 7];

/// Extract the OTP from an SMS body, or an empty string when none is found.
#[must_use]
pub fn extract_otp(body: &str) -> String {
    if let Some(code) = LABELED.captures(body).and_then(|caps| caps.get(1)) {
        return code.as_str().to_owned();
    }

    DIGIT_RUN
        .find_iter(body)
        .map(|run| run.as_str())
        .filter_map(|run| rank(run.len()).map(|rank| (rank, run)))
        // min_by_key keeps the first of equal keys, so the earliest run wins ties.
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, run)| run.to_owned())
        .unwrap_or_default()
}

fn rank(len: usize) -> Option<usize> {
    LENGTH_PREFERENCE.iter().position(|&preferred| preferred == len)
}

#[cfg(test)]
#[path = "otp_test.rs"]
mod tests;

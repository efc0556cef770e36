//! Field predicates for Indian KYC identifiers and contact details
//!
//! Every predicate is total: malformed input yields `false`, never a panic.

use regex::Regex;
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("mobile pattern is valid"));

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern is valid"));

static AADHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("Aadhar pattern is valid"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// 10 digits, leading digit 6-9
pub fn validate_mobile(s: &str) -> bool {
    MOBILE_RE.is_match(s)
}

/// 5 uppercase letters, 4 digits, 1 uppercase letter
pub fn validate_pan(s: &str) -> bool {
    PAN_RE.is_match(s)
}

/// 12 digits once whitespace is stripped
pub fn validate_aadhar(s: &str) -> bool {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    AADHAR_RE.is_match(&compact)
}

/// `local@domain.tld` shape
pub fn validate_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

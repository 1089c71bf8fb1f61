//! Common regex patterns for code extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Explicit callouts, in priority order. Group 1 is the code.
    pub static ref CALLOUT_TEMPLATES: Vec<Regex> = vec![
        // "Your verification code is: 482913", "PIN - 1234", "OTP = 9911"
        Regex::new(
            r"(?i)\b(?:code|pin|otp|passcode|password)\s*(?:is\s*:?|:|=|-|\x{2013}|\x{2014})\s*([A-Za-z0-9]{4,8})\b"
        ).unwrap(),
        // "Enter the code 4821", "use verification code A1B2C3"
        Regex::new(
            r"(?i)\b(?:enter|use|type|input|provide)\s+(?:the\s+|this\s+|your\s+)?(?:following\s+)?(?:[a-z-]+\s+)?(?:code|pin|otp|passcode)\s*:?\s*([A-Za-z0-9]{4,8})\b"
        ).unwrap(),
        // "482913 is your login code", "G-771203 is the code"
        Regex::new(
            r"(?i)\b([A-Za-z0-9]{4,8})\s+is\s+(?:your|the)\b"
        ).unwrap(),
    ];

    // Maximal digit runs; length and boundaries are checked by the rule.
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();

    // Mixed alphanumeric tokens.
    pub static ref ALNUM_TOKEN: Regex = Regex::new(r"\b[A-Za-z0-9]{6,8}\b").unwrap();

    // Money markers before a number
    pub static ref CURRENCY_SYMBOL: Regex =
        Regex::new(r"[$\x{20ac}\x{a3}\x{a5}\x{20b9}\x{20a9}\x{20bd}]").unwrap();

    pub static ref CURRENCY_CODE: Regex =
        Regex::new(r"(?i)\b(?:usd|eur|gbp|pln|jpy|cad|aud|inr|chf|cny)\b").unwrap();

    pub static ref DECIMAL_SUFFIX: Regex = Regex::new(r"^[.,][0-9]{2}(?:[^0-9]|$)").unwrap();
}

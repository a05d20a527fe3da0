// src/validate.rs
// =============================================================================
// This module validates user input before anything is sent over the network.
//
// Rules:
// 1. Trim leading/trailing whitespace first
// 2. Empty input is rejected with EmptyInput
// 3. Everything else must parse as a URL with an http(s) scheme and a host
//
// The check is a pure function: same input, same answer, no side effects.
//
// Rust concepts:
// - Result<T, E>: Success returns the parsed URL, failure a CheckError
// - The url crate: Full URL grammar so we don't hand-roll parsing
// =============================================================================

use url::Url;

use crate::error::CheckError;

// Validates raw user input and returns the parsed URL on success.
//
// The parsed Url gives later stages structured access to the scheme, host
// and path (the history table uses those for display).
//
// Examples:
//   "https://example.com"        -> Ok
//   "   "                        -> Err(EmptyInput)
//   "not a url"                  -> Err(InvalidFormat)
//   "phish.example.com/login"    -> Err(InvalidFormat)  (no scheme)
//   "ftp://example.com"          -> Err(InvalidFormat)  (not http/https)
pub fn check_input(raw: &str) -> Result<Url, CheckError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(CheckError::EmptyInput);
    }

    // Url::parse rejects scheme-less input like "example.com/login"
    // (relative URL without a base), which is exactly what we want here.
    let parsed = Url::parse(trimmed).map_err(|_| CheckError::InvalidFormat)?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CheckError::InvalidFormat);
    }

    // Schemes like "data:" parse fine but have no host to classify
    if parsed.host_str().is_none() {
        return Err(CheckError::InvalidFormat);
    }

    Ok(parsed)
}

// Shortens a URL for table display.
//
// Anything longer than max_len characters is cut and suffixed with "...".
// We count characters, not bytes, so multibyte URLs can't split mid-char.
pub fn display_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let truncated: String = url.chars().take(keep).collect();
    format!("{}...", truncated)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return the parsed Url instead of a bool?
//    - "Is it valid?" and "give me the pieces" are the same work
//    - Parsing once and passing the Url along avoids re-parsing later
//    - This is the "parse, don't validate" idea you'll see in Rust a lot
//
// 2. What is map_err?
//    - Transforms the error side of a Result, leaving Ok untouched
//    - Here it converts url::ParseError into our own CheckError
//    - We don't care WHY parsing failed, only that the format is invalid
//
// 3. Why count chars instead of bytes when truncating?
//    - Strings are UTF-8; slicing at a byte index can land inside a
//      multibyte character and panic
//    - chars().take(n) always cuts at a character boundary
// -----------------------------------------------------------------------------

//! Result extraction from sub-test output
//!
//! The interop runner prints its measurement summary as the final line of
//! `output.txt`, always labelled `Goodput` regardless of which test kind
//! produced it. Everything before that line is diagnostic noise.

use crate::error::ExtractError;
use crate::types::SubTestResult;
use regex::Regex;
use std::sync::LazyLock;

static RESULT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Goodput: (.+) kbps").expect("result pattern is valid"));

/// Parse the result value from the last line of `text`
///
/// Missing line and unparsable value both yield [`ExtractError::ResultNotFound`].
pub fn extract_result(text: &str) -> Result<SubTestResult, ExtractError> {
    let last_line = text.lines().last().ok_or(ExtractError::ResultNotFound)?;

    let captures = RESULT_PATTERN
        .captures(last_line)
        .ok_or(ExtractError::ResultNotFound)?;

    captures
        .get(1)
        .and_then(|value| value.as_str().trim().parse::<SubTestResult>().ok())
        .ok_or(ExtractError::ResultNotFound)
}

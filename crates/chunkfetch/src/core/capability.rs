use crate::data::{ProbeResult, ResponseHead};
use crate::error::{Error, Result};

pub const ACCEPT_RANGES: &str = "accept-ranges";
pub const CONTENT_LENGTH: &str = "content-length";

/// Whether an `Accept-Ranges` value advertises byte ranges.
///
/// The header may list several units separated by commas; any `bytes`
/// token, in any case, counts.
pub fn accepts_byte_ranges(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        v.split(',')
            .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
    })
}

pub fn parse_content_length(value: Option<&str>) -> Option<u64> { value?.trim().parse().ok() }

/// Turn the probe response into a [`ProbeResult`] or a capability error.
///
/// Checks run in a fixed order: usable response, range support, size.
pub fn evaluate_probe(head: &ResponseHead) -> Result<ProbeResult> {
    if !head.is_success() {
        return Err(Error::HeadNotSupported {
            status: head.status,
        });
    }

    if !accepts_byte_ranges(head.header(ACCEPT_RANGES)) {
        return Err(Error::RangeNotSupported);
    }

    let total_length =
        parse_content_length(head.header(CONTENT_LENGTH)).ok_or(Error::ContentLengthNotSupported)?;

    Ok(ProbeResult {
        total_length,
        range_supported: true,
    })
}

//! Pure transformations: chunk planning, range headers and capability checks.
//!
//! Nothing in here performs I/O.

mod capability;
mod plan;
mod range;

pub use capability::{ACCEPT_RANGES, CONTENT_LENGTH, accepts_byte_ranges, evaluate_probe, parse_content_length};
pub use plan::plan_chunks;
pub use range::range_header;

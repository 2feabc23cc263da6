use crate::data::Chunk;
use crate::error::{Error, Result};

/// Split a resource of `total_length` bytes into chunks of `chunk_size`.
///
/// The result has `ceil(total_length / chunk_size)` chunks with contiguous,
/// non-overlapping inclusive ranges. The last chunk is clamped to the end of
/// the resource and flagged as such when the fixed size would overshoot.
/// An empty resource yields no chunks.
///
/// # Examples
///
/// ```
/// use chunkfetch::core::plan_chunks;
///
/// let chunks = plan_chunks(10, 4).unwrap();
/// let ranges: Vec<_> = chunks.iter().map(|c| (c.start, c.end)).collect();
/// assert_eq!(ranges, [(0, 3), (4, 7), (8, 9)]);
/// assert!(chunks[2].clamped);
/// ```
pub fn plan_chunks(total_length: u64, chunk_size: u64) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfig("chunk size must be greater than 0".into()));
    }

    let count = total_length.div_ceil(chunk_size);
    let count = u32::try_from(count).map_err(|_| {
        Error::InvalidConfig(format!(
            "{total_length} bytes in chunks of {chunk_size} needs {count} chunks, more than supported"
        ))
    })?;

    let last_byte = total_length.saturating_sub(1);
    let chunks = (0..count)
        .map(|index| {
            let start = u64::from(index) * chunk_size;
            let unclamped_end = start.saturating_add(chunk_size - 1);
            Chunk {
                index,
                start,
                end: unclamped_end.min(last_byte),
                clamped: unclamped_end > last_byte,
            }
        })
        .collect();

    Ok(chunks)
}

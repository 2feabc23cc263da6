use crate::data::Chunk;

/// `Range` header value for a chunk.
///
/// Clamped chunks ask for everything from their start to the end of the
/// resource (`bytes=start-`), the rest ask for their exact inclusive range.
pub fn range_header(chunk: &Chunk) -> String {
    if chunk.clamped {
        format!("bytes={}-", chunk.start)
    } else {
        format!("bytes={}-{}", chunk.start, chunk.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan_chunks;

    #[test]
    fn test_headers_for_planned_chunks() {
        let headers: Vec<_> = plan_chunks(5_242_880, 2_097_152)
            .unwrap()
            .iter()
            .map(range_header)
            .collect();
        assert_eq!(
            headers,
            [
                "bytes=0-2097151",
                "bytes=2097152-4194303",
                "bytes=4194304-"
            ]
        );
    }

    #[test]
    fn test_exact_final_chunk_is_closed() {
        let chunk = Chunk {
            index:   1,
            start:   4,
            end:     7,
            clamped: false,
        };
        assert_eq!(range_header(&chunk), "bytes=4-7");
    }
}

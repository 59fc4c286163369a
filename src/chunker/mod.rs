//! Fixed-size text chunking for document ingestion.
//!
//! [`FixedSizeChunker`] deterministically partitions a text into overlapping
//! windows of whitespace-delimited tokens. It is a pure computation: no I/O,
//! no shared state, safe to call from any number of tasks concurrently.
//!
//! # Example
//!
//! ```
//! use textmill::chunker::FixedSizeChunker;
//! use textmill::types::MetadataMap;
//!
//! let chunker = FixedSizeChunker::new(3, 1).unwrap();
//! let chunks = chunker.chunk("a b c d e", &MetadataMap::new());
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].content, "a b c");
//! assert_eq!(chunks[1].content, "c d e");
//! ```

use serde_json::json;

use crate::types::{AppError, Chunk, MetadataMap, Result};

/// Metadata key carrying the chunk's sequence position.
pub const META_CHUNK_INDEX: &str = "chunk_index";
/// Metadata key carrying the chunk's token count.
pub const META_TOKEN_COUNT: &str = "token_count";

/// Splits text into overlapping windows of whitespace-delimited tokens.
///
/// Construction validates the size/overlap combination once; after that,
/// [`chunk`](Self::chunk) cannot fail for any input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a chunker producing windows of `chunk_size` tokens, with
    /// `chunk_overlap` trailing tokens repeated at the start of the next
    /// window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`. The strict inequality keeps the window
    /// step at least 1, so chunking always terminates.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AppError::Configuration(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(AppError::Configuration(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Configured window size in tokens.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Configured overlap in tokens.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into an ordered sequence of overlapping token windows.
    ///
    /// Tokens are maximal runs of non-whitespace characters; leading, trailing
    /// and repeated whitespace produce no empty tokens. Empty or
    /// whitespace-only input yields an empty Vec, which is not an error.
    ///
    /// Each chunk's metadata is a shallow merge of `base_metadata` with the
    /// synthesized [`META_CHUNK_INDEX`] and [`META_TOKEN_COUNT`] keys; the
    /// synthesized keys win when the caller supplies the same names.
    ///
    /// The final chunk may hold fewer than `chunk_size` tokens. Overlap applies
    /// uniformly between every consecutive pair of chunks, including the last.
    pub fn chunk(&self, text: &str, base_metadata: &MetadataMap) -> Vec<Chunk> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        // Strictly positive by construction.
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::with_capacity(tokens.len().div_ceil(step));
        let mut start = 0;
        let mut index = 0;

        while start < tokens.len() {
            let end = (start + self.chunk_size).min(tokens.len());
            let window = &tokens[start..end];

            let mut metadata = base_metadata.clone();
            metadata.insert(META_CHUNK_INDEX.to_string(), json!(index));
            metadata.insert(META_TOKEN_COUNT.to_string(), json!(window.len()));

            chunks.push(Chunk {
                content: window.join(" "),
                index,
                metadata,
            });

            // Once a window reaches the end of the token sequence the text is
            // fully covered; stepping further would emit windows holding only
            // already-seen tokens.
            if end == tokens.len() {
                break;
            }

            start += step;
            index += 1;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn base_meta(pairs: &[(&str, serde_json::Value)]) -> MetadataMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn contents(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn splits_without_overlap() {
        let chunker = FixedSizeChunker::new(2, 0).unwrap();
        let chunks = chunker.chunk("a b c d e", &MetadataMap::new());

        assert_eq!(contents(&chunks), vec!["a b", "c d", "e"]);
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn splits_with_overlap() {
        let chunker = FixedSizeChunker::new(3, 1).unwrap();
        let chunks = chunker.chunk("a b c d e", &MetadataMap::new());

        assert_eq!(contents(&chunks), vec!["a b c", "c d e"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n  \r\n")]
    fn whitespace_only_yields_no_chunks(#[case] text: &str) {
        let chunker = FixedSizeChunker::new(4, 2).unwrap();
        assert!(chunker.chunk(text, &MetadataMap::new()).is_empty());
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunker = FixedSizeChunker::new(500, 50).unwrap();
        let chunks = chunker.chunk("one", &MetadataMap::new());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "one");
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].metadata[META_TOKEN_COUNT], json!(1));
    }

    #[test]
    fn collapses_interior_whitespace() {
        let chunker = FixedSizeChunker::new(2, 0).unwrap();
        let chunks = chunker.chunk("  a \t b\n\nc  ", &MetadataMap::new());

        assert_eq!(contents(&chunks), vec!["a b", "c"]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(5, 5)]
    #[case(3, 7)]
    fn rejects_invalid_configuration(#[case] size: usize, #[case] overlap: usize) {
        let err = FixedSizeChunker::new(size, overlap).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(200, 50)]
    #[case(500, 499)]
    fn accepts_valid_configuration(#[case] size: usize, #[case] overlap: usize) {
        assert!(FixedSizeChunker::new(size, overlap).is_ok());
    }

    #[rstest]
    #[case(1, 0, 17)]
    #[case(4, 1, 17)]
    #[case(5, 2, 23)]
    #[case(8, 7, 20)]
    #[case(50, 10, 9)]
    fn roundtrip_reconstructs_token_sequence(
        #[case] size: usize,
        #[case] overlap: usize,
        #[case] token_count: usize,
    ) {
        let tokens: Vec<String> = (0..token_count).map(|i| format!("t{}", i)).collect();
        let text = tokens.join(" ");

        let chunker = FixedSizeChunker::new(size, overlap).unwrap();
        let chunks = chunker.chunk(&text, &MetadataMap::new());

        // Drop the first `overlap` tokens of every chunk after the first;
        // what remains must be the original sequence.
        let mut reassembled = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let skip = if i == 0 { 0 } else { overlap };
            reassembled.extend(
                chunk
                    .content
                    .split_whitespace()
                    .skip(skip)
                    .map(String::from),
            );
        }
        assert_eq!(reassembled, tokens);

        // Indices are exactly 0..n with no gaps.
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn merges_base_metadata_into_every_chunk() {
        let chunker = FixedSizeChunker::new(2, 0).unwrap();
        let base = base_meta(&[
            ("source", json!("manual.txt")),
            ("lang", json!("en")),
        ]);
        let chunks = chunker.chunk("a b c", &base);

        assert_eq!(chunks.len(), 2);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata["source"], json!("manual.txt"));
            assert_eq!(chunk.metadata["lang"], json!("en"));
            assert_eq!(chunk.metadata[META_CHUNK_INDEX], json!(i));
        }
        assert_eq!(chunks[0].metadata[META_TOKEN_COUNT], json!(2));
        assert_eq!(chunks[1].metadata[META_TOKEN_COUNT], json!(1));
    }

    #[test]
    fn synthesized_keys_override_base_metadata() {
        let chunker = FixedSizeChunker::new(2, 0).unwrap();
        let base = base_meta(&[
            (META_CHUNK_INDEX, json!("bogus")),
            (META_TOKEN_COUNT, json!(-1)),
        ]);
        let chunks = chunker.chunk("a b c", &base);

        assert_eq!(chunks[1].metadata[META_CHUNK_INDEX], json!(1));
        assert_eq!(chunks[1].metadata[META_TOKEN_COUNT], json!(1));
    }

    #[test]
    fn overlap_applies_to_final_short_chunk() {
        // 4 tokens, size 3, overlap 1: the final window is short but still
        // repeats one token of its predecessor.
        let chunker = FixedSizeChunker::new(3, 1).unwrap();
        let chunks = chunker.chunk("a b c d", &MetadataMap::new());

        assert_eq!(contents(&chunks), vec!["a b c", "c d"]);
        assert_eq!(chunks[1].metadata[META_TOKEN_COUNT], json!(2));
    }

    #[test]
    fn stops_once_text_is_covered() {
        // 7 tokens, size 3, overlap 2: step 1 would allow windows at every
        // token, but chunking ends with the first window that reaches the
        // final token.
        let chunker = FixedSizeChunker::new(3, 2).unwrap();
        let chunks = chunker.chunk("a b c d e f g", &MetadataMap::new());

        assert_eq!(
            contents(&chunks),
            vec!["a b c", "b c d", "c d e", "d e f", "e f g"]
        );
    }

    #[test]
    fn base_metadata_is_not_mutated() {
        let chunker = FixedSizeChunker::new(2, 0).unwrap();
        let base = base_meta(&[("source", json!("doc"))]);
        let before = base.clone();

        chunker.chunk("a b c d", &base);

        assert_eq!(base, before);
    }
}

//! Token-aware text splitting for web pages and search snippets.

use anyhow::{Context, Result};
use std::sync::Arc;
use text_splitter::{ChunkConfig, MarkdownSplitter, TextSplitter};
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Load the BPE tokenizer used by `model` (e.g. `gpt-4` → cl100k_base).
pub fn tokenizer_for(model: &str) -> Result<Arc<CoreBPE>> {
    let bpe = tiktoken_rs::get_bpe_from_model(model)
        .with_context(|| format!("No tokenizer available for model {}", model))?;
    Ok(Arc::new(bpe))
}

/// Splits page text (markdown-aware) and snippets (plain recursive) into
/// chunks of at most `chunk_size` tokens.
pub struct Chunker {
    markdown: MarkdownSplitter<Arc<CoreBPE>>,
    text: TextSplitter<Arc<CoreBPE>>,
}

impl Chunker {
    pub fn new(tokenizer_model: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let bpe = tokenizer_for(tokenizer_model)?;

        let config = || -> Result<ChunkConfig<Arc<CoreBPE>>> {
            Ok(ChunkConfig::new(chunk_size)
                .with_sizer(Arc::clone(&bpe))
                .with_overlap(chunk_overlap)?)
        };

        debug!(
            "Chunker ready: {} tokens/chunk, overlap {}, tokenizer {}",
            chunk_size, chunk_overlap, tokenizer_model
        );

        Ok(Self {
            markdown: MarkdownSplitter::new(config().context("Invalid page chunk config")?),
            text: TextSplitter::new(config().context("Invalid snippet chunk config")?),
        })
    }

    /// Split full page content, respecting markdown structure.
    pub fn split_page(&self, text: &str) -> Vec<String> {
        self.markdown.chunks(text).map(str::to_string).collect()
    }

    /// Split a search-engine snippet.
    pub fn split_snippet(&self, text: &str) -> Vec<String> {
        self.text.chunks(text).map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn chunker(size: usize) -> Chunker {
        Chunker::new("gpt-4", size, 0).unwrap()
    }

    #[test]
    fn chunks_respect_token_bound() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(200);
        let chunker = chunker(32);
        let bpe = tokenizer_for("gpt-4").unwrap();

        let chunks = chunker.split_snippet(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(bpe.encode_ordinary(chunk).len() <= 32, "chunk too large: {:?}", chunk);
        }
    }

    #[test]
    fn page_chunks_keep_all_content() {
        let page = "# Results\n\nArgentina beat France on penalties.\n\n\
                    ## Scorers\n\n- Messi (2)\n- Di Maria\n- Mbappe (3)\n\n"
            .repeat(20);
        let chunks = chunker(40).split_page(&page);
        assert_eq!(non_whitespace(&chunks.concat()), non_whitespace(&page));
    }

    #[test]
    fn snippet_chunks_keep_all_content() {
        let snippet = "Lionel Messi lifted the trophy in Lusail. ".repeat(50);
        let chunks = chunker(16).split_snippet(&snippet);
        assert_eq!(non_whitespace(&chunks.concat()), non_whitespace(&snippet));
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunker(256).split_snippet("  Argentina won.  ");
        assert_eq!(chunks, vec!["Argentina won.".to_string()]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunker(256).split_page("").is_empty());
        assert!(chunker(256).split_snippet("   ").is_empty());
    }

    #[test]
    fn unknown_model_has_no_tokenizer() {
        assert!(tokenizer_for("not-a-model").is_err());
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk() {
        assert!(Chunker::new("gpt-4", 10, 10).is_err());
    }
}

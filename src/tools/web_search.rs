//! Web search tool: re-ranks the pages attached to a question with BM25.

use super::traits::{parse_args, Tool};
use crate::config::ToolsConfig;
use crate::retrieval::Chunker;
use crate::tools::RewardPolicy;
use crate::types::SearchResult;
use anyhow::Result;
use async_trait::async_trait;
use bm25::{Language, SearchEngineBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const NO_REFERENCES: &str = "No References";

/// One web search call: a question plus the pages fetched for it.
#[derive(Debug, Deserialize)]
struct WebSearchArgs {
    query: String,
    #[serde(default, alias = "search_resultss")]
    search_results: Vec<SearchResult>,
}

pub struct WebSearchTool {
    chunker: Chunker,
    top_k: usize,
    reward: RewardPolicy,
}

impl WebSearchTool {
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            chunker: Chunker::new(
                &config.tokenizer_model,
                config.chunk_size,
                config.chunk_overlap,
            )?,
            top_k: config.top_k,
            reward: config.reward.clone(),
        })
    }

    fn chunk_results(&self, results: &[SearchResult]) -> Vec<String> {
        let mut chunks = Vec::new();
        for result in results {
            if !result.page_result.is_empty() {
                chunks.extend(self.chunker.split_page(&result.page_result));
            }
            if !result.page_snippet.is_empty() {
                chunks.extend(self.chunker.split_snippet(&result.page_snippet));
            }
        }
        chunks
    }

    /// Build the reference block for one question.
    fn search(&self, args: &WebSearchArgs) -> String {
        let chunks = self.chunk_results(&args.search_results);
        if chunks.is_empty() {
            return format_references(&[]);
        }

        let indexed = chunks.len();
        let engine = SearchEngineBuilder::<u32>::with_corpus(Language::English, chunks).build();
        let hits = engine.search(&args.query, self.top_k);
        let top: Vec<&str> = hits.iter().map(|h| h.document.contents.trim()).collect();

        debug!(
            "web_search: {} chunks indexed, {} kept for {:?}",
            indexed,
            top.len(),
            args.query
        );
        format_references(&top)
    }
}

/// Render retrieved chunks as the text handed back to the agent.
pub fn format_references(chunks: &[&str]) -> String {
    match chunks {
        [] => NO_REFERENCES.to_string(),
        [only] => {
            let only = only.trim();
            if only.is_empty() {
                NO_REFERENCES.to_string()
            } else {
                only.to_string()
            }
        }
        many => {
            let mut reference = String::new();
            for chunk in many {
                reference.push_str("<DOC>\n");
                reference.push_str(chunk.trim());
                reference.push_str("\n</DOC>\n\n");
            }
            reference
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search for information using Web pages as a knowledge source."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String> {
        let args: WebSearchArgs = parse_args(self.name(), &args)?;
        Ok(self.search(&args))
    }

    async fn batch_execute(&self, args_list: &[serde_json::Value]) -> Result<Vec<String>> {
        let requests = args_list
            .iter()
            .map(|a| parse_args::<WebSearchArgs>(self.name(), a))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(requests.iter().map(|r| self.search(r)).collect())
    }

    fn calculate_reward(&self, _args: &serde_json::Value, result: &str) -> f64 {
        self.reward.score(result)
    }
}

//! Configuration schema for config.toml.

use crate::tools::RewardPolicy;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// CRAG mock API base URL.
    pub mock_api_url: String,

    /// Chat model used for entity extraction.
    pub chat_model: String,

    /// API key for the chat backend.
    pub chat_api_key: String,

    /// OpenAI-compatible chat backend base URL.
    pub chat_base_url: String,

    /// Sequence-classification inference endpoint.
    pub router_url: String,

    /// Model path served by the router (informational, sent in logs).
    pub router_model_path: String,

    /// Classifier label order; `LABEL_i` outputs index into this list.
    pub domain_classes: Vec<String>,

    /// Maximum chunk size in tokens.
    pub chunk_size: usize,

    /// Token overlap between adjacent chunks.
    pub chunk_overlap: usize,

    /// Model whose tokenizer measures chunk sizes.
    pub tokenizer_model: String,

    /// Number of chunks kept per web search.
    pub top_k: usize,

    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Reward assigned to completed tool calls.
    pub reward: RewardPolicy,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mock_api_url: "http://localhost:8000".into(),
            chat_model: "gpt-4o-mini".into(),
            chat_api_key: "sk-".into(),
            chat_base_url: "http://localhost:8001/v1".into(),
            router_url: "http://localhost:8002".into(),
            router_model_path: "models/router/bge-m3/domain".into(),
            domain_classes: ["finance", "music", "movie", "sports", "open"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            chunk_size: 256,
            chunk_overlap: 0,
            tokenizer_model: "gpt-4".into(),
            top_k: 10,
            log_level: "info".into(),
            reward: RewardPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: ToolsConfig = toml::from_str(
            r#"
            mock_api_url = "http://kg:9000"
            top_k = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mock_api_url, "http://kg:9000");
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.chunk_size, 256);
        assert_eq!(cfg.domain_classes.len(), 5);
        assert_eq!(cfg.reward, RewardPolicy::default());
    }

    #[test]
    fn reward_policy_from_toml() {
        let cfg: ToolsConfig = toml::from_str(
            r#"
            [reward]
            kind = "marker"
            marker = "results"
            hit = 1.0
            miss = -0.5
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.reward,
            RewardPolicy::Marker {
                marker: "results".into(),
                hit: 1.0,
                miss: -0.5,
            }
        );
    }
}

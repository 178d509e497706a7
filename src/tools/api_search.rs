//! API search tool: routes each question to a domain and asks the mock
//! knowledge graph about it.

use super::traits::{parse_args, Tool, ToolError};
use crate::config::ToolsConfig;
use crate::crag::{ChatClient, DomainRouter, HttpDomainRouter, KnowledgeGraph, MockApiClient};
use crate::tools::RewardPolicy;
use crate::types::KgQuery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ApiSearchArgs {
    query: String,
    query_time: String,
}

pub struct ApiSearchTool {
    router: Box<dyn DomainRouter>,
    kg: Box<dyn KnowledgeGraph>,
    reward: RewardPolicy,
}

impl ApiSearchTool {
    /// Build the tool against the HTTP backends named in `config`.
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        let chat = ChatClient::new(&config.chat_base_url, &config.chat_api_key, &config.chat_model);
        let kg = MockApiClient::new(&config.mock_api_url, chat);
        let router = HttpDomainRouter::new(
            &config.router_url,
            &config.router_model_path,
            &config.domain_classes,
        )
            .context("Failed to set up domain router")?;

        info!(
            "api_search: router {} ({}), mock API {}",
            config.router_url, config.router_model_path, config.mock_api_url
        );
        Ok(Self::with_backends(
            Box::new(router),
            Box::new(kg),
            config.reward.clone(),
        ))
    }

    /// Build the tool from arbitrary backends.
    pub fn with_backends(
        router: Box<dyn DomainRouter>,
        kg: Box<dyn KnowledgeGraph>,
        reward: RewardPolicy,
    ) -> Self {
        Self { router, kg, reward }
    }
}

#[async_trait]
impl Tool for ApiSearchTool {
    fn name(&self) -> &str {
        "api_search"
    }

    fn description(&self) -> &str {
        "Search for information using Mock API as a knowledge source."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "query_time": {
                    "type": "string",
                    "description": "Time the question was asked"
                }
            },
            "required": ["query", "query_time"]
        })
    }

    fn supports_single_call(&self) -> bool {
        false
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<String> {
        Err(ToolError::Unsupported(self.name().to_string()).into())
    }

    async fn batch_execute(&self, args_list: &[serde_json::Value]) -> Result<Vec<String>> {
        let requests = args_list
            .iter()
            .map(|a| parse_args::<ApiSearchArgs>(self.name(), a))
            .collect::<Result<Vec<_>, _>>()?;

        let mut queries = Vec::with_capacity(requests.len());
        for req in requests {
            let domain = self.router.classify(&req.query).await?;
            debug!("api_search: {:?} -> {}", req.query, domain);
            queries.push(KgQuery {
                query: req.query,
                query_time: req.query_time,
                domain,
            });
        }

        let infos = self.kg.get_kg_info(&queries).await?;
        if infos.len() != queries.len() {
            return Err(ToolError::BatchLengthMismatch {
                expected: queries.len(),
                got: infos.len(),
            }
            .into());
        }
        Ok(infos)
    }

    fn calculate_reward(&self, _args: &serde_json::Value, result: &str) -> f64 {
        self.reward.score(result)
    }
}

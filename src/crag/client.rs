//! CRAG mock knowledge-graph API client.

use crate::crag::inference::ChatClient;
use crate::types::{Domain, KgQuery};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Batched knowledge-graph lookup. One output string per input, in order.
#[async_trait]
pub trait KnowledgeGraph: Send + Sync {
    async fn get_kg_info(&self, queries: &[KgQuery]) -> Result<Vec<String>>;
}

/// Mock API client: extracts entities with a chat model, then queries the
/// domain's lookup endpoint once per entity.
#[derive(Debug, Clone)]
pub struct MockApiClient {
    base_url: String,
    chat: ChatClient,
    http: reqwest::Client,
}

// -- Request / response types -----------------------------------------------

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LookupRequest<'a> {
    Query { query: &'a str },
    Games { date: String, team_name: &'a str },
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct EntityResult {
    entity: String,
    result: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct KgInfo<'a> {
    domain: Domain,
    entities: &'a [String],
    results: Vec<EntityResult>,
}

/// Endpoint (relative to the API base) used to look up an entity in a domain.
pub fn lookup_endpoint(domain: Domain) -> &'static str {
    match domain {
        Domain::Finance => "finance/get_company_name",
        Domain::Music => "music/search_artist_entity_by_name",
        Domain::Movie => "movie/search_movie",
        Domain::Sports => "sports/soccer/get_games_on_date",
        Domain::Open => "open/search_entity_by_name",
    }
}

/// Extract the calendar date from a CRAG query time.
///
/// Handles both `03/05/2024, 23:18:31 PT` and ISO `2024-03-05` forms.
pub fn query_date(query_time: &str) -> Option<NaiveDate> {
    let head = query_time
        .split(|c: char| c == ',' || c == 'T' || c.is_whitespace())
        .next()?;
    NaiveDate::parse_from_str(head, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(head, "%Y-%m-%d"))
        .ok()
}

impl MockApiClient {
    /// Create a new mock API client.
    pub fn new(base_url: &str, chat: ChatClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            chat,
            http: reqwest::Client::new(),
        }
    }

    /// Look up a single entity in the given domain.
    async fn lookup(&self, domain: Domain, entity: &str, query_time: &str) -> Result<serde_json::Value> {
        let endpoint = lookup_endpoint(domain);
        let body = match domain {
            Domain::Sports => LookupRequest::Games {
                date: query_date(query_time)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| query_time.to_string()),
                team_name: entity,
            },
            _ => LookupRequest::Query { query: entity },
        };

        debug!("Mock API lookup: {} {}", endpoint, entity);

        let resp = self
            .http
            .post(format!("{}/{}", self.base_url, endpoint))
            .json(&body)
            .send()
            .await
            .context("Mock API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Mock API {} failed ({}): {}", endpoint, status, body);
        }

        let body: LookupResponse = resp.json().await.context("Failed to parse mock API response")?;
        Ok(body.result)
    }

    async fn kg_info(&self, q: &KgQuery) -> Result<String> {
        let entities = self.chat.extract_entities(&q.query, q.domain).await?;

        let mut results = Vec::with_capacity(entities.len());
        for entity in &entities {
            let result = self.lookup(q.domain, entity, &q.query_time).await?;
            results.push(EntityResult {
                entity: entity.clone(),
                result,
            });
        }

        let info = KgInfo {
            domain: q.domain,
            entities: &entities,
            results,
        };
        serde_json::to_string(&info).context("Failed to serialize KG info")
    }
}

#[async_trait]
impl KnowledgeGraph for MockApiClient {
    async fn get_kg_info(&self, queries: &[KgQuery]) -> Result<Vec<String>> {
        let mut infos = Vec::with_capacity(queries.len());
        for q in queries {
            infos.push(self.kg_info(q).await?);
        }
        info!("Fetched KG info for {} queries", infos.len());
        Ok(infos)
    }
}

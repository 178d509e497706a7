//! Chat completions against an OpenAI-compatible backend.
//!
//! Used by the knowledge-graph adapter to pull entity names out of questions.

use crate::types::Domain;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Chat client wrapping an OpenAI-compatible `/chat/completions` API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

/// A chat message sent to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

// -- OpenAI-compatible request/response types --------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

const ENTITY_SYSTEM_PROMPT: &str = "You extract named entities from questions. \
Reply with a JSON array of entity names and nothing else.";

impl ChatClient {
    /// Create a new chat client.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Run a single chat completion and return the assistant text.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: 0.0,
        };

        debug!("Chat request to model: {}", self.model);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Chat request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Chat completion failed ({}): {}", status, body);
        }

        let body: ChatResponse = resp.json().await.context("Failed to parse chat response")?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    /// Ask the model which entities a question is about.
    ///
    /// Falls back to the whole query when the reply is not a JSON array.
    pub async fn extract_entities(&self, query: &str, domain: Domain) -> Result<Vec<String>> {
        let messages = [
            ChatMessage {
                role: ChatRole::System,
                content: ENTITY_SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: format!("Domain: {}\nQuestion: {}", domain, query),
            },
        ];

        let reply = self.chat(&messages).await?;
        match parse_entity_list(&reply) {
            Some(entities) if !entities.is_empty() => Ok(entities),
            _ => {
                warn!("Could not parse entities from reply, using the query itself");
                Ok(vec![query.to_string()])
            }
        }
    }
}

/// Pull the first JSON string array out of a model reply.
fn parse_entity_list(reply: &str) -> Option<Vec<String>> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end < start {
        return None;
    }
    let entities: Vec<String> = serde_json::from_str(&reply[start..=end]).ok()?;
    Some(
        entities
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn entity_list_inside_code_fence() {
        let reply = "```json\n[\"Argentina\", \" France \"]\n```";
        assert_eq!(
            parse_entity_list(reply).unwrap(),
            vec!["Argentina".to_string(), "France".to_string()]
        );
    }

    #[test]
    fn entity_list_rejects_prose() {
        assert!(parse_entity_list("I think it's Argentina").is_none());
        assert!(parse_entity_list("] oops [").is_none());
    }

    #[tokio::test]
    async fn extract_entities_posts_to_chat_completions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "[\"FIFA World Cup 2022\"]" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(&format!("{}/v1/", server.uri()), "sk-", "gpt-4o-mini");
        let entities = client
            .extract_entities("Who won the 2022 World Cup?", Domain::Sports)
            .await
            .unwrap();
        assert_eq!(entities, vec!["FIFA World Cup 2022".to_string()]);
    }

    #[tokio::test]
    async fn unparseable_reply_falls_back_to_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "no idea" } }]
            })))
            .mount(&server)
            .await;

        let client = ChatClient::new(&server.uri(), "sk-", "m");
        let entities = client.extract_entities("what is AAPL?", Domain::Finance).await.unwrap();
        assert_eq!(entities, vec!["what is AAPL?".to_string()]);
    }

    #[tokio::test]
    async fn server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = ChatClient::new(&server.uri(), "sk-", "m");
        let err = client.chat(&[]).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}

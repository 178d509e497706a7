//! Tool trait definition.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Definition of a tool exposed to the policy model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Errors raised by the tool contract itself (as opposed to backend failures).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{0}' does not support single-call execution; use batch_execute")]
    Unsupported(String),
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("unknown tool environment: {0}")]
    UnknownEnvironment(String),
    #[error("backend returned {got} results for a batch of {expected}")]
    BatchLengthMismatch { expected: usize, got: usize },
}

/// A tool callable by an agent, one call at a time or in batches.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used in function calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Registration payload for the agent runtime.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }

    /// Whether `execute` is implemented. Batch-only tools return false.
    fn supports_single_call(&self) -> bool {
        true
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: serde_json::Value) -> Result<String>;

    /// Execute a batch of calls. Results line up with `args_list` one-to-one.
    ///
    /// The default runs `execute` sequentially; any failure aborts the batch.
    async fn batch_execute(&self, args_list: &[serde_json::Value]) -> Result<Vec<String>> {
        let mut results = Vec::with_capacity(args_list.len());
        for args in args_list {
            results.push(self.execute(args.clone()).await?);
        }
        Ok(results)
    }

    /// Scalar reward for a completed call. Must be pure.
    fn calculate_reward(&self, args: &serde_json::Value, result: &str) -> f64;
}

/// Deserialize raw call arguments into a typed request.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(
    tool: &str,
    args: &serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(args.clone()).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the query back."
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            })
        }

        async fn execute(&self, args: serde_json::Value) -> Result<String> {
            #[derive(Deserialize)]
            struct Args {
                query: String,
            }
            let args: Args = parse_args(self.name(), &args)?;
            Ok(args.query)
        }

        fn calculate_reward(&self, _args: &serde_json::Value, result: &str) -> f64 {
            result.len() as f64
        }
    }

    #[tokio::test]
    async fn default_batch_preserves_order() {
        let args: Vec<_> = ["c", "a", "b"].iter().map(|q| json!({ "query": q })).collect();
        let results = Echo.batch_execute(&args).await.unwrap();
        assert_eq!(results, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn default_batch_fails_whole_batch_on_bad_item() {
        let args = vec![json!({ "query": "ok" }), json!({ "limit": 3 })];
        let err = Echo.batch_execute(&args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ToolError>(),
            Some(ToolError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn definition_uses_trait_accessors() {
        let def = Echo.definition();
        assert_eq!(def.name, "echo");
        assert_eq!(def.parameters["required"][0], "query");
        assert!(Echo.supports_single_call());
    }
}

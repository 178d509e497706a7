//! CRAG rows in, training records out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DATA_SOURCE: &str = "crag";

/// Prompt preamble telling the policy how to use tools and format answers.
pub const INSTRUCTION: &str = r#"Answer the given question. You can use the tools provided to you to answer the question. You can use the tool as many times as you want.
You must first conduct reasoning inside <think>...</think>. If you need to use the tool, you can use the tool call <tool_call>...</tool_call> to call the tool after <think>...</think>.
When you have the final answer, you can output the answer inside <answer>...</answer>.

Output format for tool call:
<think>
...
</think>
<tool_call>
...
</tool_call>

Output format for answer:
<think>
...
</think>
<answer>
...
</answer>
"#;

/// One question from a CRAG split, with every field defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct CragExample {
    pub interaction_id: String,
    pub query_time: String,
    pub domain: String,
    pub question_type: String,
    pub static_or_dynamic: String,
    pub query: String,
    pub answer: String,
    pub search_results: Value,
}

/// Read a field as text: strings verbatim, other values as JSON, missing as "".
fn text_field(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Normalise `search_results` to a JSON value.
///
/// Arrays and objects are kept; strings are parsed as JSON. Anything missing
/// or unparseable becomes an empty list.
fn search_results_field(item: &Value) -> Value {
    match item.get("search_results") {
        Some(v @ (Value::Array(_) | Value::Object(_))) => v.clone(),
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_else(|_| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}

impl CragExample {
    pub fn from_json(item: &Value) -> Self {
        Self {
            interaction_id: text_field(item, "interaction_id"),
            query_time: text_field(item, "query_time"),
            domain: text_field(item, "domain"),
            question_type: text_field(item, "question_type"),
            static_or_dynamic: text_field(item, "static_or_dynamic"),
            query: text_field(item, "query"),
            answer: text_field(item, "answer"),
            search_results: search_results_field(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardModel {
    pub style: String,
    pub ground_truth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraInfo {
    pub split: String,
    pub index: String,
    pub answer: String,
    pub question: String,
    /// JSON text of the original search results.
    pub search_results: String,
    pub interaction_id: String,
    pub query_time: String,
    pub domain: String,
    pub question_type: String,
    pub static_or_dynamic: String,
}

/// A row of the training/validation parquet files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub data_source: String,
    pub prompt: Vec<PromptMessage>,
    pub ability: String,
    pub reward_model: RewardModel,
    pub extra_info: ExtraInfo,
}

impl TrainingRecord {
    /// Map an example at position `index` of `split` into a training record.
    pub fn from_example(example: &CragExample, split: &str, index: usize) -> Self {
        Self {
            data_source: DATA_SOURCE.to_string(),
            prompt: vec![PromptMessage {
                role: "user".to_string(),
                content: format!("{}Question: {}", INSTRUCTION, example.query),
            }],
            ability: DATA_SOURCE.to_string(),
            reward_model: RewardModel {
                style: "rule".to_string(),
                ground_truth: example.answer.clone(),
            },
            extra_info: ExtraInfo {
                split: split.to_string(),
                index: index.to_string(),
                answer: example.answer.clone(),
                question: example.query.clone(),
                search_results: example.search_results.to_string(),
                interaction_id: example.interaction_id.clone(),
                query_time: example.query_time.clone(),
                domain: example.domain.clone(),
                question_type: example.question_type.clone(),
                static_or_dynamic: example.static_or_dynamic.clone(),
            },
        }
    }
}

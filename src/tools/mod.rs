pub mod api_search;
pub mod reward;
pub mod traits;
pub mod web_search;

pub use api_search::ApiSearchTool;
pub use reward::RewardPolicy;
pub use traits::{Tool, ToolDefinition, ToolError};
pub use web_search::WebSearchTool;

use crate::config::ToolsConfig;
use anyhow::Result;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Tool environments
// ---------------------------------------------------------------------------

/// Named toolsets an agent can be started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEnv {
    CragApiSearch,
    CragWebSearch,
}

impl fmt::Display for ToolEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CragApiSearch => write!(f, "crag_api_search"),
            Self::CragWebSearch => write!(f, "crag_web_search"),
        }
    }
}

impl FromStr for ToolEnv {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crag_api_search" => Ok(Self::CragApiSearch),
            "crag_web_search" => Ok(Self::CragWebSearch),
            other => Err(ToolError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Build the default toolset for an environment.
pub fn default_tools(env: ToolEnv, config: &ToolsConfig) -> Result<Vec<Box<dyn Tool>>> {
    let tools: Vec<Box<dyn Tool>> = match env {
        ToolEnv::CragApiSearch => vec![Box::new(ApiSearchTool::new(config)?)],
        ToolEnv::CragWebSearch => vec![Box::new(WebSearchTool::new(config)?)],
    };
    Ok(tools)
}

/// Registration payloads for every tool in a toolset.
pub fn tool_definitions(tools: &[Box<dyn Tool>]) -> Vec<ToolDefinition> {
    tools.iter().map(|t| t.definition()).collect()
}

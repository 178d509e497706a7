//! Shared types used across the CRAG tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// Knowledge domains a query can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Finance,
    Music,
    Movie,
    Sports,
    /// Catch-all for encyclopedic questions.
    Open,
}

impl Domain {
    /// Every domain, in the classifier's label order.
    pub const ALL: [Domain; 5] = [
        Self::Finance,
        Self::Music,
        Self::Movie,
        Self::Sports,
        Self::Open,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Music => "music",
            Self::Movie => "movie",
            Self::Sports => "sports",
            Self::Open => "open",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == label)
            .ok_or_else(|| anyhow::anyhow!("Unknown domain label: {}", s))
    }
}

// ---------------------------------------------------------------------------
// Web search inputs
// ---------------------------------------------------------------------------

/// One web search hit attached to a CRAG question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Full page text (markdown-ish), often empty.
    #[serde(default)]
    pub page_result: String,
    /// Short summary shown by the search engine.
    #[serde(default)]
    pub page_snippet: String,
}

// ---------------------------------------------------------------------------
// Knowledge-graph lookups
// ---------------------------------------------------------------------------

/// A single knowledge-graph lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KgQuery {
    pub query: String,
    pub query_time: String,
    pub domain: Domain,
}

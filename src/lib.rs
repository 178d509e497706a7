//! crag-tools — search tools for RL agents on the CRAG benchmark.
//!
//! Two tools share one contract ([`tools::Tool`]): an API search that routes
//! questions to a domain and queries a mock knowledge graph, and a web search
//! that re-ranks attached pages with BM25. The [`dataset`] module turns the
//! raw CRAG splits into parquet training files.

pub mod config;
pub mod crag;
pub mod dataset;
pub mod retrieval;
pub mod tools;
pub mod types;

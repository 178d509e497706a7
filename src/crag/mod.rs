pub mod client;
pub mod inference;
pub mod router;

pub use client::{KnowledgeGraph, MockApiClient};
pub use inference::ChatClient;
pub use router::{DomainRouter, HttpDomainRouter};

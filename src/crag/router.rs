//! Domain routing via a sequence-classification inference endpoint.

use crate::types::Domain;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Assigns a knowledge domain to a natural-language query.
#[async_trait]
pub trait DomainRouter: Send + Sync {
    async fn classify(&self, query: &str) -> Result<Domain>;
}

/// Router backed by a text-classification server exposing `POST /predict`.
#[derive(Debug, Clone)]
pub struct HttpDomainRouter {
    base_url: String,
    model: String,
    classes: Vec<Domain>,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f64,
}

impl HttpDomainRouter {
    /// Create a router for the classifier checkpoint at `model`.
    /// `classes` gives the label order the model was trained with.
    pub fn new(base_url: &str, model: &str, classes: &[String]) -> Result<Self> {
        let classes = classes
            .iter()
            .map(|c| c.parse::<Domain>())
            .collect::<Result<Vec<_>>>()
            .context("Invalid domain class list")?;
        if classes.is_empty() {
            bail!("Domain router needs at least one class");
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            classes,
            http: reqwest::Client::new(),
        })
    }

    /// Map a raw classifier label onto a domain.
    ///
    /// Accepts domain names directly or `LABEL_<i>` indices into the class list.
    fn resolve_label(&self, label: &str) -> Result<Domain> {
        if let Ok(domain) = label.parse::<Domain>() {
            return Ok(domain);
        }
        if let Some(idx) = label.strip_prefix("LABEL_").and_then(|i| i.parse::<usize>().ok()) {
            if let Some(domain) = self.classes.get(idx) {
                return Ok(*domain);
            }
        }
        bail!("Classifier returned unknown label: {}", label)
    }
}

#[async_trait]
impl DomainRouter for HttpDomainRouter {
    async fn classify(&self, query: &str) -> Result<Domain> {
        let resp = self
            .http
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest {
                inputs: query,
                model: &self.model,
            })
            .send()
            .await
            .context("Domain router request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Domain router failed ({}): {}", status, body);
        }

        let predictions: Vec<Prediction> =
            resp.json().await.context("Failed to parse router response")?;

        let best = predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| anyhow::anyhow!("Domain router returned no predictions"))?;

        let domain = self.resolve_label(&best.label)?;
        debug!("Routed query to {} (score {:.3})", domain, best.score);
        Ok(domain)
    }
}

//! Model discovery with a static fallback.

use crate::client::ModelSource;
use crate::observability::CATALOG_FETCH_FAILURES;

/// Models offered when the provider's list cannot be fetched.
pub const FALLBACK_MODELS: &[&str] = &[
    "llama-3.1-8b-instant",
    "llama-3.1-70b-versatile",
    "mixtral-8x7b-32768",
    "gemma-7b-it",
];

/// The model selected by default when the provider offers it.
pub const PREFERRED_DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// Fetches the provider's model list, yielding an empty list on any failure.
pub async fn list_models(source: &dyn ModelSource) -> Vec<String> {
    match source.list_models().await {
        Ok(models) => {
            tracing::info!(count = models.len(), "fetched model list");
            models
        }
        Err(err) => {
            CATALOG_FETCH_FAILURES.click();
            tracing::warn!(error = %err, "could not fetch model list; using fallback models");
            Vec::new()
        }
    }
}

/// The set of models a user can pick from, fetched once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    fetched: Vec<String>,
}

impl ModelCatalog {
    /// Builds a catalog from an already-fetched list (possibly empty).
    pub fn new(fetched: Vec<String>) -> Self {
        Self { fetched }
    }

    /// Fetches the list from `source` and builds the catalog.
    pub async fn fetch(source: &dyn ModelSource) -> Self {
        Self::new(list_models(source).await)
    }

    /// The list as the provider returned it; empty if the fetch failed.
    pub fn fetched(&self) -> &[String] {
        &self.fetched
    }

    /// The fetched models, or the fallback list when none were fetched.
    pub fn choices(&self) -> Vec<String> {
        if self.fetched.is_empty() {
            FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            self.fetched.clone()
        }
    }

    /// The model selected before the user picks one.
    ///
    /// The preferred default wins when it is among the offered models: the fetched list, or the
    /// fallback list when nothing was fetched.  Otherwise the first fallback model is used.
    pub fn default_model(&self) -> String {
        let offered = if self.fetched.is_empty() {
            FALLBACK_MODELS.contains(&PREFERRED_DEFAULT_MODEL)
        } else {
            self.fetched.iter().any(|m| m == PREFERRED_DEFAULT_MODEL)
        };
        if offered {
            PREFERRED_DEFAULT_MODEL.to_string()
        } else {
            FALLBACK_MODELS[0].to_string()
        }
    }
}

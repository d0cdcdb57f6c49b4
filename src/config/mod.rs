pub mod vocabulary;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub oracle: OracleConfig,
    pub search: SearchConfig,
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub similarity_url: Option<String>,
    pub lemmatizer_url: Option<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub concurrency: usize,
    pub min_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub tags_path: PathBuf,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let similarity_url = std::env::var("ORACLE_URL").ok().filter(|u| !u.is_empty());
        let lemmatizer_url = std::env::var("LEMMATIZER_URL")
            .ok()
            .filter(|u| !u.is_empty());

        let timeout_ms = std::env::var("ORACLE_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid ORACLE_TIMEOUT_MS value".to_string()))?;

        let concurrency = std::env::var("SEARCH_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SEARCH_CONCURRENCY value".to_string()))?;

        let min_score = std::env::var("SEARCH_MIN_SCORE")
            .unwrap_or_else(|_| "0.0".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SEARCH_MIN_SCORE value".to_string()))?;

        let tags_path = std::env::var("TAGS_PATH")
            .unwrap_or_else(|_| "tags.json".to_string())
            .into();

        Ok(Settings {
            oracle: OracleConfig {
                similarity_url,
                lemmatizer_url,
                timeout_ms,
                user_agent: format!("Larder/{}", env!("CARGO_PKG_VERSION")),
            },
            search: SearchConfig {
                concurrency,
                min_score,
            },
            vocabulary: VocabularyConfig { tags_path },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.oracle.timeout_ms == 0 {
            return Err(Error::Config("Oracle timeout must be non-zero".to_string()));
        }

        if self.search.concurrency == 0 {
            return Err(Error::Config(
                "Search concurrency must be non-zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.search.min_score) {
            return Err(Error::Config(
                "Search min score must be between 0 and 1".to_string(),
            ));
        }

        for (name, url) in [
            ("ORACLE_URL", &self.oracle.similarity_url),
            ("LEMMATIZER_URL", &self.oracle.lemmatizer_url),
        ] {
            if let Some(url) = url {
                validate_service_url(name, url)?;
            }
        }

        Ok(())
    }
}

fn validate_service_url(name: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("Invalid {name} '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Invalid protocol '{}' in {name}. Allowed protocols: http, https",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(Error::Config(format!("{name} must have a valid host")));
    }

    Ok(())
}

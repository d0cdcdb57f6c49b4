use crate::error::Result;
use crate::matcher::oracle::{Lemmatizer, OracleError, SimilarityOracle};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    a: &'a str,
    b: &'a str,
}

#[derive(Deserialize)]
struct SimilarityResponse {
    score: f32,
}

#[derive(Serialize)]
struct LemmaRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct LemmaResponse {
    lemmas: Vec<String>,
}

fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(OracleError::Request)?;
    Ok(client)
}

/// Resolve `path` under `base_url`, keeping any path prefix of the base
fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path)?)
}

fn check_status(response: Response) -> std::result::Result<Response, OracleError> {
    if !response.status().is_success() {
        return Err(OracleError::Unavailable(format!(
            "HTTP {}",
            response.status()
        )));
    }
    Ok(response)
}

/// Similarity oracle behind `POST {base}/similarity`
#[derive(Clone)]
pub struct HttpSimilarityOracle {
    client: Client,
    endpoint: Url,
}

impl HttpSimilarityOracle {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            endpoint: endpoint(base_url, "similarity")?,
        })
    }
}

#[async_trait]
impl SimilarityOracle for HttpSimilarityOracle {
    async fn score(&self, text_a: &str, text_b: &str) -> std::result::Result<f32, OracleError> {
        debug!("Requesting similarity from {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&SimilarityRequest {
                a: text_a,
                b: text_b,
            })
            .send()
            .await?;

        let body: SimilarityResponse = check_status(response)?
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        Ok(body.score)
    }
}

/// Lemmatizer behind `POST {base}/lemmas`
#[derive(Clone)]
pub struct HttpLemmatizer {
    client: Client,
    endpoint: Url,
}

impl HttpLemmatizer {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            endpoint: endpoint(base_url, "lemmas")?,
        })
    }
}

#[async_trait]
impl Lemmatizer for HttpLemmatizer {
    async fn lemmas(&self, text: &str) -> std::result::Result<HashSet<String>, OracleError> {
        debug!("Requesting lemmas from {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&LemmaRequest { text })
            .send()
            .await?;

        let body: LemmaResponse = check_status(response)?
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        Ok(body.lemmas.into_iter().collect())
    }
}

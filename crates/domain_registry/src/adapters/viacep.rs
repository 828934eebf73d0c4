//! CEP lookup adapter backed by the ViaCEP public API
//!
//! One GET per lookup, no retries. Any transport error, non-success status
//! or ViaCEP "erro" payload is reported as an unresolvable CEP.

use std::time::Duration;

use async_trait::async_trait;
use core_kernel::DomainPort;
use serde::Deserialize;

use crate::cep::{normalize_cep, CepAddress, CepLookup};

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(config: ViaCepConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, cep: &str) -> Result<Option<ViaCepResponse>, reqwest::Error> {
        let url = format!("{}/{}/json/", self.base_url, cep);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(cep, status = %response.status(), "viacep returned non-success status");
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }
}

impl DomainPort for ViaCepClient {}

#[async_trait]
impl CepLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Option<CepAddress> {
        let normalized = normalize_cep(cep)?;
        let body = match self.fetch(&normalized).await {
            Ok(body) => body?,
            Err(error) => {
                tracing::warn!(cep = %normalized, %error, "viacep request failed");
                return None;
            }
        };
        if body.erro.unwrap_or(false) {
            tracing::debug!(cep = %normalized, "viacep reported unknown cep");
            return None;
        }
        let uf = body.uf?;
        Some(CepAddress {
            cep: body.cep.unwrap_or(normalized),
            street: body.logradouro.unwrap_or_default(),
            district: body.bairro.unwrap_or_default(),
            city: body.localidade.unwrap_or_default(),
            uf,
        })
    }
}

/// Wire format of a ViaCEP response; unknown CEPs come back as `{"erro": true}`
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    cep: Option<String>,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    erro: Option<bool>,
}

use crate::config::ExtractionConfig;
use crate::domain::ports::{CrawlRequest, CrawlResult, ExtractionGateway, ExtractionSchema};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PROVIDER: &str = "oxylabs";

#[derive(Serialize)]
struct SchemaRequest<'a> {
    user_prompt: &'a str,
}

#[derive(Deserialize)]
struct SchemaResponse {
    openapi_schema: serde_json::Value,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    domain: &'a str,
    output_format: &'a str,
    auxiliary_prompt: &'a str,
    openapi_schema: &'a serde_json::Value,
    return_sources_limit: u32,
}

#[derive(Deserialize)]
struct RunCreated {
    run_id: String,
}

#[derive(Deserialize)]
struct RunStatus {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Oxylabs AI Studio 爬蟲客戶端：產生 schema，啟動爬取、輪詢到完成後取回資料
pub struct OxylabsGateway {
    client: Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl OxylabsGateway {
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| ScoutError::MissingCredential {
                provider: PROVIDER.to_string(),
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            max_polls: config.max_polls,
        })
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScoutError::Gateway {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, run_id: &str) -> Result<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
            .query(&[("run_id", run_id)])
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn wait_for_run(&self, run_id: &str) -> Result<()> {
        for attempt in 1..=self.max_polls {
            let run: RunStatus = self.get_json("/extract/run", run_id).await?;
            match run.status.as_str() {
                "completed" => return Ok(()),
                "failed" => {
                    return Err(ScoutError::Gateway {
                        status: 200,
                        message: run
                            .message
                            .unwrap_or_else(|| format!("run {} failed", run_id)),
                    });
                }
                other => {
                    tracing::debug!(run_id, status = other, attempt, "Crawl run still in progress");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(ScoutError::Gateway {
            status: 408,
            message: format!("run {} not finished after {} polls", run_id, self.max_polls),
        })
    }
}

#[async_trait]
impl ExtractionGateway for OxylabsGateway {
    async fn generate_schema(&self, prompt: &str) -> Result<ExtractionSchema> {
        let resp = self
            .client
            .post(format!("{}/generate-params", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&SchemaRequest {
                user_prompt: prompt,
            })
            .send()
            .await?;

        let schema: SchemaResponse = Self::check(resp).await?.json().await?;
        Ok(ExtractionSchema(schema.openapi_schema))
    }

    async fn crawl(&self, request: CrawlRequest) -> Result<Option<CrawlResult>> {
        let resp = self
            .client
            .post(format!("{}/extract/run", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&RunRequest {
                domain: &request.url,
                output_format: request.output_format.as_str(),
                auxiliary_prompt: &request.user_prompt,
                openapi_schema: &request.schema.0,
                return_sources_limit: request.return_sources_limit,
            })
            .send()
            .await?;

        let run: RunCreated = Self::check(resp).await?.json().await?;
        tracing::debug!(run_id = %run.run_id, url = %request.url, "Crawl run started");

        self.wait_for_run(&run.run_id).await?;

        let result: Option<CrawlResult> = self.get_json("/extract/run/data", &run.run_id).await?;
        tracing::debug!(
            run_id = %run.run_id,
            items = result.as_ref().and_then(|r| r.data.as_ref()).map_or(0, |d| d.len()),
            "Crawl run data fetched"
        );
        Ok(result)
    }
}

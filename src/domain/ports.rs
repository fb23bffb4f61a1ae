use crate::domain::model::{Opportunity, ScannedOpportunity};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 擷取服務依自然語言提示產生的欄位 schema，爬取時原樣送回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSchema(pub serde_json::Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub url: String,
    pub user_prompt: String,
    pub output_format: OutputFormat,
    pub schema: ExtractionSchema,
    pub return_sources_limit: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlResult {
    #[serde(default)]
    pub data: Option<Vec<serde_json::Value>>,
}

#[async_trait]
pub trait ExtractionGateway: Send + Sync {
    async fn generate_schema(&self, prompt: &str) -> Result<ExtractionSchema>;
    async fn crawl(&self, request: CrawlRequest) -> Result<Option<CrawlResult>>;
}

/// 選出單次掃描要爬取的來源
pub trait SourceSelector: Send + Sync {
    fn select(&self, candidates: &[&'static str]) -> Option<&'static str>;
}

pub trait OpportunityStore: Send + Sync {
    /// 加上時間戳後追加 `records`，回傳寫入筆數
    fn append(
        &self,
        records: &[Opportunity],
    ) -> impl std::future::Future<Output = Result<usize>> + Send;

    /// 目前所有記錄；儲存不存在或無法讀取時為空
    fn read_all(&self) -> impl std::future::Future<Output = Vec<ScannedOpportunity>> + Send;
}

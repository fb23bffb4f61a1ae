use crate::core::fallback::FallbackSynthesizer;
use crate::core::normalizer::normalize_items;
use crate::core::registry::SourceRegistry;
use crate::domain::model::{Opportunity, ScanRequest};
use crate::domain::ports::{CrawlRequest, ExtractionGateway, OutputFormat, SourceSelector};
use crate::utils::error::{Result, ScoutError};

pub const SCHEMA_PROMPT: &str =
    "Extract items with: title, source_organization, deadline, budget_estimate, summary";

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub return_sources_limit: u32,
    pub output_format: OutputFormat,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            return_sources_limit: 10,
            output_format: OutputFormat::Json,
        }
    }
}

/// 依產業與地點組出爬取指令
pub fn build_instruction(sector: Option<&str>, location: Option<&str>) -> String {
    let mut prompt = "List all tender notices and procurement opportunities".to_string();
    if let Some(sector) = sector {
        prompt.push_str(&format!(" related to {}", sector));
    }
    if let Some(location) = location {
        prompt.push_str(&format!(" in {}", location));
    }
    prompt.push_str(". Extract deadline, budget, issuing authority, and description.");
    prompt
}

/// 單次掃描：選來源、爬取、正規化，沒有可用結果時改用備援資料
pub struct TenderScanner<G: ExtractionGateway, R: SourceSelector> {
    gateway: Option<G>,
    selector: R,
    registry: SourceRegistry,
    fallback: FallbackSynthesizer,
    settings: ScanSettings,
}

impl<G: ExtractionGateway, R: SourceSelector> TenderScanner<G, R> {
    /// 擷取服務無法使用 (例如缺少 API key) 時 `gateway` 為 `None`
    pub fn new(gateway: Option<G>, selector: R, settings: ScanSettings) -> Self {
        Self {
            gateway,
            selector,
            registry: SourceRegistry::new(),
            fallback: FallbackSynthesizer::new(),
            settings,
        }
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    pub async fn find_tenders(&self, request: &ScanRequest) -> Result<Vec<Opportunity>> {
        let Some(gateway) = &self.gateway else {
            tracing::warn!("⚠️ Extraction gateway unavailable, returning system notice");
            return Ok(vec![Opportunity::system_notice(
                "Error: API Key Missing",
                "Please set OXYLABS_API_KEY",
            )]);
        };

        let sector = request.sector_filter();
        let location = request.location_filter();

        let candidates = self.registry.representative_sources();
        let target_url =
            self.selector
                .select(&candidates)
                .ok_or_else(|| ScoutError::OrchestrationFailure {
                    message: "no source available to scan".to_string(),
                })?;

        let instruction = build_instruction(sector, location);
        tracing::debug!("Crawl instruction: {}", instruction);

        let opportunities = match self.crawl_source(gateway, target_url, &instruction).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!("❌ {}", e);
                Vec::new()
            }
        };

        if opportunities.is_empty() {
            tracing::info!(
                "No live results for sector '{}', using fallback data",
                sector.unwrap_or("all")
            );
            return Ok(self.fallback.synthesize(sector, location));
        }

        tracing::info!(
            "✅ Found {} opportunities at {}",
            opportunities.len(),
            target_url
        );
        Ok(opportunities)
    }

    async fn crawl_source(
        &self,
        gateway: &G,
        url: &str,
        instruction: &str,
    ) -> Result<Vec<Opportunity>> {
        let crawl_failure = |e: ScoutError| ScoutError::SourceCrawlFailure {
            url: url.to_string(),
            message: e.to_string(),
        };

        let schema = gateway
            .generate_schema(SCHEMA_PROMPT)
            .await
            .map_err(crawl_failure)?;

        tracing::info!("🌐 Crawling source: {}", url);
        let result = gateway
            .crawl(CrawlRequest {
                url: url.to_string(),
                user_prompt: instruction.to_string(),
                output_format: self.settings.output_format,
                schema,
                return_sources_limit: self.settings.return_sources_limit,
            })
            .await
            .map_err(crawl_failure)?;

        let items = result.and_then(|r| r.data);
        Ok(normalize_items(items.as_deref(), url))
    }
}

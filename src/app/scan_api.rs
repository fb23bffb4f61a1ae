use crate::core::scanner::TenderScanner;
use crate::domain::model::{Opportunity, ScanRequest};
use crate::domain::ports::{ExtractionGateway, SourceSelector};
use serde::{Deserialize, Serialize};

/// 即時掃描的回應；找不到資料仍是成功 (附備援記錄)，`success: false` 只代表掃描本身失敗
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunities: Option<Vec<Opportunity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResponse {
    pub fn completed(opportunities: Vec<Opportunity>) -> Self {
        Self {
            success: true,
            count: Some(opportunities.len()),
            opportunities: Some(opportunities),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            opportunities: None,
            error: Some(error.into()),
        }
    }
}

/// 即時掃描，結果直接回傳不寫入儲存
pub async fn handle_scan<G, R>(scanner: &TenderScanner<G, R>, request: ScanRequest) -> ScanResponse
where
    G: ExtractionGateway,
    R: SourceSelector,
{
    match scanner.find_tenders(&request).await {
        Ok(opportunities) => ScanResponse::completed(opportunities),
        Err(e) => {
            tracing::error!(
                "❌ Scan failed (Category: {:?}, Severity: {:?}): {}",
                e.category(),
                e.severity(),
                e
            );
            ScanResponse::failed(e.to_string())
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 系統自行產生 (非爬取) 記錄的來源標籤
pub const SYSTEM_SOURCE: &str = "System";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub title: String,
    pub source: String,
    pub details: OpportunityDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityDetails {
    pub deadline_date: Option<String>,
    pub issuing_authority: Option<String>,
    pub budget: Option<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 預算可能是數字，也可能是文字 (例如 "Confidential"、"150,000 USD")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Budget {
    Amount(serde_json::Number),
    Text(String),
}

impl Opportunity {
    /// 系統提示記錄，例如缺少 API key
    pub fn system_notice(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            source: SYSTEM_SOURCE.to_string(),
            details: OpportunityDetails {
                description: Some(description.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn is_system_notice(&self) -> bool {
        self.source == SYSTEM_SOURCE
    }

    /// `deadline_date` 為 ISO `YYYY-MM-DD` 格式時解析成日期
    pub fn deadline(&self) -> Option<NaiveDate> {
        self.details
            .deadline_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    /// 以來源、標題、截止日計算的雜湊；不同次掃描看到的同一公告共用 id
    pub fn stable_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.title.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.details.deadline_date.as_deref().unwrap_or("").as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// 儲存中的招標記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedOpportunity {
    pub id: String,
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub scanned_at: DateTime<Utc>,
}

impl ScannedOpportunity {
    pub fn stamp(opportunity: Opportunity, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id: opportunity.stable_id(),
            opportunity,
            scanned_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl ScanRequest {
    pub fn new(sector: impl Into<String>, location: Option<String>) -> Self {
        Self {
            sector: sector.into(),
            location,
        }
    }

    pub fn for_sector(sector: impl Into<String>) -> Self {
        Self::new(sector, None)
    }

    /// 去除空白後的產業，未指定時為 `None`
    pub fn sector_filter(&self) -> Option<&str> {
        Some(self.sector.trim()).filter(|s| !s.is_empty())
    }

    /// 去除空白後的地點，空字串視為未指定
    pub fn location_filter(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

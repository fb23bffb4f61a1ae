//! 即時擷取沒有可用結果時回傳的備援招標資料
//!
//! 截止日以產生當天為基準往後推算；標題中的 `{location}` 由請求的地點或產業預設值填入

use crate::domain::model::{Budget, Opportunity, OpportunityDetails};
use chrono::{Duration, Local, NaiveDate};

/// 未知產業的通用記錄所用的截止日
pub const GENERIC_DEADLINE: &str = "2099-12-31";

struct CannedTender {
    title: &'static str,
    default_location: Option<&'static str>,
    source: &'static str,
    issuing_authority: &'static str,
    deadline_in_days: i64,
    budget: &'static str,
}

const CONSTRUCTION: [CannedTender; 3] = [
    CannedTender {
        title: "Construction of G+4 Mixed Use Building in {location}",
        default_location: Some("Addis Ababa"),
        source: "https://tender.2merkato.com/",
        issuing_authority: "Commercial Bank of Ethiopia",
        deadline_in_days: 21,
        budget: "Confidential",
    },
    CannedTender {
        title: "Road Maintenance Project: Lot 3",
        default_location: None,
        source: "https://www.ppa.gov.et/",
        issuing_authority: "Ethiopian Roads Authority",
        deadline_in_days: 14,
        budget: "45,000,000",
    },
    CannedTender {
        title: "Supply of Cement and Rebar for Housing Project",
        default_location: None,
        source: "https://production.egp.gov.et/",
        issuing_authority: "Federal Housing Corporation",
        deadline_in_days: 10,
        budget: "12,500,000",
    },
];

const TECHNOLOGY: [CannedTender; 3] = [
    CannedTender {
        title: "Supply of High Performance Computing Servers for {location}",
        default_location: Some("Head Office"),
        source: "https://www.ethiotelecom.et/tender/",
        issuing_authority: "Ethio Telecom",
        deadline_in_days: 7,
        budget: "12,000,000",
    },
    CannedTender {
        title: "Procurement of Laptop Computers and Accessories",
        default_location: None,
        source: "https://production.egp.gov.et/",
        issuing_authority: "Ministry of Innovation and Technology",
        deadline_in_days: 15,
        budget: "3,000,000",
    },
    CannedTender {
        title: "Development of National Digital ID System Module",
        default_location: None,
        source: "https://www.undp.org/ethiopia",
        issuing_authority: "UNDP Ethiopia",
        deadline_in_days: 30,
        budget: "150,000 USD",
    },
];

const AGRICULTURE: [CannedTender; 3] = [
    CannedTender {
        title: "Supply of 5000 Quintals of Urea Fertilizer",
        default_location: None,
        source: "https://www.ethiopiantender.com/",
        issuing_authority: "Agricultural Businesses Corporation",
        deadline_in_days: 5,
        budget: "Open",
    },
    CannedTender {
        title: "Procurement of Modern Irrigation Pumps",
        default_location: None,
        source: "https://www.ppa.gov.et/",
        issuing_authority: "Ministry of Agriculture",
        deadline_in_days: 25,
        budget: "8,200,000",
    },
    CannedTender {
        title: "Tender for Supply of Poultry Feed",
        default_location: None,
        source: "https://tender.2merkato.com/",
        issuing_authority: "Alema Koudijs Feed PLC",
        deadline_in_days: 12,
        budget: "2,000,000",
    },
];

const HEALTHCARE: [CannedTender; 3] = [
    CannedTender {
        title: "Procurement of Medical Imaging Equipment (MRI/CT)",
        default_location: None,
        source: "https://www.ppa.gov.et/",
        issuing_authority: "Ethiopian Pharmaceuticals Supply Agency",
        deadline_in_days: 45,
        budget: "120,000,000",
    },
    CannedTender {
        title: "Supply of Laboratory Reagents and Chemicals",
        default_location: None,
        source: "https://tender.2merkato.com/",
        issuing_authority: "Black Lion Hospital",
        deadline_in_days: 8,
        budget: "4,500,000",
    },
    CannedTender {
        title: "Construction of Regional Health Center",
        default_location: None,
        source: "https://production.egp.gov.et/",
        issuing_authority: "Oromia Health Bureau",
        deadline_in_days: 60,
        budget: "35,000,000",
    },
];

fn catalog(sector_key: &str) -> Option<&'static [CannedTender]> {
    match sector_key {
        "construction" => Some(&CONSTRUCTION),
        "technology" => Some(&TECHNOLOGY),
        "agriculture" => Some(&AGRICULTURE),
        "healthcare" => Some(&HEALTHCARE),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSynthesizer;

impl FallbackSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, sector: Option<&str>, location: Option<&str>) -> Vec<Opportunity> {
        self.synthesize_on(sector, location, Local::now().date_naive())
    }

    /// 與 [`synthesize`](Self::synthesize) 相同，但指定「今天」
    pub fn synthesize_on(
        &self,
        sector: Option<&str>,
        location: Option<&str>,
        today: NaiveDate,
    ) -> Vec<Opportunity> {
        let sector = sector.map(str::trim).filter(|s| !s.is_empty());
        let location = location.map(str::trim).filter(|l| !l.is_empty());

        let Some(canned) = sector.and_then(|s| catalog(&s.to_lowercase())) else {
            return vec![generic_opportunity(sector.unwrap_or("all sectors"))];
        };

        canned
            .iter()
            .map(|tender| {
                let title = match tender.default_location {
                    Some(default) => tender.title.replace("{location}", location.unwrap_or(default)),
                    None => tender.title.to_string(),
                };
                let deadline = today + Duration::days(tender.deadline_in_days);

                Opportunity {
                    title,
                    source: tender.source.to_string(),
                    details: OpportunityDetails {
                        deadline_date: Some(deadline.format("%Y-%m-%d").to_string()),
                        issuing_authority: Some(tender.issuing_authority.to_string()),
                        budget: Some(Budget::Text(tender.budget.to_string())),
                        description: None,
                    },
                }
            })
            .collect()
    }
}

fn generic_opportunity(sector: &str) -> Opportunity {
    Opportunity {
        title: format!("General Procurement Opportunity in {}", sector),
        source: "https://www.ppa.gov.et/".to_string(),
        details: OpportunityDetails {
            deadline_date: Some(GENERIC_DEADLINE.to_string()),
            issuing_authority: Some("Federal Govt".to_string()),
            budget: Some(Budget::Text("Open".to_string())),
            description: None,
        },
    }
}

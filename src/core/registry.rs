//! 衣索比亞招標來源目錄，依發布單位類型分組
//!
//! 目前只爬取 [`SourceRegistry::representative_sources`]，其餘保留作為參考資料

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    OfficialGovernmentPortals,
    LocalAggregators,
    MajorCorporatePortals,
    InternationalOrganizations,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 4] = [
        SourceCategory::OfficialGovernmentPortals,
        SourceCategory::LocalAggregators,
        SourceCategory::MajorCorporatePortals,
        SourceCategory::InternationalOrganizations,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceCategory::OfficialGovernmentPortals => "official_government_portals",
            SourceCategory::LocalAggregators => "local_aggregators",
            SourceCategory::MajorCorporatePortals => "major_corporate_portals",
            SourceCategory::InternationalOrganizations => "international_organizations",
        }
    }

    pub fn urls(&self) -> &'static [&'static str] {
        match self {
            SourceCategory::OfficialGovernmentPortals => &[
                "https://production.egp.gov.et/",
                "https://www.ppa.gov.et/",
                "https://www.mint.gov.et/",
            ],
            SourceCategory::LocalAggregators => &[
                "https://tender.2merkato.com/",
                "https://www.afrotender.com/",
                "https://www.ethiopiantender.com/",
                "https://ichereta.com/",
            ],
            SourceCategory::MajorCorporatePortals => &[
                "https://www.ethiotelecom.et/tender/",
                "https://www.combanketh.et/en/tenders/",
            ],
            SourceCategory::InternationalOrganizations => &[
                "https://www.ungm.org/Public/Notice",
                "https://www.giz.de/en/regions/africa/ethiopia/tenders",
                "https://ec.europa.eu/info/funding-tenders/opportunities/portal/screen/home",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRegistry;

impl SourceRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn categories(&self) -> impl Iterator<Item = (SourceCategory, &'static [&'static str])> {
        SourceCategory::ALL.into_iter().map(|c| (c, c.urls()))
    }

    pub fn all_urls(&self) -> impl Iterator<Item = &'static str> {
        self.categories().flat_map(|(_, urls)| urls.iter().copied())
    }

    /// 同步掃描可選的固定來源：2merkato、eGP、Ethio Telecom
    pub fn representative_sources(&self) -> Vec<&'static str> {
        [
            SourceCategory::LocalAggregators,
            SourceCategory::OfficialGovernmentPortals,
            SourceCategory::MajorCorporatePortals,
        ]
        .iter()
        .filter_map(|c| c.urls().first().copied())
        .collect()
    }
}

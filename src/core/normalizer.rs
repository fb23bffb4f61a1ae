use crate::domain::model::{Budget, Opportunity, OpportunityDetails};
use serde_json::{Map, Value};

// 同義欄位，先找到的優先
const TITLE_FIELDS: &[&str] = &["title", "tender_title"];
const DEADLINE_FIELDS: &[&str] = &["deadline", "deadline_date"];
const AUTHORITY_FIELDS: &[&str] = &["source_organization", "issuing_authority"];
const BUDGET_FIELDS: &[&str] = &["budget_estimate", "budget_etb"];
const DESCRIPTION_FIELDS: &[&str] = &["summary", "description"];

/// 將一筆原始擷取資料轉成 [`Opportunity`]
///
/// 爬取結果的欄位包在 `data` 物件中，也接受未包裝的物件；找不到非空標題時回傳 `None`
pub fn normalize_item(item: &Value, source_url: &str) -> Option<Opportunity> {
    let fields = match item.get("data") {
        Some(Value::Object(inner)) => inner,
        _ => item.as_object()?,
    };

    let title = first_text(fields, TITLE_FIELDS)?;

    Some(Opportunity {
        title,
        source: source_url.to_string(),
        details: OpportunityDetails {
            deadline_date: first_text(fields, DEADLINE_FIELDS),
            issuing_authority: first_text(fields, AUTHORITY_FIELDS),
            budget: first_budget(fields),
            description: first_text(fields, DESCRIPTION_FIELDS),
        },
    })
}

pub fn normalize_items(items: Option<&[Value]>, source_url: &str) -> Vec<Opportunity> {
    let Some(items) = items else {
        return Vec::new();
    };

    let normalized: Vec<Opportunity> = items
        .iter()
        .filter_map(|item| normalize_item(item, source_url))
        .collect();

    if normalized.len() < items.len() {
        tracing::debug!(
            "Dropped {} of {} items from {} without a title",
            items.len() - normalized.len(),
            items.len(),
            source_url
        );
    }

    normalized
}

fn first_text(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_budget(fields: &Map<String, Value>) -> Option<Budget> {
    BUDGET_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(|v| match v {
            Value::Number(n) => Some(Budget::Amount(n.clone())),
            Value::String(s) if !s.trim().is_empty() => Some(Budget::Text(s.trim().to_string())),
            _ => None,
        })
}

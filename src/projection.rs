use crate::encoding::{hotness_encoding, stage_encoding};
use crate::models::{
    DailyLeadCounts, LeadSummary, MetricsSummary, NO_INTENT, PipelineStage, RawBundle, RecentLead,
    StageSlice, SummaryCards, TrendPoint, UNKNOWN_CUSTOMER, ViewModel,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const UNKNOWN_DATE: &str = "Unknown";

pub fn build_view_model(bundle: &RawBundle) -> ViewModel {
    ViewModel {
        summary: summary_cards(&bundle.summary),
        trend: bundle.daily.iter().map(trend_point).collect(),
        distribution: stage_distribution(&bundle.summary),
        recent: bundle
            .recent
            .iter()
            .enumerate()
            .map(|(index, lead)| recent_lead(index, lead))
            .collect(),
    }
}

fn summary_cards(summary: &MetricsSummary) -> SummaryCards {
    let rate = summary.conversion_rate;
    SummaryCards {
        total_conversations: summary.total_conversations,
        total_leads: summary.total_leads,
        hot_leads: summary.hot_leads,
        conversion_rate: if rate.is_finite() { rate.clamp(0.0, 100.0) } else { 0.0 },
    }
}

fn trend_point(day: &DailyLeadCounts) -> TrendPoint {
    let date = day
        .date
        .as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .unwrap_or(UNKNOWN_DATE)
        .to_string();
    TrendPoint {
        label: short_date_label(&date),
        date,
        hot: day.hot,
        warm: day.warm,
        cold: day.cold,
        total: day.total(),
    }
}

/// `"Mon 5"` for `2026-01-05`. Accepts a full timestamp by reading its date
/// prefix; anything unparseable is shown as-is.
pub fn short_date_label(raw: &str) -> String {
    let raw = raw.trim();
    let prefix = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        Ok(date) => date.format("%a %-d").to_string(),
        Err(_) if raw.is_empty() => UNKNOWN_DATE.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Keys that name the same stage (`"Awareness"`, `"awareness "`) share one
/// slice. `PipelineStage` orders by funnel rank, unrecognized stages last.
fn stage_distribution(summary: &MetricsSummary) -> Vec<StageSlice> {
    let mut counts: BTreeMap<PipelineStage, u64> = BTreeMap::new();
    for (raw, count) in &summary.leads_by_stage {
        let total = counts.entry(PipelineStage::parse(raw)).or_default();
        *total = total.saturating_add(*count);
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(stage, count)| {
            let encoding = stage_encoding(&stage);
            StageSlice {
                stage: category_key(stage.as_str()),
                label: encoding.label,
                value: count,
                color: encoding.color.to_string(),
            }
        })
        .collect()
}

fn recent_lead(index: usize, lead: &LeadSummary) -> RecentLead {
    let stage = stage_encoding(&lead.stage);
    let hotness = hotness_encoding(&lead.hotness);
    let id = match lead.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("unknown-{index}"),
    };
    RecentLead {
        id,
        customer_name: lead
            .customer_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
        intent: lead.intent.clone().unwrap_or_else(|| NO_INTENT.to_string()),
        stage: category_key(lead.stage.as_str()),
        stage_label: stage.label,
        stage_class: stage.badge_class.to_string(),
        hotness: category_key(lead.hotness.as_str()),
        hotness_label: hotness.label,
        hotness_class: hotness.badge_class.to_string(),
        score: if lead.score.is_finite() { lead.score } else { 0.0 },
    }
}

fn category_key(raw: &str) -> String {
    if raw.is_empty() {
        "unknown".to_string()
    } else {
        raw.to_string()
    }
}

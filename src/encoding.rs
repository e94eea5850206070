use crate::models::{Hotness, PipelineStage};
use once_cell::sync::Lazy;
use serde::Serialize;

const FALLBACK_COLOR: &str = "#9ca3af";
const FALLBACK_BADGE: &str = "bg-gray-100 text-gray-700";
const FALLBACK_RANK: u8 = u8::MAX;

/// Visual treatment of one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoding {
    pub label: String,
    pub color: &'static str,
    pub badge_class: &'static str,
    pub rank: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaletteEntry {
    pub value: &'static str,
    #[serde(flatten)]
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Serialize)]
pub struct Palette {
    pub stages: Vec<PaletteEntry>,
    pub hotness: Vec<PaletteEntry>,
    pub fallback_color: &'static str,
    pub fallback_badge_class: &'static str,
}

static PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    stages: PipelineStage::FUNNEL
        .iter()
        .map(|stage| PaletteEntry {
            value: known_stage_name(stage),
            encoding: stage_encoding(stage),
        })
        .collect(),
    hotness: Hotness::ALL
        .iter()
        .map(|hotness| PaletteEntry {
            value: known_hotness_name(hotness),
            encoding: hotness_encoding(hotness),
        })
        .collect(),
    fallback_color: FALLBACK_COLOR,
    fallback_badge_class: FALLBACK_BADGE,
});

pub fn palette() -> &'static Palette {
    &PALETTE
}

pub fn stage_encoding(stage: &PipelineStage) -> Encoding {
    let (color, badge_class, rank) = match stage {
        PipelineStage::Awareness => ("#60a5fa", "bg-blue-100 text-blue-700", 0),
        PipelineStage::Interest => ("#818cf8", "bg-indigo-100 text-indigo-700", 1),
        PipelineStage::Consideration => ("#a78bfa", "bg-violet-100 text-violet-700", 2),
        PipelineStage::Intent => ("#f472b6", "bg-pink-100 text-pink-700", 3),
        PipelineStage::Evaluation => ("#fbbf24", "bg-amber-100 text-amber-700", 4),
        PipelineStage::Purchase => ("#34d399", "bg-emerald-100 text-emerald-700", 5),
        PipelineStage::Unrecognized(_) => (FALLBACK_COLOR, FALLBACK_BADGE, FALLBACK_RANK),
    };
    Encoding {
        label: display_label(stage.as_str()),
        color,
        badge_class,
        rank,
    }
}

pub fn hotness_encoding(hotness: &Hotness) -> Encoding {
    let (color, badge_class, rank) = match hotness {
        Hotness::Hot => ("#ef4444", "bg-red-100 text-red-700", 0),
        Hotness::Warm => ("#f97316", "bg-orange-100 text-orange-700", 1),
        Hotness::Cold => ("#3b82f6", "bg-sky-100 text-sky-700", 2),
        Hotness::Unrecognized(_) => (FALLBACK_COLOR, FALLBACK_BADGE, FALLBACK_RANK),
    };
    Encoding {
        label: display_label(hotness.as_str()),
        color,
        badge_class,
        rank,
    }
}

/// Capitalized, space-separated label; never empty.
pub fn display_label(raw: &str) -> String {
    let words = raw.trim().replace(['_', '-'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown".to_string(),
    }
}

fn known_stage_name(stage: &PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Awareness => "awareness",
        PipelineStage::Interest => "interest",
        PipelineStage::Consideration => "consideration",
        PipelineStage::Intent => "intent",
        PipelineStage::Evaluation => "evaluation",
        PipelineStage::Purchase => "purchase",
        PipelineStage::Unrecognized(_) => "",
    }
}

fn known_hotness_name(hotness: &Hotness) -> &'static str {
    match hotness {
        Hotness::Hot => "hot",
        Hotness::Warm => "warm",
        Hotness::Cold => "cold",
        Hotness::Unrecognized(_) => "",
    }
}

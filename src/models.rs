use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const UNKNOWN_CUSTOMER: &str = "Unknown";
pub const NO_INTENT: &str = "No intent";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Awareness,
    Interest,
    Consideration,
    Intent,
    Evaluation,
    Purchase,
    Unrecognized(String),
}

impl PipelineStage {
    pub const FUNNEL: [PipelineStage; 6] = [
        PipelineStage::Awareness,
        PipelineStage::Interest,
        PipelineStage::Consideration,
        PipelineStage::Intent,
        PipelineStage::Evaluation,
        PipelineStage::Purchase,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "awareness" => Self::Awareness,
            "interest" => Self::Interest,
            "consideration" => Self::Consideration,
            "intent" => Self::Intent,
            "evaluation" => Self::Evaluation,
            "purchase" => Self::Purchase,
            _ => Self::Unrecognized(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Awareness => "awareness",
            Self::Interest => "interest",
            Self::Consideration => "consideration",
            Self::Intent => "intent",
            Self::Evaluation => "evaluation",
            Self::Purchase => "purchase",
            Self::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hotness {
    Hot,
    Warm,
    Cold,
    Unrecognized(String),
}

impl Hotness {
    pub const ALL: [Hotness; 3] = [Hotness::Hot, Hotness::Warm, Hotness::Cold];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hot" => Self::Hot,
            "warm" => Self::Warm,
            "cold" => Self::Cold,
            _ => Self::Unrecognized(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Unrecognized(raw) => raw,
        }
    }
}

macro_rules! string_enum_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = lenient::text(deserializer)?.unwrap_or_default();
                Ok(<$ty>::parse(&raw))
            }
        }
    };
}

string_enum_serde!(PipelineStage);
string_enum_serde!(Hotness);

impl Default for PipelineStage {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl Default for Hotness {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

/// Body of `GET /dashboard/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MetricsSummary {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_conversations: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_leads: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub hot_leads: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub conversion_rate: f64,
    #[serde(default, deserialize_with = "lenient::stage_counts")]
    pub leads_by_stage: BTreeMap<String, u64>,
}

/// One element of `GET /dashboard/leads-per-day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DailyLeadCounts {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub hot: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub warm: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub cold: u64,
}

impl DailyLeadCounts {
    pub fn total(&self) -> u64 {
        self.hot.saturating_add(self.warm).saturating_add(self.cold)
    }
}

/// One element of `GET /leads`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LeadSummary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub intent: Option<String>,
    #[serde(default)]
    pub stage: PipelineStage,
    #[serde(default)]
    pub hotness: Hotness,
    #[serde(default, deserialize_with = "lenient::number")]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawBundle {
    pub summary: MetricsSummary,
    pub daily: Vec<DailyLeadCounts>,
    pub recent: Vec<LeadSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub window_days: u32,
    pub recent_limit: u32,
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            window_days: 7,
            recent_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCards {
    pub total_conversations: u64,
    pub total_leads: u64,
    pub hot_leads: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub label: String,
    pub hot: u64,
    pub warm: u64,
    pub cold: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSlice {
    pub stage: String,
    pub label: String,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentLead {
    pub id: String,
    pub customer_name: String,
    pub intent: String,
    pub stage: String,
    pub stage_label: String,
    pub stage_class: String,
    pub hotness: String,
    pub hotness_label: String,
    pub hotness_class: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub summary: SummaryCards,
    pub trend: Vec<TrendPoint>,
    pub distribution: Vec<StageSlice>,
    pub recent: Vec<RecentLead>,
}

/// Field decoders that turn missing, null or mistyped scalars into defaults
/// instead of failing the whole payload.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn coerce_count(value: &Value) -> u64 {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .or_else(|| coerce_number(value).map(|f| f.max(0.0) as u64))
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn coerce_number(value: &Value) -> Option<f64> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|f| f.is_finite())
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_count(&value))
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_number(&value).unwrap_or(0.0))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        Ok(Some(text).filter(|t| !t.is_empty()))
    }

    pub fn stage_counts<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, u64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(entries) = value else {
            return Ok(BTreeMap::new());
        };
        Ok(entries
            .iter()
            .map(|(stage, count)| (stage.clone(), coerce_count(count)))
            .collect())
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ranking::RankTier;

/// Per-user counts for one reporting period, as returned by the stats API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    #[serde(rename = "username")]
    pub subject_id: String,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub proposals: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub interviews: u32,
    #[serde(rename = "hire", default, deserialize_with = "deserialize_count")]
    pub hires: u32,
    #[serde(
        rename = "proposalsTime",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub proposals_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "interviewsTime",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub interviews_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "hireTime",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub hires_at: Option<DateTime<Utc>>,
}

impl MetricRecord {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_label: None,
            proposals: 0,
            interviews: 0,
            hires: 0,
            proposals_at: None,
            interviews_at: None,
            hires_at: None,
        }
    }

    pub fn label(&self) -> &str {
        self.display_label.as_deref().unwrap_or(&self.subject_id)
    }
}

/// The user's own counts in a personal insight payload. The stats API omits the
/// username here, so it is filled in from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnStats {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub proposals: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub interviews: u32,
    #[serde(rename = "hire", default, deserialize_with = "deserialize_count")]
    pub hires: u32,
    #[serde(
        rename = "proposalsTime",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub proposals_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "interviewsTime",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub interviews_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "hireTime",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub hires_at: Option<DateTime<Utc>>,
}

impl OwnStats {
    pub fn into_record(self, subject_id: &str, display_label: Option<String>) -> MetricRecord {
        MetricRecord {
            subject_id: subject_id.to_string(),
            display_label,
            proposals: self.proposals,
            interviews: self.interviews,
            hires: self.hires,
            proposals_at: self.proposals_at,
            interviews_at: self.interviews_at,
            hires_at: self.hires_at,
        }
    }
}

/// Body of the `/get_bid_insight*` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPayload {
    #[serde(default)]
    pub my_stats: OwnStats,
    #[serde(default)]
    pub all_stats: Vec<MetricRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub proposals_rank: usize,
    pub interviews_rank: usize,
    #[serde(rename = "hireRank")]
    pub hires_rank: usize,
}

impl RankedRecord {
    pub fn max_rank(&self) -> usize {
        self.proposals_rank
            .max(self.interviews_rank)
            .max(self.hires_rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    #[serde(rename = "username")]
    pub subject_id: String,
    #[serde(rename = "displayName")]
    pub display_label: String,
    pub count: u32,
}

/// Who holds a given position, per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankGroup {
    pub rank: usize,
    pub ordinal: String,
    pub tier: RankTier,
    pub color: &'static str,
    pub proposals_users: Vec<RankEntry>,
    pub interviews_users: Vec<RankEntry>,
    #[serde(rename = "hireUsers")]
    pub hires_users: Vec<RankEntry>,
}

/// A missing or `null` count is zero.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(dead_code)]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    EpochMillis(f64),
    Other(serde::de::IgnoredAny),
}

/// Accepts a date/time string (see `parse_timestamp`) or epoch milliseconds.
/// Anything else, including empty and unparseable strings, is no timestamp.
fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::EpochMillis(millis)) if millis.is_finite() => {
            DateTime::from_timestamp_millis(millis as i64)
        }
        _ => None,
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{MetricRecord, RankEntry, RankGroup, RankedRecord};

pub const FIRST_PLACE_COLOR: &str = "#10b981";
pub const SECOND_PLACE_COLOR: &str = "#f59e0b";
pub const THIRD_PLACE_COLOR: &str = "#ef4444";
pub const OTHER_PLACE_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Proposals,
    Interviews,
    #[serde(rename = "hire")]
    Hires,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Proposals, Metric::Interviews, Metric::Hires];

    pub fn count(self, record: &MetricRecord) -> u32 {
        match self {
            Self::Proposals => record.proposals,
            Self::Interviews => record.interviews,
            Self::Hires => record.hires,
        }
    }

    pub fn achieved_at(self, record: &MetricRecord) -> Option<DateTime<Utc>> {
        match self {
            Self::Proposals => record.proposals_at,
            Self::Interviews => record.interviews_at,
            Self::Hires => record.hires_at,
        }
    }

    pub fn rank_of(self, record: &RankedRecord) -> usize {
        match self {
            Self::Proposals => record.proposals_rank,
            Self::Interviews => record.interviews_rank,
            Self::Hires => record.hires_rank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    First,
    Second,
    Third,
    Other,
}

impl RankTier {
    pub fn color(self) -> &'static str {
        match self {
            Self::First => FIRST_PLACE_COLOR,
            Self::Second => SECOND_PLACE_COLOR,
            Self::Third => THIRD_PLACE_COLOR,
            Self::Other => OTHER_PLACE_COLOR,
        }
    }
}

/// One record's position for one metric, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub ordinal: String,
    pub tier: RankTier,
    pub color: &'static str,
}

impl Standing {
    pub fn new(rank: usize, total: usize) -> Self {
        let tier = tier_of(rank, total);
        Self {
            rank,
            ordinal: ordinal(rank),
            tier,
            color: tier.color(),
        }
    }
}

/// Per-user row of the leaderboard, one standing per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    #[serde(rename = "username")]
    pub subject_id: String,
    #[serde(rename = "displayName")]
    pub display_label: String,
    pub proposals: Standing,
    pub interviews: Standing,
    #[serde(rename = "hire")]
    pub hires: Standing,
}

/// Records ordered best-first for `metric`: higher count wins, then the earlier
/// timestamp when both records carry one. Anything else keeps input order.
pub fn rank_by(records: &[MetricRecord], metric: Metric) -> Vec<&MetricRecord> {
    stable_merge_sort(records.iter().collect(), metric)
}

fn compare_for(metric: Metric, a: &MetricRecord, b: &MetricRecord) -> Ordering {
    metric
        .count(b)
        .cmp(&metric.count(a))
        .then_with(|| match (metric.achieved_at(a), metric.achieved_at(b)) {
            (Some(a_at), Some(b_at)) => a_at.cmp(&b_at),
            _ => Ordering::Equal,
        })
}

// `compare_for` is not a total order once present and absent timestamps mix, and
// `slice::sort_by` may panic on that. Take from the right half only when it is
// strictly less.
fn stable_merge_sort(items: Vec<&MetricRecord>, metric: Metric) -> Vec<&MetricRecord> {
    if items.len() <= 1 {
        return items;
    }

    let mut left = items;
    let right = left.split_off(left.len() / 2);
    let left = stable_merge_sort(left, metric);
    let right = stable_merge_sort(right, metric);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare_for(metric, right[j], left[i]) == Ordering::Less {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}

/// Attaches a 1-based position per metric to every record, keeping input order.
///
/// Ranks are positional: two records that tie on count with no timestamps to
/// separate them still get distinct, consecutive ranks in input order. A
/// duplicated `subject_id` resolves to the first matching position.
pub fn compute_ranks(records: &[MetricRecord]) -> Vec<RankedRecord> {
    let positions = Metric::ALL.map(|metric| positions_by_subject(&rank_by(records, metric)));

    tracing::debug!(records = records.len(), "Computed leaderboard ranks");

    records
        .iter()
        .map(|record| {
            let rank_in = |table: &HashMap<&str, usize>| {
                table.get(record.subject_id.as_str()).copied().unwrap_or_default()
            };

            RankedRecord {
                record: record.clone(),
                proposals_rank: rank_in(&positions[0]),
                interviews_rank: rank_in(&positions[1]),
                hires_rank: rank_in(&positions[2]),
            }
        })
        .collect()
}

fn positions_by_subject<'a>(sorted: &[&'a MetricRecord]) -> HashMap<&'a str, usize> {
    let mut table = HashMap::with_capacity(sorted.len());
    for (idx, &record) in sorted.iter().enumerate() {
        table.entry(record.subject_id.as_str()).or_insert(idx + 1);
    }
    table
}

/// One group per position from 1 to the worst rank present, listing who holds
/// that position for each metric. Lists can be empty.
pub fn group_by_rank(records: &[RankedRecord]) -> Vec<RankGroup> {
    let max_rank = records.iter().map(RankedRecord::max_rank).max().unwrap_or(0);
    let total = records.len();

    (1..=max_rank)
        .map(|rank| {
            let holders = |metric: Metric| -> Vec<RankEntry> {
                records
                    .iter()
                    .filter(|ranked| metric.rank_of(ranked) == rank)
                    .map(|ranked| RankEntry {
                        subject_id: ranked.record.subject_id.clone(),
                        display_label: ranked.record.label().to_string(),
                        count: metric.count(&ranked.record),
                    })
                    .collect()
            };

            let tier = tier_of(rank, total);
            RankGroup {
                rank,
                ordinal: ordinal(rank),
                tier,
                color: tier.color(),
                proposals_users: holders(Metric::Proposals),
                interviews_users: holders(Metric::Interviews),
                hires_users: holders(Metric::Hires),
            }
        })
        .collect()
}

pub fn standings(records: &[RankedRecord]) -> Vec<StandingRow> {
    let total = records.len();
    records
        .iter()
        .map(|ranked| StandingRow {
            subject_id: ranked.record.subject_id.clone(),
            display_label: ranked.record.label().to_string(),
            proposals: Standing::new(ranked.proposals_rank, total),
            interviews: Standing::new(ranked.interviews_rank, total),
            hires: Standing::new(ranked.hires_rank, total),
        })
        .collect()
}

/// A lone participant is always first, whatever rank was passed.
pub fn tier_of(rank: usize, total: usize) -> RankTier {
    if total == 1 {
        return RankTier::First;
    }
    match rank {
        1 => RankTier::First,
        2 => RankTier::Second,
        3 => RankTier::Third,
        _ => RankTier::Other,
    }
}

pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

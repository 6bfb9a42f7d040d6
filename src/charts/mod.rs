use serde::Serialize;

use crate::models::MetricRecord;
use crate::ranking::Metric;

pub const PIE_CENTER: f64 = 50.0;
pub const PIE_RADIUS: f64 = 40.0;
pub const MIN_BAR_WIDTH_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    #[serde(rename = "username")]
    pub subject_id: String,
    #[serde(rename = "displayName")]
    pub display_label: String,
    pub value: u32,
    /// Position of the record in the full input list, so colours match across charts.
    pub color_index: usize,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub start: Point,
    pub end: Point,
    pub large_arc: bool,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChart {
    pub metric: Metric,
    pub total: u64,
    pub participants: usize,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBar {
    #[serde(rename = "username")]
    pub subject_id: String,
    pub value: u32,
    pub color_index: usize,
    pub percent: f64,
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCharts {
    pub pie: PieChart,
    pub bars: Vec<ProgressBar>,
}

/// Share of `metric` held by each record with a non-zero count. Angles are in
/// degrees, clockwise from the positive x axis on a 100x100 viewbox.
pub fn pie_chart(records: &[MetricRecord], metric: Metric) -> PieChart {
    let total: u64 = records.iter().map(|r| u64::from(metric.count(r))).sum();
    let participants: Vec<(usize, &MetricRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| metric.count(r) > 0)
        .collect();

    if total == 0 {
        return PieChart {
            metric,
            total,
            participants: 0,
            slices: Vec::new(),
        };
    }

    let single = participants.len() == 1;
    let mut cumulative = 0.0_f64;
    let slices = participants
        .iter()
        .map(|&(color_index, record)| {
            let value = metric.count(record);
            let sweep = if single {
                360.0
            } else {
                f64::from(value) / total as f64 * 360.0
            };
            let slice = build_slice(record, value, color_index, cumulative, sweep);
            cumulative += sweep;
            slice
        })
        .collect();

    PieChart {
        metric,
        total,
        participants: participants.len(),
        slices,
    }
}

fn build_slice(
    record: &MetricRecord,
    value: u32,
    color_index: usize,
    start_angle: f64,
    sweep_angle: f64,
) -> PieSlice {
    let start = point_on_circle(start_angle);
    let end = point_on_circle(start_angle + sweep_angle);
    let large_arc = sweep_angle > 180.0;

    let path = format!(
        "M {c} {c} L {} {} A {r} {r} 0 {} 1 {} {} Z",
        start.x,
        start.y,
        u8::from(large_arc),
        end.x,
        end.y,
        c = PIE_CENTER,
        r = PIE_RADIUS,
    );

    PieSlice {
        subject_id: record.subject_id.clone(),
        display_label: record.label().to_string(),
        value,
        color_index,
        start_angle,
        sweep_angle,
        start,
        end,
        large_arc,
        path,
    }
}

fn point_on_circle(angle_degrees: f64) -> Point {
    let radians = angle_degrees.to_radians();
    Point {
        x: PIE_CENTER + PIE_RADIUS * radians.cos(),
        y: PIE_CENTER + PIE_RADIUS * radians.sin(),
    }
}

/// Bars scaled against the largest count (at least 1), never drawn narrower
/// than `MIN_BAR_WIDTH_PERCENT`.
pub fn progress_bars(records: &[MetricRecord], metric: Metric) -> Vec<ProgressBar> {
    let max_value = records
        .iter()
        .map(|r| metric.count(r))
        .max()
        .unwrap_or(0)
        .max(1);

    records
        .iter()
        .enumerate()
        .map(|(color_index, record)| {
            let value = metric.count(record);
            let percent = f64::from(value) / f64::from(max_value) * 100.0;
            ProgressBar {
                subject_id: record.subject_id.clone(),
                value,
                color_index,
                percent,
                width_percent: percent.max(MIN_BAR_WIDTH_PERCENT),
            }
        })
        .collect()
}

pub fn metric_charts(records: &[MetricRecord], metric: Metric) -> MetricCharts {
    MetricCharts {
        pie: pie_chart(records, metric),
        bars: progress_bars(records, metric),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_proposals(id: &str, proposals: u32) -> MetricRecord {
        MetricRecord {
            proposals,
            ..MetricRecord::new(id)
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero_total_has_no_slices() {
        let chart = pie_chart(&[with_proposals("a", 0), with_proposals("b", 0)], Metric::Proposals);
        assert_eq!(chart.total, 0);
        assert!(chart.slices.is_empty());
        assert!(pie_chart(&[], Metric::Hires).slices.is_empty());
    }

    #[test]
    fn lone_participant_takes_the_full_circle() {
        let records = [with_proposals("idle", 0), with_proposals("busy", 4)];
        let chart = pie_chart(&records, Metric::Proposals);

        assert_eq!(chart.participants, 1);
        let slice = &chart.slices[0];
        assert_eq!(slice.subject_id, "busy");
        assert_eq!(slice.color_index, 1);
        assert!(close(slice.sweep_angle, 360.0));
        assert!(slice.large_arc);
    }

    #[test]
    fn slices_are_proportional_and_cumulative() {
        let records = [
            with_proposals("a", 1),
            with_proposals("b", 0),
            with_proposals("c", 3),
        ];
        let chart = pie_chart(&records, Metric::Proposals);

        assert_eq!(chart.total, 4);
        assert_eq!(chart.slices.len(), 2);
        assert!(close(chart.slices[0].sweep_angle, 90.0));
        assert!(close(chart.slices[1].start_angle, 90.0));
        assert!(close(chart.slices[1].sweep_angle, 270.0));
        assert!(!chart.slices[0].large_arc);
        assert!(chart.slices[1].large_arc);

        let swept: f64 = chart.slices.iter().map(|s| s.sweep_angle).sum();
        assert!(close(swept, 360.0));
    }

    #[test]
    fn first_slice_starts_at_three_o_clock() {
        let chart = pie_chart(&[with_proposals("a", 1), with_proposals("b", 1)], Metric::Proposals);
        let first = &chart.slices[0];

        assert!(close(first.start.x, 90.0) && close(first.start.y, 50.0));
        assert!(close(first.end.x, 10.0));
        assert!(first.path.starts_with("M 50 50 L 90 50 A 40 40 0 0 1 "));
        assert!(first.path.ends_with(" Z"));
    }

    #[test]
    fn bars_scale_to_the_leader_with_a_minimum_width() {
        let bars = progress_bars(
            &[with_proposals("a", 10), with_proposals("b", 5), with_proposals("c", 0)],
            Metric::Proposals,
        );

        assert!(close(bars[0].width_percent, 100.0));
        assert!(close(bars[1].percent, 50.0));
        assert!(close(bars[2].percent, 0.0));
        assert!(close(bars[2].width_percent, MIN_BAR_WIDTH_PERCENT));
        assert_eq!(bars[2].color_index, 2);
    }

    #[test]
    fn all_zero_bars_still_render() {
        let bars = progress_bars(&[with_proposals("a", 0)], Metric::Interviews);
        assert!(close(bars[0].width_percent, MIN_BAR_WIDTH_PERCENT));
    }
}

// Burst detection over interaction arrival times.

use chrono::{DateTime, Utc};

/// Median of a non-empty slice, averaging the two middle values for even
/// lengths. Sorts the slice in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Fraction of timestamps within `window_secs` (inclusive) of their median.
///
/// 1.0 means every arrival landed in one burst. Fewer than two timestamps
/// carry no timing information and score 0.0.
pub fn burst_ratio(timestamps: &[DateTime<Utc>], window_secs: i64) -> f64 {
    if timestamps.len() < 2 {
        return 0.0;
    }
    let mut secs: Vec<f64> = timestamps
        .iter()
        .map(|t| t.timestamp_millis() as f64 / 1000.0)
        .collect();
    let Some(median_ts) = median(&mut secs) else {
        return 0.0;
    };
    let window = window_secs as f64;
    let in_burst = secs
        .iter()
        .filter(|&&t| (t - median_ts).abs() <= window)
        .count();
    in_burst as f64 / secs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_single_timestamp_scores_zero() {
        assert_eq!(burst_ratio(&[base()], 300), 0.0);
        assert_eq!(burst_ratio(&[], 300), 0.0);
    }

    #[test]
    fn test_all_in_one_burst() {
        let ts: Vec<_> = (0..10).map(|i| base() + Duration::seconds(i * 10)).collect();
        assert!((burst_ratio(&ts, 300) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_spread_out_arrivals() {
        // One arrival per hour: only the median itself sits inside ±300s
        let ts: Vec<_> = (0..5).map(|i| base() + Duration::hours(i)).collect();
        assert!((burst_ratio(&ts, 300) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let ts = vec![base(), base() + Duration::seconds(300), base() + Duration::seconds(600)];
        // median = base+300; both neighbours are exactly 300s away
        assert!((burst_ratio(&ts, 300) - 1.0).abs() < f64::EPSILON);
    }
}

//! Rollups feeding the dashboard plots: receiver counts by country and
//! type, quantile cutoffs, and rate histograms.

use std::collections::HashMap;

use crate::model::{RateSeries, SensorRecord};

/// Receivers per country, most first. Sensors without a country are
/// counted under the empty string.
pub fn sensors_by_country(records: &[SensorRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.country.as_deref().unwrap_or("")).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_owned(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Active receivers per type, most first, excluding the given type (the
/// dashboard leaves out the surveillance backbone to keep the bars
/// readable).
pub fn receivers_by_kind(series: &[RateSeries], exclude: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for s in series {
        if s.kind != exclude {
            *counts.entry(s.kind.as_str()).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_owned(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// The p-quantile of sorted values, with linear interpolation between
/// ranks. `None` for an empty slice.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted {
        [] => None,
        [only] => Some(*only),
        _ => {
            let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (h - h.floor()))
        }
    }
}

/// Keep the entries whose count is strictly above the p-quantile of all
/// counts.
pub fn top_by_quantile(counts: &[(String, usize)], p: f64) -> Vec<(String, usize)> {
    let mut values: Vec<f64> = counts.iter().map(|&(_, n)| n as f64).collect();
    values.sort_by(f64::total_cmp);
    let Some(cutoff) = quantile(&values, p) else {
        return Vec::new();
    };
    counts
        .iter()
        .filter(|&&(_, n)| n as f64 > cutoff)
        .cloned()
        .collect()
}

/// Equal-width histogram of `values` over their own range. All-equal input
/// lands in the first bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins.max(1)];
    if values.is_empty() {
        return counts;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    for &v in values {
        let bin = if span == 0.0 {
            0
        } else {
            (((v - min) / span * counts.len() as f64) as usize).min(counts.len() - 1)
        };
        counts[bin] += 1;
    }
    counts
}

/// Mean rates of the active receivers of one type, the histogram input for
/// the rates plot.
pub fn mean_rates_of_kind(series: &[RateSeries], kind: &str) -> Vec<f64> {
    series
        .iter()
        .filter(|s| s.kind == kind && s.mean > 0.0)
        .map(|s| s.mean)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{histogram, quantile, receivers_by_kind, sensors_by_country, top_by_quantile};
    use crate::model::{RateSeries, SensorRecord};
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn record(country: Option<&str>) -> SensorRecord {
        SensorRecord {
            serial: 0,
            kind: "dump1090".to_owned(),
            longitude: 0.0,
            latitude: 0.0,
            active: true,
            online: true,
            added: DateTime::from_timestamp(0, 0).unwrap(),
            last_connection: DateTime::from_timestamp(0, 0).unwrap(),
            country: country.map(str::to_owned),
        }
    }

    fn series(kind: &str, mean: f64) -> RateSeries {
        RateSeries {
            serial: 0,
            kind: kind.to_owned(),
            values: vec![],
            mean,
            max: mean,
        }
    }

    #[test]
    fn countries_sorted_by_count_then_name() {
        let records = vec![
            record(Some("Germany")),
            record(Some("Germany")),
            record(Some("Iceland")),
            record(None),
        ];
        assert_eq!(
            sensors_by_country(&records),
            vec![
                ("Germany".to_owned(), 2),
                ("".to_owned(), 1),
                ("Iceland".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn kinds_exclude_the_backbone() {
        let all = vec![
            series("dump1090", 1.0),
            series("dump1090", 1.0),
            series("Asterix", 1.0),
            series("radarcape", 1.0),
        ];
        assert_eq!(
            receivers_by_kind(&all, "Asterix"),
            vec![("dump1090".to_owned(), 2), ("radarcape".to_owned(), 1)]
        );
    }

    #[test]
    fn quantiles_interpolate() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn quantile_cutoff_keeps_the_head() {
        let counts = vec![
            ("a".to_owned(), 100),
            ("b".to_owned(), 10),
            ("c".to_owned(), 9),
            ("d".to_owned(), 1),
        ];
        let top = top_by_quantile(&counts, 0.75);
        assert_eq!(top, vec![("a".to_owned(), 100)]);
    }

    #[test]
    fn entries_at_the_cutoff_are_excluded() {
        // The cutoff itself does not make the list.
        let counts = vec![("a".to_owned(), 5), ("b".to_owned(), 5)];
        assert_eq!(top_by_quantile(&counts, 0.5), Vec::<(String, usize)>::new());
    }

    #[test]
    fn histogram_bins_cover_the_range() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 4.0];
        assert_eq!(histogram(&values, 2), vec![2, 4]);
        assert_eq!(histogram(&[], 3), vec![0, 0, 0]);
        assert_eq!(histogram(&[7.0, 7.0], 4), vec![2, 0, 0, 0]);
    }
}

//! Shaped records derived from wire responses: parsed timestamps, joined
//! sensor types, attached countries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use spherical::geometry::Geometry;

use crate::country::CountryIndex;
use crate::wire::{CoverageEntry, FactsResponse, MsgRatesResponse, WireSensor};

/// One day of network message counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub date: DateTime<Utc>,
    pub daily: f64,
    pub cumulative: f64,
}

/// Parse the facts rows, dropping any with an unrepresentable timestamp.
pub fn daily_counts(facts: &FactsResponse) -> Vec<DailyCount> {
    facts
        .message_counts
        .iter()
        .filter_map(|&(ms, daily, cumulative)| {
            Some(DailyCount {
                date: DateTime::from_timestamp_millis(ms)?,
                daily,
                cumulative,
            })
        })
        .collect()
}

/// A receiver ready for display: parsed dates and an attached country.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    pub serial: i64,
    pub kind: String,
    pub longitude: f64,
    pub latitude: f64,
    pub active: bool,
    pub online: bool,
    pub added: DateTime<Utc>,
    pub last_connection: DateTime<Utc>,
    pub country: Option<String>,
}

/// Shape the sensor list. Receivers that never connected are dropped; the
/// rest get their position reverse-geocoded when an index is supplied.
pub fn sensor_records(list: &[WireSensor], countries: Option<&CountryIndex>) -> Vec<SensorRecord> {
    list.iter()
        .filter(|s| s.last_connection_event > 0)
        .filter_map(|s| {
            Some(SensorRecord {
                serial: s.serial,
                kind: s.kind.clone(),
                longitude: s.position.longitude,
                latitude: s.position.latitude,
                active: s.active,
                online: s.online,
                added: DateTime::from_timestamp(s.added, 0)?,
                last_connection: DateTime::from_timestamp(s.last_connection_event, 0)?,
                country: countries.and_then(|index| {
                    index
                        .find([s.position.longitude, s.position.latitude])
                        .map(str::to_owned)
                }),
            })
        })
        .collect()
}

/// Serial-to-type lookup used to join the rates series onto the sensor list.
pub fn sensor_types(list: &[WireSensor]) -> HashMap<i64, String> {
    list.iter()
        .map(|s| (s.serial, s.kind.clone()))
        .collect()
}

/// Message-rate series of one receiver, with its summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSeries {
    pub serial: i64,
    pub kind: String,
    pub values: Vec<(DateTime<Utc>, f64)>,
    pub mean: f64,
    pub max: f64,
}

/// Join the rate series onto sensor types. Series for serials missing from
/// the list (or that fail to parse) are dropped, matching the dashboard's
/// "active known receivers" framing.
pub fn rate_series(rates: &MsgRatesResponse, types: &HashMap<i64, String>) -> Vec<RateSeries> {
    let mut out: Vec<RateSeries> = rates
        .series
        .iter()
        .filter_map(|(serial, samples)| {
            let serial: i64 = serial.parse().ok()?;
            let kind = types.get(&serial)?.clone();
            let values: Vec<(DateTime<Utc>, f64)> = samples
                .iter()
                .filter_map(|&(ms, value)| Some((DateTime::from_timestamp_millis(ms)?, value)))
                .collect();
            let rates_only: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
            let mean = if rates_only.is_empty() {
                0.0
            } else {
                rates_only.iter().sum::<f64>() / rates_only.len() as f64
            };
            let max = rates_only.iter().copied().fold(f64::MIN, f64::max);
            Some(RateSeries {
                serial,
                kind,
                values,
                mean,
                max: if rates_only.is_empty() { 0.0 } else { max },
            })
        })
        .collect();
    out.sort_by_key(|s| s.serial);
    out
}

/// A sensor's daily coverage footprint as a spherical polygon. Range rows
/// are `[distance, latitude, longitude]`; the ring is closed explicitly.
pub fn coverage_polygon(entry: &CoverageEntry) -> Geometry {
    if entry.ranges.is_empty() {
        return Geometry::Polygon(Vec::new());
    }
    let mut ring: Vec<[f64; 2]> = entry.ranges.iter().map(|row| [row[2], row[1]]).collect();
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    Geometry::Polygon(vec![ring])
}

#[cfg(test)]
mod tests {
    use super::{coverage_polygon, daily_counts, rate_series, sensor_records, sensor_types};
    use crate::country::CountryIndex;
    use crate::wire::{CoverageEntry, FactsResponse, MsgRatesResponse, WirePosition, WireSensor};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use spherical::geometry::{Feature, FeatureCollection, Geometry};

    fn sensor(serial: i64, kind: &str, lon: f64, lat: f64, last: i64) -> WireSensor {
        WireSensor {
            serial,
            kind: kind.to_owned(),
            active: true,
            online: false,
            position: WirePosition {
                latitude: lat,
                longitude: lon,
            },
            added: 1_500_000_000,
            last_connection_event: last,
        }
    }

    #[test]
    fn daily_counts_parse_epoch_millis() {
        let facts = FactsResponse {
            message_counts: vec![(1_690_848_000_000, 10.0, 100.0)],
        };
        let counts = daily_counts(&facts);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].date.timestamp(), 1_690_848_000);
        assert_eq!(counts[0].daily, 10.0);
    }

    #[test]
    fn never_connected_sensors_are_dropped() {
        let list = vec![
            sensor(1, "dump1090", 4.4, 50.8, 1_690_848_000),
            sensor(2, "radarcape", 13.4, 52.5, 0),
        ];
        let records = sensor_records(&list, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].serial, 1);
        assert_eq!(records[0].country, None);
    }

    #[test]
    fn records_pick_up_their_country() {
        let mut properties = serde_json::Map::new();
        properties.insert("name".into(), json!("Squareland"));
        let world = FeatureCollection {
            features: vec![Feature {
                id: None,
                properties,
                geometry: Some(Geometry::Polygon(vec![vec![
                    [0.0, 45.0],
                    [10.0, 45.0],
                    [10.0, 55.0],
                    [0.0, 55.0],
                    [0.0, 45.0],
                ]])),
            }],
        };
        let index = CountryIndex::from_collection(&world, "name");
        let records = sensor_records(&[sensor(1, "dump1090", 4.4, 50.8, 1)], Some(&index));
        assert_eq!(records[0].country.as_deref(), Some("Squareland"));
    }

    #[test]
    fn rate_series_joins_types_and_summarizes() {
        let rates: MsgRatesResponse = serde_json::from_value(json!({
            "series": {
                "1": [[1_690_848_000_000_i64, 100.0], [1_690_848_600_000_i64, 300.0]],
                "999": [[1_690_848_000_000_i64, 50.0]]
            }
        }))
        .unwrap();
        let types = sensor_types(&[sensor(1, "dump1090", 0.0, 0.0, 1)]);
        let series = rate_series(&rates, &types);
        // Serial 999 is not in the sensor list.
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].kind, "dump1090");
        assert_eq!(series[0].mean, 200.0);
        assert_eq!(series[0].max, 300.0);
    }

    #[test]
    fn coverage_ring_is_lon_lat_and_closed() {
        let entry = CoverageEntry {
            serial: 1,
            sensor_position: None,
            ranges: vec![[185.0, 51.0, 3.9], [120.0, 50.1, 5.0], [90.0, 49.5, 4.2]],
        };
        let Geometry::Polygon(rings) = coverage_polygon(&entry) else {
            panic!("expected a polygon");
        };
        assert_eq!(rings[0][0], [3.9, 51.0]);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0].first(), rings[0].last());
    }

    #[test]
    fn empty_coverage_is_an_empty_polygon() {
        let entry = CoverageEntry {
            serial: 1,
            sensor_position: None,
            ranges: vec![],
        };
        assert_eq!(coverage_polygon(&entry), Geometry::Polygon(Vec::new()));
    }
}

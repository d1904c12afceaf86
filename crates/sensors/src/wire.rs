//! Wire-format models, matching the upstream API's JSON verbatim.

use std::collections::HashMap;

use serde::Deserialize;

/// Network-wide statistics. Each message-count row is
/// `[epoch milliseconds, daily count, cumulative count]`.
#[derive(Debug, Clone, Deserialize)]
pub struct FactsResponse {
    #[serde(rename = "Message Counts", default)]
    pub message_counts: Vec<(i64, f64, f64)>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WirePosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// One receiver as listed by the API. Timestamps are epoch seconds; a
/// `last_connection_event` of zero means the sensor never connected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSensor {
    pub serial: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub position: WirePosition,
    #[serde(default)]
    pub added: i64,
    #[serde(default)]
    pub last_connection_event: i64,
}

/// Message-rate time series, keyed by sensor serial (as a string, per the
/// wire format). Each sample is `[epoch milliseconds, messages per second]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MsgRatesResponse {
    #[serde(default)]
    pub series: HashMap<String, Vec<(i64, f64)>>,
}

/// One day of coverage for one sensor. Range rows are
/// `[distance, latitude, longitude]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageEntry {
    pub serial: i64,
    #[serde(default)]
    pub sensor_position: Option<WirePosition>,
    #[serde(default)]
    pub ranges: Vec<[f64; 3]>,
}

/// Coverage keyed by day (`YYYYMMDD`).
pub type CoverageResponse = HashMap<String, Vec<CoverageEntry>>;

//! Client and data shaping for a receiver-network statistics API: network
//! facts, the sensor list, per-sensor message rates, and daily coverage
//! ranges, plus the rollups the dashboard plots are built from.

pub mod client;
pub mod country;
pub mod model;
pub mod rollup;
pub mod wire;

pub use client::{
    dashboard_snapshot, DashboardSnapshot, SensorApiClient, SensorApiConfig, SensorApiError,
};
pub use country::CountryIndex;
pub use model::{
    coverage_polygon, daily_counts, rate_series, sensor_records, sensor_types, DailyCount,
    RateSeries, SensorRecord,
};
pub use rollup::{
    histogram, mean_rates_of_kind, quantile, receivers_by_kind, sensors_by_country,
    top_by_quantile,
};
pub use wire::{CoverageEntry, CoverageResponse, FactsResponse, MsgRatesResponse, WireSensor};

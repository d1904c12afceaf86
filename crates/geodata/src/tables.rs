//! Tabular point datasets (CSV): airports and populated places.

use std::fmt;
use std::io;

use serde::Deserialize;

#[derive(Debug)]
pub enum TableError {
    Csv(csv::Error),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Csv(e) => write!(f, "malformed table: {e}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(e) => Some(e),
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        TableError::Csv(e)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Airport {
    #[serde(default)]
    pub iata: String,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "longitude_deg")]
    pub longitude: f64,
    #[serde(alias = "latitude_deg")]
    pub latitude: f64,
}

impl Airport {
    pub fn lonlat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    #[serde(alias = "name")]
    pub city: String,
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: Option<f64>,
}

impl City {
    pub fn lonlat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

pub fn read_airports(reader: impl io::Read) -> Result<Vec<Airport>, TableError> {
    read_records(reader)
}

pub fn read_cities(reader: impl io::Read) -> Result<Vec<City>, TableError> {
    read_records(reader)
}

fn read_records<T: for<'de> Deserialize<'de>>(reader: impl io::Read) -> Result<Vec<T>, TableError> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for record in csv.deserialize() {
        out.push(record?);
    }
    Ok(out)
}

/// Thin a dense dataset for display: keep every `n`-th record, always
/// including the first. `n` of zero or one keeps everything.
pub fn every_nth<T>(items: Vec<T>, n: usize) -> Vec<T> {
    if n <= 1 {
        return items;
    }
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| (i % n == 0).then_some(item))
        .collect()
}

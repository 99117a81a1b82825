// Ridership domain model - records, dataset and the filter engine
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Wire spelling of the "no constraint" selector value
pub const ALL: &str = "All";

/// One row of ridership data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub day: String,
    pub route: String,
    pub hour: u32,
    pub count: u64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Record {
    /// Both coordinates, if the record can be placed on the map
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Loaded once at startup and never mutated afterwards
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    days: Vec<String>,
    routes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub days: Vec<String>,
    pub routes: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let days = distinct_in_order(records.iter().map(|r| r.day.as_str()));
        let routes = distinct_in_order(records.iter().map(|r| r.route.as_str()));
        Self {
            records,
            days,
            routes,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    /// Selector option lists, "All" first
    pub fn filter_options(&self) -> FilterOptions {
        let with_all = |values: &[String]| {
            std::iter::once(ALL.to_string())
                .chain(values.iter().cloned())
                .collect()
        };
        FilterOptions {
            days: with_all(&self.days),
            routes: with_all(&self.routes),
        }
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// A single selector value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Choice::All
        } else {
            Choice::Only(value.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(value) => value,
        }
    }
}

impl From<Option<String>> for Choice {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Choice::parse).unwrap_or_default()
    }
}

impl Serialize for Choice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub day: Choice,
    pub route: Choice,
}

impl FilterSelection {
    pub fn new(day: Choice, route: Choice) -> Self {
        Self { day, route }
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Record> {
        filter(dataset.records(), &self.day, &self.route)
    }
}

/// Order-preserving subset of `records` matching both selectors
pub fn filter<'a>(records: &'a [Record], day: &Choice, route: &Choice) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| day.matches(&r.day) && route.matches(&r.route))
        .collect()
}

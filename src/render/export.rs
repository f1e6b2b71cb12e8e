/// In-memory JSON downloads of fetched results
use crate::domain::{Events3DData, SimulationResult};
use crate::errors::ApiResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct JsonExport {
    pub filename: String,
    pub contents: String,
}

impl JsonExport {
    pub fn simulation(result: &SimulationResult, at: DateTime<Utc>) -> ApiResult<Self> {
        Self::build("risk-analysis", result, at)
    }

    pub fn events(data: &Events3DData, at: DateTime<Utc>) -> ApiResult<Self> {
        Self::build("close-approach-events", data, at)
    }

    fn build<T: Serialize>(prefix: &str, value: &T, at: DateTime<Utc>) -> ApiResult<Self> {
        Ok(Self {
            filename: format!("{}-{}.json", prefix, at.timestamp_millis()),
            contents: serde_json::to_string_pretty(value)?,
        })
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

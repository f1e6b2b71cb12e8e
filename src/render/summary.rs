/// Headline numbers shown next to the charts
use crate::domain::{Events3DData, SimulationResult};
use crate::utils::{format_thousands, min_max};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub event_count: u64,
    pub event_count_label: String,
    pub time_span_days: Option<u32>,
    pub simulation_steps: Option<u32>,
    pub altitude_range_km: Option<(f64, f64)>,
    pub inclination_range_deg: Option<(f64, f64)>,
    pub max_density: Option<f64>,
}

impl SimulationSummary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let heatmap = result.heatmap.as_ref();
        Self {
            event_count: result.event_count,
            event_count_label: format_thousands(result.event_count),
            time_span_days: result.metadata.as_ref().map(|m| m.time_span_days),
            simulation_steps: result.metadata.as_ref().map(|m| m.simulation_steps),
            altitude_range_km: heatmap.and_then(|h| min_max(h.alt_edges.iter().copied())),
            inclination_range_deg: heatmap.and_then(|h| min_max(h.inc_edges.iter().copied())),
            max_density: heatmap
                .and_then(|h| min_max(h.grid.iter().flatten().copied()))
                .map(|(_, hi)| hi),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStats {
    pub total_events: usize,
    pub earth_radius_km: f64,
    pub max_velocity_km_s: f64,
    pub min_velocity_km_s: f64,
    pub avg_velocity_km_s: Option<f64>,
    pub time_span_s: Option<(f64, f64)>,
    pub unique_debris_ids: usize,
}

impl EventStats {
    pub fn from_events(data: &Events3DData) -> Self {
        let events = &data.events;
        let velocity = min_max(events.iter().map(|e| e.vrel_km_s));
        let avg_velocity_km_s = (!events.is_empty())
            .then(|| events.iter().map(|e| e.vrel_km_s).sum::<f64>() / events.len() as f64);
        let unique_debris_ids = events
            .iter()
            .filter_map(|e| e.debris_id.as_deref())
            .filter(|id| !id.is_empty())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_events: events.len(),
            earth_radius_km: data.earth_radius_km,
            max_velocity_km_s: velocity.map_or(0.0, |(_, hi)| hi),
            min_velocity_km_s: velocity.map_or(0.0, |(lo, _)| lo),
            avg_velocity_km_s,
            time_span_s: min_max(events.iter().map(|e| e.time_s)),
            unique_debris_ids,
        }
    }
}

/// Domain models shared with the remote risk service
use serde::{Deserialize, Serialize};

pub const DEFAULT_EARTH_RADIUS_KM: f64 = 6378.137;

/// One debris object as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisObject {
    pub name: String,
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub eccentricity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_section_m2: Option<f64>,
}

impl Default for DebrisObject {
    fn default() -> Self {
        Self {
            name: "New Debris Object".to_string(),
            altitude_km: 400.0,
            inclination_deg: 0.0,
            eccentricity: 0.001,
            mass_kg: Some(100.0),
            cross_section_m2: Some(1.0),
        }
    }
}

/// Preset objects offered by the "load example" actions
pub fn example_objects() -> Vec<DebrisObject> {
    vec![
        DebrisObject {
            name: "ISS Module Fragment".to_string(),
            altitude_km: 420.0,
            inclination_deg: 51.6,
            eccentricity: 0.0003,
            mass_kg: Some(150.0),
            cross_section_m2: Some(2.5),
        },
        DebrisObject {
            name: "Satellite Debris".to_string(),
            altitude_km: 800.0,
            inclination_deg: 98.2,
            eccentricity: 0.001,
            mass_kg: Some(50.0),
            cross_section_m2: Some(1.2),
        },
        DebrisObject {
            name: "Rocket Upper Stage".to_string(),
            altitude_km: 600.0,
            inclination_deg: 28.5,
            eccentricity: 0.002,
            mass_kg: Some(2000.0),
            cross_section_m2: Some(15.0),
        },
    ]
}

/// Body of `POST /simulate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub name: String,
    pub objects: Vec<DebrisObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_span_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_steps: Option<u32>,
}

/// Body of `POST /debris`
#[derive(Debug, Clone, Serialize)]
pub struct CreateAnalysisRequest {
    pub objects: Vec<DebrisObject>,
    pub analysis_name: String,
}

impl From<&AnalysisRequest> for CreateAnalysisRequest {
    fn from(request: &AnalysisRequest) -> Self {
        let analysis_name = if request.name.trim().is_empty() {
            "Untitled Analysis".to_string()
        } else {
            request.name.clone()
        };
        Self {
            objects: request.objects.clone(),
            analysis_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAnalysisResponse {
    pub analysis_id: String,
}

/// Analysis metadata from `GET /debris/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub analysis_name: String,
    pub object_count: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Altitude x inclination density grid, already binned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    #[serde(rename = "H")]
    pub grid: Vec<Vec<f64>>,
    pub alt_edges: Vec<f64>,
    pub inc_edges: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub time_span_days: u32,
    pub simulation_steps: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub event_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Heatmap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SimulationMetadata>,
}

/// One simulated close-approach sample in ECI coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub time_s: f64,
    pub vrel_km_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debris_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Events3DData {
    pub events: Vec<Event3D>,
    #[serde(default = "default_earth_radius")]
    pub earth_radius_km: f64,
}

fn default_earth_radius() -> f64 {
    DEFAULT_EARTH_RADIUS_KM
}

/// Shape rules a decoded payload must satisfy beyond what serde enforces
pub trait Contract {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Contract for HealthStatus {}

impl Contract for AnalysisInfo {}

impl Contract for CreateAnalysisResponse {
    fn check(&self) -> Result<(), String> {
        if self.analysis_id.trim().is_empty() {
            return Err("analysis_id is empty".to_string());
        }
        Ok(())
    }
}

impl Contract for Heatmap {
    fn check(&self) -> Result<(), String> {
        if self.alt_edges.len() < 2 || self.inc_edges.len() < 2 {
            return Err("heatmap needs at least two edges per axis".to_string());
        }
        if self.grid.len() != self.alt_edges.len() - 1 {
            return Err(format!(
                "heatmap has {} rows but {} altitude bins",
                self.grid.len(),
                self.alt_edges.len() - 1
            ));
        }
        let cols = self.inc_edges.len() - 1;
        if let Some((i, row)) = self.grid.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(format!(
                "heatmap row {} has {} columns but {} inclination bins",
                i,
                row.len(),
                cols
            ));
        }
        let all_finite = self
            .alt_edges
            .iter()
            .chain(self.inc_edges.iter())
            .chain(self.grid.iter().flatten())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err("heatmap contains non-finite values".to_string());
        }
        Ok(())
    }
}

impl Contract for SimulationResult {
    fn check(&self) -> Result<(), String> {
        match &self.heatmap {
            Some(heatmap) => heatmap.check(),
            None => Ok(()),
        }
    }
}

impl Contract for Event3D {
    fn check(&self) -> Result<(), String> {
        if ![self.x, self.y, self.z, self.time_s].iter().all(|v| v.is_finite()) {
            return Err("event has non-finite position or time".to_string());
        }
        if !(self.vrel_km_s.is_finite() && self.vrel_km_s >= 0.0) {
            return Err(format!("event relative velocity {} is invalid", self.vrel_km_s));
        }
        Ok(())
    }
}

impl Contract for Events3DData {
    fn check(&self) -> Result<(), String> {
        if !(self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0) {
            return Err(format!("earth radius {} is invalid", self.earth_radius_km));
        }
        for (i, event) in self.events.iter().enumerate() {
            event.check().map_err(|e| format!("events[{}]: {}", i, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simulation_result_reads_capital_h() {
        let raw = json!({
            "heatmap": {
                "H": [[1, 2, 3], [2, 5, 2], [1, 2, 1]],
                "alt_edges": [400, 600, 800, 1000],
                "inc_edges": [0, 30, 60, 90]
            },
            "event_count": 19
        });
        let result: SimulationResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.event_count, 19);
        assert!(result.check().is_ok());
        assert_eq!(result.heatmap.unwrap().grid[1][1], 5.0);
    }

    #[test]
    fn test_heatmap_row_mismatch_rejected() {
        let heatmap = Heatmap {
            grid: vec![vec![1.0, 2.0, 3.0]],
            alt_edges: vec![400.0, 600.0, 800.0],
            inc_edges: vec![0.0, 60.0, 120.0, 180.0],
        };
        let err = heatmap.check().unwrap_err();
        assert!(err.contains("1 rows"));
    }

    #[test]
    fn test_heatmap_column_mismatch_rejected() {
        let heatmap = Heatmap {
            grid: vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]],
            alt_edges: vec![400.0, 600.0, 800.0],
            inc_edges: vec![0.0, 60.0, 120.0, 180.0],
        };
        assert!(heatmap.check().unwrap_err().contains("row 0"));
    }

    #[test]
    fn test_events_default_earth_radius() {
        let data: Events3DData = serde_json::from_value(json!({ "events": [] })).unwrap();
        assert_eq!(data.earth_radius_km, DEFAULT_EARTH_RADIUS_KM);
        assert!(data.check().is_ok());
    }

    #[test]
    fn test_negative_velocity_rejected() {
        let data: Events3DData = serde_json::from_value(json!({
            "events": [{ "x": 1.0, "y": 2.0, "z": 3.0, "time_s": 10.0, "vrel_km_s": -1.0 }],
            "earth_radius_km": 6378.137
        }))
        .unwrap();
        assert!(data.check().unwrap_err().starts_with("events[0]"));
    }

    #[test]
    fn test_optional_fields_omitted_on_the_wire() {
        let object = DebrisObject {
            mass_kg: None,
            cross_section_m2: None,
            ..DebrisObject::default()
        };
        let value = serde_json::to_value(&object).unwrap();
        assert!(value.get("mass_kg").is_none());
        assert!(value.get("cross_section_m2").is_none());
    }

    #[test]
    fn test_create_request_defaults_blank_name() {
        let request = AnalysisRequest {
            name: "  ".to_string(),
            objects: example_objects(),
            time_span_days: None,
            simulation_steps: None,
        };
        let body = CreateAnalysisRequest::from(&request);
        assert_eq!(body.analysis_name, "Untitled Analysis");
        assert_eq!(body.objects.len(), 3);
    }
}

/// 3D close-approach scene: a translucent Earth plus one marker per event
use crate::domain::Events3DData;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::f64::consts::PI;

pub const SPHERE_SUBDIVISIONS: usize = 24;
pub const EARTH_OPACITY: f64 = 0.15;
pub const MARKER_SIZE: u32 = 4;

/// Event attribute that drives marker colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBy {
    #[default]
    Velocity,
    Time,
}

impl ColorBy {
    fn colorscale(&self) -> &'static str {
        match self {
            ColorBy::Velocity => "Hot",
            ColorBy::Time => "Viridis",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ColorBy::Velocity => "v_rel (km/s)",
            ColorBy::Time => "t (s)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3 { x: 1.25, y: 1.25, z: 1.25 },
            center: Vec3 { x: 0.0, y: 0.0, z: 0.0 },
            up: Vec3 { x: 0.0, y: 0.0, z: 1.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneOptions {
    pub color_by: ColorBy,
    pub show_earth: bool,
    pub camera: Camera,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            color_by: ColorBy::default(),
            show_earth: true,
            camera: Camera::default(),
        }
    }
}

/// Latitude/longitude point grid of a sphere, one row per polar step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphereGrid {
    pub xs: Vec<Vec<f64>>,
    pub ys: Vec<Vec<f64>>,
    pub zs: Vec<Vec<f64>>,
}

/// Build a `(phi_steps + 1) x (theta_steps + 1)` grid; both seams are closed
pub fn earth_sphere(radius: f64, phi_steps: usize, theta_steps: usize) -> SphereGrid {
    let mut grid = SphereGrid {
        xs: Vec::with_capacity(phi_steps + 1),
        ys: Vec::with_capacity(phi_steps + 1),
        zs: Vec::with_capacity(phi_steps + 1),
    };

    for i in 0..=phi_steps {
        let phi = PI * i as f64 / phi_steps as f64;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let mut row_x = Vec::with_capacity(theta_steps + 1);
        let mut row_y = Vec::with_capacity(theta_steps + 1);
        let mut row_z = Vec::with_capacity(theta_steps + 1);
        for j in 0..=theta_steps {
            let theta = 2.0 * PI * j as f64 / theta_steps as f64;
            let (sin_theta, cos_theta) = theta.sin_cos();
            row_x.push(radius * sin_phi * cos_theta);
            row_y.push(radius * sin_phi * sin_theta);
            row_z.push(radius * cos_phi);
        }
        grid.xs.push(row_x);
        grid.ys.push(row_y);
        grid.zs.push(row_z);
    }
    grid
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMarkers {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub color: Vec<f64>,
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventScene {
    pub earth: Option<SphereGrid>,
    pub markers: EventMarkers,
    pub options: SceneOptions,
}

impl EventScene {
    pub fn build(data: &Events3DData, options: &SceneOptions) -> Self {
        let earth = options
            .show_earth
            .then(|| earth_sphere(data.earth_radius_km, SPHERE_SUBDIVISIONS, SPHERE_SUBDIVISIONS));

        let events = &data.events;
        let markers = EventMarkers {
            x: events.iter().map(|e| e.x).collect(),
            y: events.iter().map(|e| e.y).collect(),
            z: events.iter().map(|e| e.z).collect(),
            color: events
                .iter()
                .map(|e| match options.color_by {
                    ColorBy::Velocity => e.vrel_km_s,
                    ColorBy::Time => e.time_s,
                })
                .collect(),
            text: events
                .iter()
                .map(|e| format!("t={}s<br>v={:.2} km/s", e.time_s, e.vrel_km_s))
                .collect(),
        };

        Self {
            earth,
            markers,
            options: *options,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.markers.x.len()
    }

    pub fn figure(&self) -> Value {
        let mut traces = Vec::with_capacity(2);
        if let Some(earth) = &self.earth {
            traces.push(json!({
                "type": "surface",
                "x": earth.xs,
                "y": earth.ys,
                "z": earth.zs,
                "showscale": false,
                "opacity": EARTH_OPACITY,
                "contours": { "z": { "show": false } },
                "hoverinfo": "skip",
                "name": "Earth"
            }));
        }
        let color_by = self.options.color_by;
        traces.push(json!({
            "type": "scatter3d",
            "mode": "markers",
            "x": self.markers.x,
            "y": self.markers.y,
            "z": self.markers.z,
            "text": self.markers.text,
            "hoverinfo": "text",
            "name": "Close approaches",
            "marker": {
                "size": MARKER_SIZE,
                "color": self.markers.color,
                "colorscale": color_by.colorscale(),
                "colorbar": { "title": { "text": color_by.title() } }
            }
        }));

        json!({
            "data": traces,
            "layout": {
                "title": "Close-Approach Events (3D ECI)",
                "scene": {
                    "xaxis": { "title": "X (km)" },
                    "yaxis": { "title": "Y (km)" },
                    "zaxis": { "title": "Z (km)" },
                    "aspectmode": "data",
                    "camera": self.options.camera
                },
                "autosize": true
            }
        })
    }
}

/// Altitude x inclination density chart
use crate::domain::Heatmap;
use crate::utils::range_labels;
use serde::Serialize;
use serde_json::{json, Value};

/// Dark blue for the sparsest bins through yellow and orange to red
pub const DENSITY_COLOR_SCALE: [(f64, &str); 5] = [
    (0.0, "#1e3a8a"),
    (0.3, "#3b82f6"),
    (0.5, "#fbbf24"),
    (0.7, "#f97316"),
    (1.0, "#dc2626"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapChart {
    /// Rows are altitude bins, columns inclination bins
    pub z: Vec<Vec<f64>>,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl HeatmapChart {
    pub fn from_heatmap(heatmap: &Heatmap) -> Self {
        Self {
            z: heatmap.grid.clone(),
            x_labels: range_labels(&heatmap.inc_edges, "°"),
            y_labels: range_labels(&heatmap.alt_edges, "km"),
        }
    }

    pub fn rows(&self) -> usize {
        self.z.len()
    }

    pub fn cols(&self) -> usize {
        self.z.first().map_or(0, Vec::len)
    }

    pub fn figure(&self) -> Value {
        let colorscale: Vec<Value> = DENSITY_COLOR_SCALE
            .iter()
            .map(|(stop, color)| json!([stop, color]))
            .collect();

        json!({
            "data": [{
                "type": "heatmap",
                "z": self.z,
                "x": self.x_labels,
                "y": self.y_labels,
                "colorscale": colorscale,
                "colorbar": {
                    "title": { "text": "Debris Density" },
                    "tickmode": "linear",
                    "tick0": 0,
                    "dtick": 3,
                    "outlinewidth": 0,
                    "thickness": 20,
                    "len": 0.7,
                    "font": { "color": "#e2e8f0" }
                },
                "hovertemplate": "<b>Altitude:</b> %{y}<br><b>Inclination:</b> %{x}<br><b>Debris Count:</b> %{z}<br><extra></extra>"
            }],
            "layout": {
                "title": "Debris Density by Altitude & Inclination",
                "xaxis": { "title": "Orbital Inclination", "color": "#94a3b8", "gridcolor": "#334155" },
                "yaxis": { "title": "Altitude Range", "color": "#94a3b8", "gridcolor": "#334155" },
                "plot_bgcolor": "#0f172a",
                "paper_bgcolor": "#0f172a",
                "font": { "color": "#e2e8f0" },
                "margin": { "l": 80, "r": 80, "t": 60, "b": 60 },
                "autosize": true
            },
            "config": { "responsive": true, "displayModeBar": true, "displaylogo": false }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Heatmap {
        Heatmap {
            grid: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            alt_edges: vec![400.0, 600.0, 800.0],
            inc_edges: vec![0.0, 60.0, 120.0, 180.0],
        }
    }

    #[test]
    fn test_grid_shape_and_labels() {
        let chart = HeatmapChart::from_heatmap(&sample());
        assert_eq!(chart.rows(), 2);
        assert_eq!(chart.cols(), 3);
        assert_eq!(chart.y_labels[0], "400-600km");
        assert_eq!(chart.x_labels, vec!["0-60°", "60-120°", "120-180°"]);
    }

    #[test]
    fn test_figure_carries_fixed_color_scale() {
        let figure = HeatmapChart::from_heatmap(&sample()).figure();
        let scale = figure["data"][0]["colorscale"].as_array().unwrap();
        assert_eq!(scale.len(), 5);
        assert_eq!(scale[0][1], "#1e3a8a");
        assert_eq!(scale[4][1], "#dc2626");
        assert_eq!(figure["data"][0]["z"][1][2], 6.0);
    }
}

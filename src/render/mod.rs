/// Chart figures (Plotly figure JSON), summaries and exports built from fetched data
pub use events::{earth_sphere, Camera, ColorBy, EventScene, SceneOptions, SphereGrid};
pub use export::JsonExport;
pub use heatmap::HeatmapChart;
pub use summary::{EventStats, SimulationSummary};

pub mod events;
pub mod export;
pub mod heatmap;
pub mod summary;

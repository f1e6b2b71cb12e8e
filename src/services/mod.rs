/// Page composition: the dashboard wires form, request handles and renderers
use crate::clients::RiskApiClient;
use crate::config::AppConfig;
use crate::domain::{Events3DData, HealthStatus, SimulationResult};
use crate::errors::{ApiError, ApiResult};
use crate::forms::AnalysisForm;
use crate::render::{
    Camera, ColorBy, EventScene, EventStats, HeatmapChart, JsonExport, SceneOptions,
    SimulationSummary,
};
use crate::requests::endpoints::{EventsLoader, HealthCheck, SimulationRunner};
use crate::requests::RequestState;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

mod analysis;

pub use analysis::{AnalysisPanel, AnalysisWorkflow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Custom,
    Demo,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub environment: &'static str,
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationPanel {
    #[serde(flatten)]
    pub state: RequestState<SimulationResult>,
    pub summary: Option<SimulationSummary>,
    pub figure: Option<Value>,
}

impl SimulationPanel {
    pub fn from_state(state: RequestState<SimulationResult>) -> Self {
        let summary = state.data.as_ref().map(SimulationSummary::from_result);
        let figure = state
            .data
            .as_ref()
            .and_then(|r| r.heatmap.as_ref())
            .map(|h| HeatmapChart::from_heatmap(h).figure());
        Self {
            state,
            summary,
            figure,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsPanel {
    #[serde(flatten)]
    pub state: RequestState<Events3DData>,
    pub stats: Option<EventStats>,
    pub figure: Option<Value>,
}

impl EventsPanel {
    pub fn from_state(state: RequestState<Events3DData>, scene: &SceneOptions) -> Self {
        let stats = state.data.as_ref().map(EventStats::from_events);
        let figure = state
            .data
            .as_ref()
            .map(|d| EventScene::build(d, scene).figure());
        Self {
            state,
            stats,
            figure,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub app: AppInfo,
    pub mode: ViewMode,
    pub health: RequestState<HealthStatus>,
    pub simulation: SimulationPanel,
    pub events: EventsPanel,
    pub form: AnalysisForm,
    pub scene: SceneOptions,
    pub analysis: AnalysisPanel,
}

/// Everything one dashboard screen owns
pub struct Dashboard {
    app: AppInfo,
    mode: RwLock<ViewMode>,
    scene: RwLock<SceneOptions>,
    form: Mutex<AnalysisForm>,
    health: HealthCheck,
    simulation: SimulationRunner,
    events: EventsLoader,
    analysis: AnalysisWorkflow,
}

impl Dashboard {
    pub fn new(config: &AppConfig, client: Arc<RiskApiClient>) -> Self {
        Self {
            app: AppInfo {
                name: config.app_name.clone(),
                version: config.app_version.clone(),
                environment: config.environment.as_str(),
                api_url: config.api_url.clone(),
            },
            mode: RwLock::new(ViewMode::default()),
            scene: RwLock::new(SceneOptions::default()),
            form: Mutex::new(AnalysisForm::new()),
            health: HealthCheck::new(Arc::clone(&client)),
            simulation: SimulationRunner::new(Arc::clone(&client)),
            events: EventsLoader::new(Arc::clone(&client)),
            analysis: AnalysisWorkflow::new(client),
        }
    }

    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    pub fn mode(&self) -> ViewMode {
        *self.mode.read()
    }

    pub fn set_mode(&self, mode: ViewMode) {
        *self.mode.write() = mode;
    }

    pub async fn check_health(&self) -> RequestState<HealthStatus> {
        self.health.check_health().await;
        self.health.handle().snapshot()
    }

    /// Server-side demo scenario: `POST /simulate` without a body
    pub async fn run_demo(&self) -> SimulationPanel {
        info!("running demo simulation");
        self.simulation.run_simulation(None).await;
        self.simulation_panel()
    }

    /// Validate the form and, only if it passes, run the simulation with it
    pub async fn submit_form(&self) -> ApiResult<SimulationPanel> {
        let request = {
            let mut form = self.form.lock();
            form.submit().map_err(ApiError::Validation)?
        };
        info!(
            "running simulation {:?} with {} object(s)",
            request.name,
            request.objects.len()
        );
        self.simulation.run_simulation(Some(request)).await;
        Ok(self.simulation_panel())
    }

    pub async fn load_events(&self) -> EventsPanel {
        self.events.load_events().await;
        self.events_panel()
    }

    /// Reset simulation and events together
    pub fn clear_results(&self) {
        self.simulation.handle().reset();
        self.events.handle().reset();
    }

    pub fn dismiss_error(&self) {
        self.health.handle().clear_error();
        self.simulation.handle().clear_error();
        self.events.handle().clear_error();
        self.analysis.clear_errors();
    }

    pub fn form(&self) -> AnalysisForm {
        self.form.lock().clone()
    }

    /// Apply an edit to the form and return its new state
    pub fn edit_form<R>(&self, edit: impl FnOnce(&mut AnalysisForm) -> R) -> (R, AnalysisForm) {
        let mut form = self.form.lock();
        let outcome = edit(&mut form);
        (outcome, form.clone())
    }

    pub fn scene_options(&self) -> SceneOptions {
        *self.scene.read()
    }

    pub fn set_color_by(&self, color_by: ColorBy) -> SceneOptions {
        let mut scene = self.scene.write();
        scene.color_by = color_by;
        *scene
    }

    pub fn toggle_earth(&self) -> SceneOptions {
        let mut scene = self.scene.write();
        scene.show_earth = !scene.show_earth;
        *scene
    }

    pub fn set_camera(&self, camera: Camera) -> SceneOptions {
        let mut scene = self.scene.write();
        scene.camera = camera;
        *scene
    }

    pub fn reset_camera(&self) -> SceneOptions {
        self.set_camera(Camera::default())
    }

    pub fn simulation_panel(&self) -> SimulationPanel {
        SimulationPanel::from_state(self.simulation.handle().snapshot())
    }

    pub fn events_panel(&self) -> EventsPanel {
        EventsPanel::from_state(self.events.handle().snapshot(), &self.scene_options())
    }

    pub fn analysis(&self) -> &AnalysisWorkflow {
        &self.analysis
    }

    /// Register the form's objects as a stored analysis on the server.
    /// Only the objects are validated; a blank name is sent as "Untitled Analysis".
    pub async fn create_analysis(&self) -> ApiResult<AnalysisPanel> {
        let request = {
            let mut form = self.form.lock();
            form.register().map_err(ApiError::Validation)?
        };
        self.analysis.create(&request).await;
        Ok(self.analysis.panel(&self.scene_options()))
    }

    pub fn export_simulation(&self) -> ApiResult<JsonExport> {
        let result = self
            .simulation
            .handle()
            .data()
            .ok_or_else(|| ApiError::NotFound("no simulation result to export".to_string()))?;
        JsonExport::simulation(&result, Utc::now())
    }

    pub fn export_events(&self) -> ApiResult<JsonExport> {
        let data = self
            .events
            .handle()
            .data()
            .ok_or_else(|| ApiError::NotFound("no events to export".to_string()))?;
        JsonExport::events(&data, Utc::now())
    }

    pub fn view(&self) -> DashboardView {
        let scene = self.scene_options();
        DashboardView {
            app: self.app.clone(),
            mode: self.mode(),
            health: self.health.handle().snapshot(),
            simulation: self.simulation_panel(),
            events: EventsPanel::from_state(self.events.handle().snapshot(), &scene),
            form: self.form(),
            scene,
            analysis: self.analysis.panel(&scene),
        }
    }

    /// Cancel everything in flight; late responses are discarded
    pub fn abandon_in_flight(&self) {
        self.health.handle().abandon();
        self.simulation.handle().abandon();
        self.events.handle().abandon();
        self.analysis.abandon();
    }
}

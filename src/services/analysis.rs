/// Stored analyses: register objects once, then simulate and load events by id
use super::{EventsPanel, SimulationPanel};
use crate::clients::{checked_id, RiskApiClient};
use crate::domain::{
    AnalysisInfo, AnalysisRequest, CreateAnalysisRequest, CreateAnalysisResponse, Events3DData,
    SimulationResult,
};
use crate::render::SceneOptions;
use crate::requests::{RequestHandle, RequestState};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisPanel {
    pub analysis_id: Option<String>,
    pub creation: RequestState<CreateAnalysisResponse>,
    pub info: RequestState<AnalysisInfo>,
    pub simulation: SimulationPanel,
    pub events: EventsPanel,
}

pub struct AnalysisWorkflow {
    client: Arc<RiskApiClient>,
    current: RwLock<Option<String>>,
    creation: RequestHandle<CreateAnalysisResponse>,
    info: RequestHandle<AnalysisInfo>,
    simulation: RequestHandle<SimulationResult>,
    events: RequestHandle<Events3DData>,
}

impl AnalysisWorkflow {
    pub fn new(client: Arc<RiskApiClient>) -> Self {
        Self {
            client,
            current: RwLock::new(None),
            creation: RequestHandle::new("analysis-create"),
            info: RequestHandle::new("analysis-info"),
            simulation: RequestHandle::new("analysis-simulation"),
            events: RequestHandle::new("analysis-events"),
        }
    }

    pub fn current_id(&self) -> Option<String> {
        self.current.read().clone()
    }

    /// `POST /debris`; on success the new id becomes current and its info is fetched
    pub async fn create(&self, request: &AnalysisRequest) -> Option<String> {
        let body = CreateAnalysisRequest::from(request);
        let client = Arc::clone(&self.client);
        let created = self
            .creation
            .execute(|token| async move { client.create_analysis(&body, &token).await })
            .await?;

        let id = created.analysis_id;
        info!("analysis {} created", id);

        // fetching the info makes the new id current
        if self.fetch_info(&id).await.is_none() {
            warn!("could not load info for analysis {}", id);
        }
        Some(id)
    }

    pub async fn fetch_info(&self, analysis_id: &str) -> Option<AnalysisInfo> {
        if !self.accept(analysis_id, &self.info) {
            return None;
        }
        let client = Arc::clone(&self.client);
        let id = analysis_id.to_string();
        self.info
            .execute(|token| async move { client.analysis_info(&id, &token).await })
            .await
    }

    pub async fn simulate(&self, analysis_id: &str) -> Option<SimulationResult> {
        if !self.accept(analysis_id, &self.simulation) {
            return None;
        }
        let client = Arc::clone(&self.client);
        let id = analysis_id.to_string();
        self.simulation
            .execute(|token| async move { client.simulate_analysis(&id, &token).await })
            .await
    }

    pub async fn load_events(&self, analysis_id: &str) -> Option<Events3DData> {
        if !self.accept(analysis_id, &self.events) {
            return None;
        }
        let client = Arc::clone(&self.client);
        let id = analysis_id.to_string();
        self.events
            .execute(|token| async move { client.analysis_events(&id, &token).await })
            .await
    }

    /// A malformed id is reported on `handle` and never becomes current
    fn accept<T: Clone>(&self, analysis_id: &str, handle: &RequestHandle<T>) -> bool {
        match checked_id(analysis_id) {
            Ok(id) => {
                self.select(id);
                true
            }
            Err(e) => {
                warn!("rejected analysis id {:?}", analysis_id);
                handle.fail(&e);
                false
            }
        }
    }

    /// Switching to another analysis drops the previous one's results
    fn select(&self, analysis_id: &str) {
        let mut current = self.current.write();
        if current.as_deref() == Some(analysis_id) {
            return;
        }
        *current = Some(analysis_id.to_string());
        self.info.reset();
        self.simulation.reset();
        self.events.reset();
    }

    pub fn panel(&self, scene: &SceneOptions) -> AnalysisPanel {
        AnalysisPanel {
            analysis_id: self.current_id(),
            creation: self.creation.snapshot(),
            info: self.info.snapshot(),
            simulation: SimulationPanel::from_state(self.simulation.snapshot()),
            events: EventsPanel::from_state(self.events.snapshot(), scene),
        }
    }

    pub fn clear_errors(&self) {
        self.creation.clear_error();
        self.info.clear_error();
        self.simulation.clear_error();
        self.events.clear_error();
    }

    pub fn abandon(&self) {
        self.creation.abandon();
        self.info.abandon();
        self.simulation.abandon();
        self.events.abandon();
    }
}

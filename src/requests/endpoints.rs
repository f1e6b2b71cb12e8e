/// Request handles bound to one remote endpoint each
use super::RequestHandle;
use crate::clients::RiskApiClient;
use crate::domain::{AnalysisRequest, Events3DData, HealthStatus, SimulationResult};
use std::sync::Arc;

pub struct HealthCheck {
    client: Arc<RiskApiClient>,
    handle: RequestHandle<HealthStatus>,
}

impl HealthCheck {
    pub fn new(client: Arc<RiskApiClient>) -> Self {
        Self {
            client,
            handle: RequestHandle::new("health"),
        }
    }

    pub async fn check_health(&self) -> Option<HealthStatus> {
        let client = Arc::clone(&self.client);
        self.handle
            .execute(|token| async move { client.health(&token).await })
            .await
    }

    pub fn handle(&self) -> &RequestHandle<HealthStatus> {
        &self.handle
    }
}

pub struct SimulationRunner {
    client: Arc<RiskApiClient>,
    handle: RequestHandle<SimulationResult>,
}

impl SimulationRunner {
    pub fn new(client: Arc<RiskApiClient>) -> Self {
        Self {
            client,
            handle: RequestHandle::new("simulation"),
        }
    }

    /// `None` runs the demo scenario: the request goes out without a body
    pub async fn run_simulation(
        &self,
        request: Option<AnalysisRequest>,
    ) -> Option<SimulationResult> {
        let client = Arc::clone(&self.client);
        self.handle
            .execute(|token| async move { client.simulate(request.as_ref(), &token).await })
            .await
    }

    pub fn handle(&self) -> &RequestHandle<SimulationResult> {
        &self.handle
    }
}

pub struct EventsLoader {
    client: Arc<RiskApiClient>,
    handle: RequestHandle<Events3DData>,
}

impl EventsLoader {
    pub fn new(client: Arc<RiskApiClient>) -> Self {
        Self {
            client,
            handle: RequestHandle::new("events"),
        }
    }

    pub async fn load_events(&self) -> Option<Events3DData> {
        let client = Arc::clone(&self.client);
        self.handle
            .execute(|token| async move { client.events(&token).await })
            .await
    }

    pub fn handle(&self) -> &RequestHandle<Events3DData> {
        &self.handle
    }
}

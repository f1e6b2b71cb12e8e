/// HTTP request handlers
use crate::domain::DebrisObject;
use crate::errors::{ApiError, ApiResult};
use crate::render::{Camera, ColorBy, JsonExport};
use crate::services::{Dashboard, ViewMode};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

type JsonResult<T> = ApiResult<Json<SuccessResponse<T>>>;

fn ok<T: Serialize>(data: T) -> JsonResult<T> {
    Ok(Json(SuccessResponse::new(data)))
}

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub now: DateTime<Utc>,
    pub app: String,
    pub version: String,
}

/// Local liveness; never touches the remote service
pub async fn health(State(state): State<AppState>) -> Json<Liveness> {
    let app = state.dashboard.app();
    Json(Liveness {
        status: "ok",
        now: Utc::now(),
        app: app.name.clone(),
        version: app.version.clone(),
    })
}

/// Remote health check
pub async fn api_status(State(state): State<AppState>) -> JsonResult<Value> {
    let health = state.dashboard.check_health().await;
    ok(json!({ "health": health }))
}

pub async fn get_dashboard(State(state): State<AppState>) -> JsonResult<Value> {
    ok(json!({ "dashboard": state.dashboard.view() }))
}

#[derive(Debug, Deserialize)]
pub struct ModeBody {
    pub mode: ViewMode,
}

pub async fn set_mode(
    State(state): State<AppState>,
    Json(body): Json<ModeBody>,
) -> JsonResult<Value> {
    state.dashboard.set_mode(body.mode);
    ok(json!({ "mode": state.dashboard.mode() }))
}

pub async fn run_demo(State(state): State<AppState>) -> JsonResult<Value> {
    let simulation = state.dashboard.run_demo().await;
    ok(json!({ "simulation": simulation }))
}

pub async fn load_events(State(state): State<AppState>) -> JsonResult<Value> {
    let events = state.dashboard.load_events().await;
    ok(json!({ "events": events }))
}

pub async fn clear_results(State(state): State<AppState>) -> JsonResult<Value> {
    state.dashboard.clear_results();
    ok(json!({
        "simulation": state.dashboard.simulation_panel(),
        "events": state.dashboard.events_panel()
    }))
}

pub async fn dismiss_error(State(state): State<AppState>) -> JsonResult<Value> {
    state.dashboard.dismiss_error();
    ok(json!({ "dismissed": true }))
}

pub async fn get_form(State(state): State<AppState>) -> JsonResult<Value> {
    ok(json!({ "form": state.dashboard.form() }))
}

#[derive(Debug, Deserialize)]
pub struct NameBody {
    pub analysis_name: String,
}

pub async fn set_form_name(
    State(state): State<AppState>,
    Json(body): Json<NameBody>,
) -> JsonResult<Value> {
    let ((), form) = state
        .dashboard
        .edit_form(|form| form.set_analysis_name(body.analysis_name));
    ok(json!({ "form": form }))
}

#[derive(Debug, Deserialize)]
pub struct ParametersBody {
    pub time_span_days: Option<u32>,
    pub simulation_steps: Option<u32>,
}

pub async fn set_form_parameters(
    State(state): State<AppState>,
    Json(body): Json<ParametersBody>,
) -> JsonResult<Value> {
    let ((), form) = state.dashboard.edit_form(|form| {
        form.set_parameters(body.time_span_days, body.simulation_steps)
    });
    ok(json!({ "form": form }))
}

pub async fn add_object(State(state): State<AppState>) -> JsonResult<Value> {
    let ((), form) = state.dashboard.edit_form(|form| form.add_object());
    ok(json!({ "form": form }))
}

pub async fn update_object(
    Path(index): Path<usize>,
    State(state): State<AppState>,
    Json(object): Json<DebrisObject>,
) -> JsonResult<Value> {
    let (updated, form) = state
        .dashboard
        .edit_form(|form| form.update_object(index, object));
    if !updated {
        return Err(ApiError::NotFound(format!("no object at index {}", index)));
    }
    ok(json!({ "form": form }))
}

pub async fn remove_object(
    Path(index): Path<usize>,
    State(state): State<AppState>,
) -> JsonResult<Value> {
    let (removed, form) = state.dashboard.edit_form(|form| form.remove_object(index));
    if !removed {
        if index >= form.objects().len() {
            return Err(ApiError::NotFound(format!("no object at index {}", index)));
        }
        return Err(ApiError::InvalidInput(
            "at least one object is required".to_string(),
        ));
    }
    ok(json!({ "form": form }))
}

pub async fn load_all_examples(State(state): State<AppState>) -> JsonResult<Value> {
    let ((), form) = state.dashboard.edit_form(|form| form.load_all_examples());
    ok(json!({ "form": form }))
}

pub async fn load_example(
    Path(index): Path<usize>,
    State(state): State<AppState>,
) -> JsonResult<Value> {
    let (loaded, form) = state.dashboard.edit_form(|form| form.load_example(index));
    if !loaded {
        return Err(ApiError::NotFound(format!("no example at index {}", index)));
    }
    ok(json!({ "form": form }))
}

/// Validation failures come back as `VALIDATION_FAILED` with per-field messages
pub async fn submit_form(State(state): State<AppState>) -> JsonResult<Value> {
    let simulation = state.dashboard.submit_form().await?;
    ok(json!({ "simulation": simulation }))
}

#[derive(Debug, Deserialize)]
pub struct ColorByBody {
    pub color_by: ColorBy,
}

pub async fn set_color_by(
    State(state): State<AppState>,
    Json(body): Json<ColorByBody>,
) -> JsonResult<Value> {
    let scene = state.dashboard.set_color_by(body.color_by);
    ok(json!({ "scene": scene }))
}

pub async fn toggle_earth(State(state): State<AppState>) -> JsonResult<Value> {
    let scene = state.dashboard.toggle_earth();
    ok(json!({ "scene": scene }))
}

pub async fn set_camera(
    State(state): State<AppState>,
    Json(camera): Json<Camera>,
) -> JsonResult<Value> {
    let scene = state.dashboard.set_camera(camera);
    ok(json!({ "scene": scene }))
}

pub async fn reset_camera(State(state): State<AppState>) -> JsonResult<Value> {
    let scene = state.dashboard.reset_camera();
    ok(json!({ "scene": scene }))
}

fn download(export: JsonExport) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.contents,
    )
}

pub async fn export_simulation(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(download(state.dashboard.export_simulation()?))
}

pub async fn export_events(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(download(state.dashboard.export_events()?))
}

pub async fn create_analysis(State(state): State<AppState>) -> JsonResult<Value> {
    let analysis = state.dashboard.create_analysis().await?;
    ok(json!({ "analysis": analysis }))
}

pub async fn get_analysis(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> JsonResult<Value> {
    let dashboard = &state.dashboard;
    dashboard.analysis().fetch_info(&id).await;
    ok(json!({ "analysis": dashboard.analysis().panel(&dashboard.scene_options()) }))
}

pub async fn simulate_analysis(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> JsonResult<Value> {
    let dashboard = &state.dashboard;
    dashboard.analysis().simulate(&id).await;
    ok(json!({ "analysis": dashboard.analysis().panel(&dashboard.scene_options()) }))
}

pub async fn analysis_events(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> JsonResult<Value> {
    let dashboard = &state.dashboard;
    dashboard.analysis().load_events(&id).await;
    ok(json!({ "analysis": dashboard.analysis().panel(&dashboard.scene_options()) }))
}

/// Application routes configuration
use crate::handlers::{
    add_object, analysis_events, api_status, clear_results, create_analysis, dismiss_error,
    export_events, export_simulation, get_analysis, get_dashboard, get_form, health,
    load_all_examples, load_example, load_events, remove_object, reset_camera, run_demo,
    set_camera, set_color_by, set_form_name, set_form_parameters, set_mode, simulate_analysis,
    submit_form, toggle_earth, update_object, AppState,
};
use axum::{
    routing::{get, post, put},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        .route("/api/status", get(api_status))
        // Dashboard
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/mode", put(set_mode))
        .route("/demo/run", post(run_demo))
        .route("/events/load", post(load_events))
        .route("/results/clear", post(clear_results))
        .route("/errors/dismiss", post(dismiss_error))
        // Analysis form
        .route("/form", get(get_form))
        .route("/form/name", put(set_form_name))
        .route("/form/parameters", put(set_form_parameters))
        .route("/form/objects", post(add_object))
        .route(
            "/form/objects/:index",
            put(update_object).delete(remove_object),
        )
        .route("/form/examples", post(load_all_examples))
        .route("/form/examples/:index", post(load_example))
        .route("/form/submit", post(submit_form))
        // 3D view
        .route("/view/color-by", put(set_color_by))
        .route("/view/earth/toggle", post(toggle_earth))
        .route("/view/camera", put(set_camera))
        .route("/view/camera/reset", post(reset_camera))
        // Downloads
        .route("/export/simulation", get(export_simulation))
        .route("/export/events", get(export_events))
        // Stored analyses
        .route("/analyses", post(create_analysis))
        .route("/analyses/:id", get(get_analysis))
        .route("/analyses/:id/simulate", post(simulate_analysis))
        .route("/analyses/:id/events", get(analysis_events))
        .with_state(state)
}

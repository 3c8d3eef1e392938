//! HTTP handlers for the OpenShift self-service endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use selfservice_common::{
    messages, ApiResponse, EditBillingDataCommand, EditQuotasCommand, NewProjectCommand,
    NewTestProjectCommand,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::auth::{auth_middleware, AuthUser};
use crate::state::AppState;

type HandlerResult = Result<Json<ApiResponse>, ApiError>;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/api/ose/project", post(new_project))
        .route("/api/ose/testproject", post(new_test_project))
        .route("/api/ose/billing", post(update_billing))
        .route("/api/ose/billing/:project", get(get_billing))
        .route("/api/ose/quotas", post(update_quotas))
        .with_state(state)
        .layer(axum_middleware::from_fn(auth_middleware));

    Router::new()
        .route("/api/health", get(health_check))
        .merge(protected_routes)
}

fn bind<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(cmd)| cmd).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::wrong_usage()
    })
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse::new("ok"))
}

async fn new_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<NewProjectCommand>, JsonRejection>,
) -> HandlerResult {
    let cmd = bind(payload)?;

    state
        .provisioner
        .provision(&user.username, &cmd.project, &cmd.mega_id, &cmd.billing, false)
        .await?;

    Ok(Json(ApiResponse::new(messages::PROJECT_CREATED)))
}

async fn new_test_project(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<NewTestProjectCommand>, JsonRejection>,
) -> HandlerResult {
    let cmd = bind(payload)?;

    state
        .provisioner
        .provision_test_project(&user.username, &cmd.project)
        .await?;

    Ok(Json(ApiResponse::new(messages::TEST_PROJECT_CREATED)))
}

async fn update_billing(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<EditBillingDataCommand>, JsonRejection>,
) -> HandlerResult {
    let cmd = bind(payload)?;

    state
        .metadata
        .update_billing(&user.username, &cmd.project, &cmd.billing)
        .await?;

    Ok(Json(ApiResponse::new(messages::DATA_SAVED)))
}

async fn get_billing(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(project): Path<String>,
) -> HandlerResult {
    let billing = state.metadata.billing(&user.username, &project).await?;

    Ok(Json(ApiResponse::new(messages::current_billing(&billing))))
}

async fn update_quotas(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<EditQuotasCommand>, JsonRejection>,
) -> HandlerResult {
    let cmd = bind(payload)?;

    state
        .quotas
        .update_quota(&user.username, &cmd.project, cmd.cpu, cmd.memory)
        .await?;

    Ok(Json(ApiResponse::new(messages::QUOTAS_SAVED)))
}

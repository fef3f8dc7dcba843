use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logic::{
    AdminActions, BranchOperations, ChangeRequestOperations, OpError, OrderOperations,
    RevisionOperations,
};
use crate::model::{
    Badge, Commit, FileRef, Id, NewChangeRequest, NewCommit, NewOrder, Order, ReworkReason,
    StageState, Station,
};
use crate::notify::{MemoryNotifier, StationEvent};
use crate::store::Store;

/// Shared state: the order repository plus the notification bus.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub notifier: Arc<MemoryNotifier>,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, notifier: Arc<MemoryNotifier>) -> Self {
        Self { store, notifier }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(err: anyhow::Error) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&err.to_string())),
    )
}

fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(what)))
}

/// Map logic errors onto status codes: missing order -> 404, rejected stage
/// transition -> 400, everything else -> 500.
fn op_error(err: anyhow::Error) -> ApiError {
    match err.downcast_ref::<OpError>() {
        Some(OpError::OrderNotFound(_)) => not_found(&err.to_string()),
        Some(OpError::IllegalStageTransition { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(&err.to_string())),
        ),
        None => internal_error(err),
    }
}

fn success(flag: bool) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": flag }))
}

fn default_author() -> String {
    "admin".to_string()
}

// ---- Orders ----

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub seed: NewOrder,
    pub author: Option<String>,
}

pub async fn create_order<S: Store>(
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let author = req.author.unwrap_or_else(default_author);
    match OrderOperations::create_order(&*state.store, req.seed, &author).await {
        Ok(order) => Ok(Json(order)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn list_orders<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Order>>, ApiError> {
    match OrderOperations::list_orders(&*state.store).await {
        Ok(orders) => Ok(Json(orders)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn get_order<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
) -> Result<Json<Order>, ApiError> {
    match OrderOperations::get_order(&*state.store, &order_id).await {
        Ok(Some(order)) => Ok(Json(order)),
        Ok(None) => Err(not_found("Order not found")),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetBadgesRequest {
    pub badges: Vec<Badge>,
}

pub async fn set_badges<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<SetBadgesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match OrderOperations::set_badges(&*state.store, &order_id, req.badges).await {
        Ok(true) => Ok(success(true)),
        Ok(false) => Err(not_found("Order not found")),
        Err(e) => Err(internal_error(e)),
    }
}

// ---- Change requests ----

#[derive(Debug, Serialize)]
pub struct OpenedResponse {
    pub id: Id,
}

pub async fn open_change_request<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<NewChangeRequest>,
) -> Result<Json<OpenedResponse>, ApiError> {
    match ChangeRequestOperations::open(&*state.store, &order_id, req).await {
        Ok(Some(id)) => Ok(Json(OpenedResponse { id })),
        Ok(None) => Err(not_found("Order not found")),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    pub author: Option<String>,
}

pub async fn approve_change_request<S: Store>(
    Path((order_id, request_id)): Path<(Id, Id)>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<ApproveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let admin = req.author.unwrap_or_else(default_author);
    match ChangeRequestOperations::merge(&*state.store, &order_id, &request_id, &admin).await {
        Ok(merged) => Ok(success(merged)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn decline_change_request<S: Store>(
    Path((order_id, request_id)): Path<(Id, Id)>,
    State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match ChangeRequestOperations::close(&*state.store, &order_id, &request_id).await {
        Ok(closed) => Ok(success(closed)),
        Err(e) => Err(internal_error(e)),
    }
}

// ---- Revisions ----

#[derive(Debug, Deserialize)]
pub struct AddRevisionRequest {
    pub file: FileRef,
    pub author: Option<String>,
    pub message: Option<String>,
}

pub async fn add_revision<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<AddRevisionRequest>,
) -> Result<Json<OpenedResponse>, ApiError> {
    let author = req.author.unwrap_or_else(default_author);
    match RevisionOperations::add_revision(&*state.store, &order_id, req.file, &author, req.message)
        .await
    {
        Ok(id) => Ok(Json(OpenedResponse { id })),
        Err(e) => Err(op_error(e)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDefaultRevisionRequest {
    pub revision_id: Id,
    pub author: Option<String>,
}

pub async fn set_default_revision<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<SetDefaultRevisionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let author = req.author.unwrap_or_else(default_author);
    match RevisionOperations::set_default_revision(
        &*state.store,
        &order_id,
        &req.revision_id,
        &author,
    )
    .await
    {
        Ok(switched) => Ok(success(switched)),
        Err(e) => Err(internal_error(e)),
    }
}

// ---- Branches ----

#[derive(Debug, Deserialize)]
pub struct CreateBranchRequest {
    pub name: String,
    pub from: Option<String>,
}

pub async fn create_branch<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<CreateBranchRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let from = req.from.as_deref().unwrap_or("main");
    match BranchOperations::create_branch(&*state.store, &order_id, &req.name, from).await {
        Ok(created) => Ok(success(created)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn delete_branch<S: Store>(
    Path((order_id, name)): Path<(Id, String)>,
    State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match BranchOperations::delete_branch(&*state.store, &order_id, &name).await {
        Ok(deleted) => Ok(success(deleted)),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetDefaultBranchRequest {
    pub name: String,
}

pub async fn set_default_branch<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<SetDefaultBranchRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match BranchOperations::set_default_branch(&*state.store, &order_id, &req.name).await {
        Ok(updated) => Ok(success(updated)),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn commit<S: Store>(
    Path((order_id, branch)): Path<(Id, String)>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<NewCommit>,
) -> Result<Json<Commit>, ApiError> {
    match BranchOperations::commit(&*state.store, &order_id, &branch, req).await {
        Ok(Some(commit)) => Ok(Json(commit)),
        Ok(None) => Err(not_found("Order or branch not found")),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackRequest {
    pub commit_id: Id,
}

pub async fn rollback<S: Store>(
    Path((order_id, branch)): Path<(Id, String)>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<RollbackRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match BranchOperations::rollback(&*state.store, &order_id, &branch, &req.commit_id).await {
        Ok(rolled_back) => Ok(success(rolled_back)),
        Err(e) => Err(internal_error(e)),
    }
}

// ---- Redo flags ----

#[derive(Debug, Deserialize)]
pub struct AddRedoFlagRequest {
    pub station: Station,
    pub reason: ReworkReason,
}

pub async fn add_redo_flag<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<AddRedoFlagRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match OrderOperations::add_redo_flag(&*state.store, &order_id, req.station, req.reason).await {
        Ok(true) => Ok(success(true)),
        Ok(false) => Err(not_found("Order not found")),
        Err(e) => Err(internal_error(e)),
    }
}

pub async fn clear_redo_flag<S: Store>(
    Path((order_id, station)): Path<(Id, Station)>,
    State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match OrderOperations::clear_redo_flag(&*state.store, &order_id, station).await {
        Ok(true) => Ok(success(true)),
        Ok(false) => Err(not_found("Order not found")),
        Err(e) => Err(internal_error(e)),
    }
}

// ---- Stage intents ----

#[derive(Debug, Deserialize)]
pub struct ReworkIntentRequest {
    pub reason: ReworkReason,
    pub note: Option<String>,
    pub author: Option<String>,
}

pub async fn send_to_rework<S: Store>(
    Path((order_id, station)): Path<(Id, Station)>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<ReworkIntentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let admin = req.author.unwrap_or_else(default_author);
    match AdminActions::send_to_rework(
        &*state.store,
        &*state.notifier,
        &order_id,
        station,
        req.reason,
        req.note.as_deref().unwrap_or(""),
        &admin,
    )
    .await
    {
        Ok(true) => Ok(success(true)),
        Ok(false) => Err(not_found("Order not found")),
        Err(e) => Err(op_error(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct StageIntentRequest {
    pub next: StageState,
    pub note: Option<String>,
    pub author: Option<String>,
}

pub async fn apply_stage<S: Store>(
    Path((order_id, station)): Path<(Id, Station)>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<StageIntentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let admin = req.author.unwrap_or_else(default_author);
    match AdminActions::apply_stage(
        &*state.store,
        &*state.notifier,
        &order_id,
        station,
        req.next,
        req.note.as_deref().unwrap_or(""),
        &admin,
    )
    .await
    {
        Ok(true) => Ok(success(true)),
        Ok(false) => Err(not_found("Order not found")),
        Err(e) => Err(op_error(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoadingDateRequest {
    pub date: String,
    pub author: Option<String>,
}

pub async fn set_loading_date<S: Store>(
    Path(order_id): Path<Id>,
    State(state): State<AppState<S>>,
    RequestJson(req): RequestJson<LoadingDateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let admin = req.author.unwrap_or_else(default_author);
    match AdminActions::set_loading_date(&*state.store, &order_id, &req.date, &admin).await {
        Ok(assigned) => Ok(success(assigned)),
        Err(e) => Err(internal_error(e)),
    }
}

// ---- Notifications ----

pub async fn recent_notifications<S: Store>(
    State(state): State<AppState<S>>,
) -> Json<Vec<StationEvent>> {
    Json(state.notifier.recent())
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{RentalId, RentalRequest};
use super::notifier::OverdueNotifier;
use super::repository::{NotificationSender, RentalRepository};
use super::screening::CreditCheck;
use super::service::{RentalError, RentalWorkflow};

/// Shared state behind the rental endpoints.
pub struct RentalDesk<R, C, N> {
    pub workflow: RentalWorkflow<R, C>,
    pub notifier: OverdueNotifier<R, N>,
}

/// Body accepted by the extension endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionRequest {
    pub additional_days: u32,
}

/// Router builder exposing HTTP endpoints for rentals and the overdue batch.
pub fn rental_router<R, C, N>(desk: Arc<RentalDesk<R, C, N>>) -> Router
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route("/api/v1/rentals", post(rent_handler::<R, C, N>))
        .route("/api/v1/rentals/:rental_id", get(rental_handler::<R, C, N>))
        .route(
            "/api/v1/rentals/:rental_id/extension",
            post(extend_handler::<R, C, N>),
        )
        .route(
            "/api/v1/rentals/:rental_id/return",
            post(return_handler::<R, C, N>),
        )
        .route(
            "/api/v1/rentals/overdue-notices",
            post(overdue_notices_handler::<R, C, N>),
        )
        .with_state(desk)
}

pub(crate) async fn rent_handler<R, C, N>(
    State(desk): State<Arc<RentalDesk<R, C, N>>>,
    axum::Json(request): axum::Json<RentalRequest>,
) -> Response
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
    N: NotificationSender + 'static,
{
    match desk.workflow.submit(request) {
        Ok(rental) => {
            let view = rental.view(desk.workflow.today());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rental_handler<R, C, N>(
    State(desk): State<Arc<RentalDesk<R, C, N>>>,
    Path(rental_id): Path<String>,
) -> Response
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
    N: NotificationSender + 'static,
{
    match desk.workflow.get(&RentalId(rental_id)) {
        Ok(rental) => {
            let view = rental.view(desk.workflow.today());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn extend_handler<R, C, N>(
    State(desk): State<Arc<RentalDesk<R, C, N>>>,
    Path(rental_id): Path<String>,
    axum::Json(request): axum::Json<ExtensionRequest>,
) -> Response
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
    N: NotificationSender + 'static,
{
    let extended = desk
        .workflow
        .get(&RentalId(rental_id))
        .and_then(|rental| desk.workflow.extend(&rental, request.additional_days));

    match extended {
        Ok(rental) => {
            let view = rental.view(desk.workflow.today());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn return_handler<R, C, N>(
    State(desk): State<Arc<RentalDesk<R, C, N>>>,
    Path(rental_id): Path<String>,
) -> Response
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
    N: NotificationSender + 'static,
{
    match desk.workflow.return_rental(&RentalId(rental_id)) {
        Ok(rental) => {
            let view = rental.view(desk.workflow.today());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn overdue_notices_handler<R, C, N>(
    State(desk): State<Arc<RentalDesk<R, C, N>>>,
) -> Response
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
    N: NotificationSender + 'static,
{
    match desk.notifier.notify_overdue() {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: RentalError) -> Response {
    let status = match &err {
        RentalError::MissingCustomer
        | RentalError::MissingItems
        | RentalError::OutOfStock { .. }
        | RentalError::CustomerBlacklisted
        | RentalError::InvalidExtension { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RentalError::CreditServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RentalError::RentalNotFound(_) => StatusCode::NOT_FOUND,
        RentalError::AlreadyReturned(_) => StatusCode::CONFLICT,
        RentalError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
        "reason": err.reason_code(),
        "retryable": err.is_retryable(),
    });
    (status, axum::Json(payload)).into_response()
}

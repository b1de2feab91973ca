use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::allocation::{ScheduleDay, ValidationReport};
use crate::model::{Order, OrderForm};

use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer}/cart/validation", get(validation))
        .route("/customers/{customer}/cart/schedule", get(schedule))
        .route("/customers/{customer}/cart/checkout", post(checkout))
}

async fn validation(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<ValidationReport>, ApiError> {
    ok_json(svc.validate(&customer))
}

async fn schedule(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<Vec<ScheduleDay>>, ApiError> {
    ok_json(svc.schedule(&customer))
}

async fn checkout(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
    Json(form): Json<OrderForm>,
) -> Result<Json<Order>, ApiError> {
    ok_json(svc.checkout(&customer, form))
}

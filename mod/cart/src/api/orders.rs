use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use supply_core::{ListParams, ListResult};

use crate::model::Order;

use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer}/orders", get(list_orders))
        .route("/customers/{customer}/orders/{order_id}", get(get_order))
        .route(
            "/customers/{customer}/orders/{order_id}/cancel",
            post(cancel_order),
        )
}

async fn list_orders(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Order>>, ApiError> {
    ok_json(svc.list_orders(&customer, &params))
}

async fn get_order(
    State(svc): State<AppState>,
    Path((customer, order_id)): Path<(String, String)>,
) -> Result<Json<Order>, ApiError> {
    ok_json(svc.get_order(&customer, &order_id))
}

async fn cancel_order(
    State(svc): State<AppState>,
    Path((customer, order_id)): Path<(String, String)>,
) -> Result<Json<Order>, ApiError> {
    ok_json(svc.cancel_order(&customer, &order_id))
}

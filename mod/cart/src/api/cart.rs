use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};

use crate::allocation::AllocationStatus;
use crate::model::{CartItem, DeliverySlot, SlotPatch};
use crate::service::AddItemInput;

use super::{ApiError, AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers/{customer}/cart",
            get(get_cart).delete(clear_cart),
        )
        .route("/customers/{customer}/cart/items", post(add_item))
        .route(
            "/customers/{customer}/cart/items/{product_id}",
            patch(update_item).delete(remove_item),
        )
        .route(
            "/customers/{customer}/cart/items/{product_id}/slots",
            post(add_slot),
        )
        .route(
            "/customers/{customer}/cart/items/{product_id}/slots/{slot_id}",
            patch(patch_slot).delete(remove_slot),
        )
}

/// A cart item plus its derived allocation status, as the wizard renders it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemView {
    #[serde(flatten)]
    item: CartItem,
    allocation: AllocationStatus,
}

fn project(item: CartItem) -> ItemView {
    let allocation = item.allocation_status();
    ItemView { item, allocation }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody {
    product_id: String,
    product_name: String,
    product_image_url: Option<String>,
    product_type: Option<String>,
    unit: String,
    quantity: f64,
    note: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemBody {
    quantity: Option<f64>,
    note: Option<String>,
}

async fn get_cart(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    ok_json(
        svc.get_cart(&customer)
            .map(|items| items.into_iter().map(project).collect()),
    )
}

async fn add_item(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
    Json(body): Json<AddItemBody>,
) -> Result<Json<ItemView>, ApiError> {
    ok_json(
        svc.add_item(
            &customer,
            AddItemInput {
                product_id: body.product_id,
                product_name: body.product_name,
                product_image_url: body.product_image_url,
                product_type: body.product_type,
                unit: body.unit,
                quantity: body.quantity,
                note: body.note,
            },
        )
        .map(project),
    )
}

/// PATCH response: either the updated item, or confirmation that a
/// quantity of 0 removed the line.
#[derive(Serialize)]
#[serde(untagged)]
enum UpdateItemResponse {
    Removed { removed: bool },
    Item(ItemView),
}

async fn update_item(
    State(svc): State<AppState>,
    Path((customer, product_id)): Path<(String, String)>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<UpdateItemResponse>, ApiError> {
    if let Some(quantity) = body.quantity {
        let Some(item) = svc
            .set_quantity(&customer, &product_id, quantity)
            .map_err(ApiError::from)?
        else {
            return Ok(Json(UpdateItemResponse::Removed { removed: true }));
        };
        if body.note.is_none() {
            return Ok(Json(UpdateItemResponse::Item(project(item))));
        }
    }

    let item = svc
        .update_note(&customer, &product_id, body.note)
        .map_err(ApiError::from)?;
    Ok(Json(UpdateItemResponse::Item(project(item))))
}

async fn remove_item(
    State(svc): State<AppState>,
    Path((customer, product_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    svc.remove_item(&customer, &product_id)
        .map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn clear_cart(
    State(svc): State<AppState>,
    Path(customer): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    svc.clear_cart(&customer).map_err(ApiError::from)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

async fn add_slot(
    State(svc): State<AppState>,
    Path((customer, product_id)): Path<(String, String)>,
) -> Result<Json<DeliverySlot>, ApiError> {
    ok_json(svc.add_slot(&customer, &product_id))
}

async fn patch_slot(
    State(svc): State<AppState>,
    Path((customer, product_id, slot_id)): Path<(String, String, String)>,
    Json(patch): Json<SlotPatch>,
) -> Result<Json<ItemView>, ApiError> {
    ok_json(
        svc.patch_slot(&customer, &product_id, &slot_id, &patch)
            .map(project),
    )
}

async fn remove_slot(
    State(svc): State<AppState>,
    Path((customer, product_id, slot_id)): Path<(String, String, String)>,
) -> Result<Json<ItemView>, ApiError> {
    ok_json(
        svc.remove_slot(&customer, &product_id, &slot_id)
            .map(project),
    )
}

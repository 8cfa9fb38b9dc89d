#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use stock_ledger::fields::{Field, parse_planned_field};
use stock_ledger::ledger::{WeekLedger, recompute};
use stock_ledger::models::FieldUpdateRequest;
use stock_ledger::plan::{PlanRow, recompute_plan};
use tokio::sync::Mutex;

pub const FLOUR: i64 = 1;
pub const SUGAR: i64 = 2;
pub const LEDGER_ROW: i64 = 10;
pub const PLAN_ROW: i64 = 20;
/// Row id the server acknowledges without returning updated values.
pub const SILENT_ROW: i64 = 30;

#[derive(Default)]
pub struct Collaborator {
    pub ledgers: BTreeMap<i64, WeekLedger>,
    pub plans: BTreeMap<i64, PlanRow>,
    pub updates: Vec<FieldUpdateRequest>,
}

pub type Shared = Arc<Mutex<Collaborator>>;

pub struct MockServer {
    pub base_url: String,
    pub state: Shared,
}

/// Starts an inventory server stand-in on a random local port for the
/// lifetime of the calling runtime.
pub async fn spawn_collaborator() -> MockServer {
    let mut collaborator = Collaborator::default();
    collaborator
        .ledgers
        .insert(LEDGER_ROW, recompute(WeekLedger::new(100.0, 2.0)));
    collaborator
        .plans
        .insert(PLAN_ROW, recompute_plan(PlanRow::new(80.0)));
    let state: Shared = Arc::new(Mutex::new(collaborator));

    let app = Router::new()
        .route("/inventory/api/item/:id", get(item))
        .route("/inventory/api/stocktake/:id", get(stocktake))
        .route("/inventory/api/raw_material/:id", get(raw_material))
        .route("/inventory/update_field", post(update_field))
        .route("/update_daily_plan", post(update_daily_plan))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind collaborator");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("collaborator server");
    });

    MockServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

async fn item(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    match id {
        FLOUR => Ok(Json(json!({
            "price_per_kg": 2.5,
            "supplier_name": "Northern Mills",
            "category": "Flour"
        }))),
        SUGAR => Ok(Json(json!({ "price_per_kg": null, "category": "Sugar" }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn stocktake(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    match id {
        FLOUR => Ok(Json(json!({ "current_stock": 100.0 }))),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn raw_material(Path(id): Path<i64>) -> Json<Value> {
    match id {
        FLOUR => Json(json!({ "total_usage": 140.0 })),
        _ => Json(json!({})),
    }
}

async fn update_field(
    State(state): State<Shared>,
    Json(request): Json<FieldUpdateRequest>,
) -> Json<Value> {
    let mut state = state.lock().await;
    state.updates.push(request.clone());
    if request.id == SILENT_ROW {
        return Json(json!({ "success": true }));
    }

    let field = match request.field.parse::<Field>() {
        Ok(field @ Field::Day(day, kind)) if kind.is_raw() => (field, day),
        _ => return Json(json!({ "success": false, "error": "Invalid field" })),
    };
    let Some(ledger) = state.ledgers.get_mut(&request.id) else {
        return Json(json!({ "success": false, "error": "Inventory not found" }));
    };

    let (field, day) = field;
    field.set(ledger, request.value);
    *ledger = recompute(*ledger);
    let record = ledger.day(day);

    Json(json!({
        "success": true,
        "data": {
            "opening_stock": record.opening_stock,
            "variance": record.variance,
            "closing_stock": record.closing_stock,
            "required_for_plan": ledger.required_for_plan,
            "variance_for_week": ledger.variance_for_week,
            "value_required": ledger.value_required
        }
    }))
}

async fn update_daily_plan(
    State(state): State<Shared>,
    Json(request): Json<FieldUpdateRequest>,
) -> Json<Value> {
    let mut state = state.lock().await;
    state.updates.push(request.clone());
    if request.id == SILENT_ROW {
        return Json(json!({ "success": true, "variance": 0.0 }));
    }

    let Ok(day) = parse_planned_field(&request.field) else {
        return Json(json!({ "success": false, "error": "Invalid field" }));
    };
    let Some(row) = state.plans.get_mut(&request.id) else {
        return Json(json!({ "success": false, "error": "Production not found" }));
    };

    row.set_planned(day, request.value);
    *row = recompute_plan(*row);
    Json(json!({
        "success": true,
        "total_planned": row.total_planned,
        "variance": row.variance
    }))
}

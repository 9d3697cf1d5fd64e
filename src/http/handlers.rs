use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::db;
use crate::error::{Error, Result};
use crate::http::dto::{
    CreateDeliveryReq, CreateDeliveryResp, CreateUniformReturnReq, CreateWorkerReq, LedgerResp,
    LoginReq, LoginResp, ReportQuery, ReturnResp, ShipmentReq, ShipmentResp, StatsQuery,
    WorkerResp,
};
use crate::http::AppState;
use crate::{auth, ledger};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Db(_) | Error::Payload(_) | Error::Other(_) => {
                error!(err = %self, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "error interno del servidor".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[instrument(skip_all)]
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<LoginResp>> {
    let token = auth::login(&state.pool, state.credentials.as_ref(), &req.username, &req.password)
        .await?;
    Ok(Json(LoginResp { token }))
}

#[instrument(skip_all)]
pub async fn create_worker(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateWorkerReq>,
) -> Result<(StatusCode, Json<WorkerResp>)> {
    if req.dni.trim().is_empty() {
        return Err(Error::validation("el DNI no puede estar vacío"));
    }
    if req.name.trim().is_empty() || req.surname.trim().is_empty() {
        return Err(Error::validation("nombre y apellido son obligatorios"));
    }
    let worker = db::create_worker(
        &state.pool,
        req.dni.trim(),
        req.name.trim(),
        req.surname.trim(),
        req.contract_type,
    )
    .await?;
    info!(dni = %worker.dni, "worker registered");
    Ok((StatusCode::CREATED, Json(WorkerResp::from_worker(worker))))
}

#[instrument(skip_all)]
pub async fn get_worker(
    Extension(state): Extension<Arc<AppState>>,
    Path(dni): Path<String>,
) -> Result<Json<WorkerResp>> {
    let worker = db::get_worker(&state.pool, &dni).await?;
    Ok(Json(WorkerResp::from_worker(worker)))
}

#[instrument(skip_all)]
pub async fn create_delivery(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateDeliveryReq>,
) -> Result<(StatusCode, Json<CreateDeliveryResp>)> {
    let worker = db::get_worker(&state.pool, &req.dni).await?;
    let items = ledger::sanitize_items(req.items);
    if items.is_empty() {
        return Err(Error::validation("la entrega no contiene artículos válidos"));
    }

    let delivery_id = db::insert_delivery(&state.pool, &worker.dni, &items, req.date).await?;
    let acta_path = state
        .acta
        .render(delivery_id, &worker, &items, req.date)
        .await?;
    db::set_delivery_acta(&state.pool, delivery_id, &acta_path.to_string_lossy()).await?;

    info!(delivery_id, dni = %worker.dni, "delivery recorded");
    Ok((
        StatusCode::CREATED,
        Json(CreateDeliveryResp {
            delivery_id,
            acta_url: format!("/api/deliveries/{delivery_id}/acta"),
        }),
    ))
}

#[instrument(skip_all)]
pub async fn get_delivery_acta(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let delivery = db::get_delivery(&state.pool, id).await?;
    let Some(path) = delivery.acta_path else {
        return Err(Error::not_found(format!("acta no encontrada: {id}")));
    };
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| Error::not_found(format!("acta no encontrada: {id}")))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        bytes,
    )
        .into_response())
}

#[instrument(skip_all)]
pub async fn register_shipment(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<ShipmentReq>,
) -> Result<(StatusCode, Json<ShipmentResp>)> {
    let key = req.key.trim().to_string();
    let id = db::register_shipment(&state.pool, &key, req.items).await?;
    info!(%key, id, "laundry send registered");
    Ok((StatusCode::CREATED, Json(ShipmentResp { id, key })))
}

#[instrument(skip_all)]
pub async fn laundry_status(
    Extension(state): Extension<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<LedgerResp>> {
    let entries = db::laundry_status(&state.pool, &key).await?;
    let status = ledger::status(&entries);
    Ok(Json(LedgerResp { entries, status }))
}

#[instrument(skip_all)]
pub async fn register_return(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<ShipmentReq>,
) -> Result<Json<ReturnResp>> {
    let accepted = db::register_return(&state.pool, req.key.trim(), req.items).await?;
    let entries = db::laundry_status(&state.pool, req.key.trim()).await?;
    let status = ledger::status(&entries);
    info!(key = %req.key, ?status, "laundry return registered");
    Ok(Json(ReturnResp { accepted, status }))
}

#[instrument(skip_all)]
pub async fn laundry_report(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Vec<crate::model::LaundryReportRow>>> {
    let rows = db::laundry_report(&state.pool, q.shipment_key(), q.month, q.year).await?;
    Ok(Json(rows))
}

#[instrument(skip_all)]
pub async fn delivery_report(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Vec<crate::model::DeliveryReportRow>>> {
    let rows = db::delivery_report(&state.pool, q.dni.as_deref(), q.month, q.year).await?;
    Ok(Json(rows))
}

#[instrument(skip_all)]
pub async fn uniform_return_report(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Vec<crate::model::UniformReturnReportRow>>> {
    let rows = db::uniform_return_report(&state.pool, q.dni.as_deref(), q.month, q.year).await?;
    Ok(Json(rows))
}

#[instrument(skip_all)]
pub async fn create_uniform_return(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateUniformReturnReq>,
) -> Result<(StatusCode, Json<crate::model::UniformReturnRecord>)> {
    let record =
        db::insert_uniform_return(&state.pool, req.dni.trim(), req.items, &req.observations)
            .await?;
    info!(dni = %record.dni, id = record.id, "uniform return recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip_all)]
pub async fn stats(
    Extension(state): Extension<Arc<AppState>>,
    Query(q): Query<StatsQuery>,
) -> Result<Json<crate::model::Stats>> {
    let stats = db::stats(&state.pool, q.month, q.year).await?;
    Ok(Json(stats))
}

//! Table CRUD handlers: read_table, add_record, update_record, delete_record.
//!
//! Bodies are JSON objects. Every field is optional at the serde layer so that a
//! missing field is reported as a validation error rather than a rejection.

use crate::error::AppError;
use crate::response;
use crate::service::{CrudService, RequestValidator, TableTarget};
use crate::sql::RecordPayload;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ReadTableRequest {
    pub table_name: Option<String>,
    pub schema_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddRecordRequest {
    pub table_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_data: Option<RecordPayload>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub table_name: Option<String>,
    pub schema_name: Option<String>,
    pub pk: Option<Value>,
    pub update_data: Option<RecordPayload>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRecordRequest {
    pub table_name: Option<String>,
    pub schema_name: Option<String>,
    pub pk: Option<Value>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::Validation(e.body_text()))
}

fn target<'a>(
    table_name: &'a Option<String>,
    schema_name: &'a Option<String>,
) -> Result<TableTarget<'a>, AppError> {
    let table_name = RequestValidator::table_name(table_name.as_deref())?;
    Ok(TableTarget::new(
        table_name,
        RequestValidator::schema_name(schema_name.as_deref()),
    ))
}

pub async fn read_table(
    State(state): State<AppState>,
    payload: Result<Json<ReadTableRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = body(payload)?;
    let target = target(&req.table_name, &req.schema_name)?;
    let rows = CrudService::read_table(state.backend.as_ref(), state.resolution, target).await?;
    Ok(response::rows(rows))
}

pub async fn add_record(
    State(state): State<AppState>,
    payload: Result<Json<AddRecordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = body(payload)?;
    let target = target(&req.table_name, &req.schema_name)?;
    let data = RequestValidator::payload("table_data", req.table_data.as_ref())?;
    CrudService::add_record(state.backend.as_ref(), state.resolution, target, data).await?;
    Ok(response::message("Record added successfully"))
}

pub async fn update_record(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRecordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = body(payload)?;
    let target = target(&req.table_name, &req.schema_name)?;
    let pk = RequestValidator::primary_key(req.pk.as_ref())?;
    let data = RequestValidator::payload("update_data", req.update_data.as_ref())?;
    CrudService::update_record(state.backend.as_ref(), state.resolution, target, pk, data).await?;
    Ok(response::message("Record updated successfully"))
}

pub async fn delete_record(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRecordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = body(payload)?;
    let target = target(&req.table_name, &req.schema_name)?;
    let pk = RequestValidator::primary_key(req.pk.as_ref())?;
    CrudService::delete_record(state.backend.as_ref(), state.resolution, target, pk).await?;
    Ok(response::message("Record deleted successfully"))
}

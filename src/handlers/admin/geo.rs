// handlers/admin/geo.rs - the block / tehsil / gram panchayat / gaon hierarchy
//
// Creating a tehsil, gram panchayat or gaon also registers the field users
// that own it. Deletes archive.

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{json, Value};

use super::CatalogueQuery;
use crate::database::models::{BlockRow, GaonRow, GramPanchayatRow, TehsilRow, TehsilWithSdmRow};
use crate::database::repository::geo::GeoLevel;
use crate::filter::{ListQueryParams, Page};
use crate::handlers::{ValidJson, ValidQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::onboarding_service::{Created, NewGramPanchayat, OnboardingService, Person};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TehsilRequest {
    /// SDM name.
    pub name: String,
    pub phone_no: String,
    pub tehsil: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GramPanchayatRequest {
    pub gram_panchayat: String,
    /// Sachiv name.
    pub name: String,
    pub phone_no: String,
    #[serde(rename = "tehsilID")]
    pub tehsil_id: i64,
    pub sahayak_name: String,
    pub sahayak_phone_no: String,
    #[serde(default)]
    pub block_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditGramPanchayatRequest {
    pub id: i64,
    pub gram_panchayat: String,
    #[serde(rename = "tehsilID")]
    pub tehsil_id: i64,
    #[serde(default)]
    pub block_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaonRequest {
    pub gaon: String,
    pub gram_panchayat_id: i64,
    /// Lekhpal name.
    pub name: String,
    pub phone_no: String,
}

fn service(state: &AppState) -> OnboardingService {
    OnboardingService::new(state.db.clone())
}

async fn rename(state: &AppState, level: GeoLevel, request: RenameRequest) -> ApiResult<Value> {
    service(state).rename(level, request.id, &request.name).await?;
    Ok(ApiResponse::success(json!({ "id": request.id })))
}

async fn archive(state: &AppState, level: GeoLevel, id: i64) -> ApiResult<Value> {
    service(state).archive(level, id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "archived": true })))
}

// Blocks

/// GET /gram-panchayat/user/admin/block
pub async fn list_blocks(State(state): State<AppState>) -> ApiResult<Vec<BlockRow>> {
    Ok(ApiResponse::success(service(&state).blocks().await?))
}

/// POST /gram-panchayat/user/admin/block - `{ "name": "Sadar" }`
pub async fn create_block(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<NameRequest>,
) -> ApiResult<Value> {
    let id = service(&state).create_block(&request.name).await?;
    Ok(ApiResponse::created(json!({ "id": id })))
}

/// PUT /gram-panchayat/user/admin/block - `{ "id": 3, "name": "Sadar" }`
pub async fn rename_block(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RenameRequest>,
) -> ApiResult<Value> {
    rename(&state, GeoLevel::Block, request).await
}

/// DELETE /gram-panchayat/user/admin/block/{id}
pub async fn archive_block(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    archive(&state, GeoLevel::Block, id).await
}

// Tehsils

/// GET /gram-panchayat/user/admin/tehsils - tehsils with their SDM
pub async fn list_tehsils(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListQueryParams>,
) -> ApiResult<Page<TehsilWithSdmRow>> {
    let filter = params.into_filter(&state.config.api)?;
    Ok(ApiResponse::success(service(&state).tehsils(&filter).await?))
}

/// GET /gram-panchayat/user/admin/all-tehsil
pub async fn list_all_tehsils(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListQueryParams>,
) -> ApiResult<Page<TehsilRow>> {
    let filter = params.into_filter(&state.config.api)?;
    Ok(ApiResponse::success(service(&state).all_tehsils(&filter).await?))
}

/**
 * POST /gram-panchayat/user/admin/tehsil
 *
 * Input:  `{ "tehsil": "Sadar", "name": "R. K. Verma", "phoneNo": "9000000001" }`
 * Output: `{ "success": true, "data": { "id": 2, "userIds": [14] } }`
 *
 * The SDM is created unless the phone already belongs to an SDM.
 */
pub async fn create_tehsil(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<TehsilRequest>,
) -> ApiResult<Created> {
    let sdm = Person {
        name: request.name,
        phone_no: request.phone_no,
    };
    let created = service(&state).create_tehsil(&request.tehsil, &sdm).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /gram-panchayat/user/admin/edit-tehsil - `{ "id": 2, "name": "Sadar" }`
pub async fn rename_tehsil(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RenameRequest>,
) -> ApiResult<Value> {
    rename(&state, GeoLevel::Tehsil, request).await
}

/// DELETE /gram-panchayat/user/admin/tehsil/{id}
pub async fn archive_tehsil(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    archive(&state, GeoLevel::Tehsil, id).await
}

// Gram panchayats

/// GET /gram-panchayat/user/admin/gram-panchayat-information
pub async fn list_gram_panchayats(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<CatalogueQuery>,
) -> ApiResult<Page<GramPanchayatRow>> {
    let filter = params.list_filter(&state.config.api)?;
    let tehsil_ids = params.tehsil_ids()?;
    let page = service(&state).gram_panchayats(&filter, &tehsil_ids).await?;
    Ok(ApiResponse::success(page))
}

/**
 * POST /gram-panchayat/user/admin/gram-panchayat-information
 *
 * Input:
 * ```json
 * {
 *   "gramPanchayat": "Rampur", "tehsilID": 2, "blockId": 3,
 *   "name": "Sachiv name", "phoneNo": "9000000002",
 *   "sahayakName": "Sahayak name", "sahayakPhoneNo": "9000000003"
 * }
 * ```
 * Output: `{ "success": true, "data": { "id": 4, "userIds": [15, 16] } }`
 */
pub async fn create_gram_panchayat(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<GramPanchayatRequest>,
) -> ApiResult<Created> {
    let new = NewGramPanchayat {
        name: request.gram_panchayat,
        tehsil_id: request.tehsil_id,
        block_id: request.block_id,
        sachiv: Person {
            name: request.name,
            phone_no: request.phone_no,
        },
        sahayak: Person {
            name: request.sahayak_name,
            phone_no: request.sahayak_phone_no,
        },
    };
    let created = service(&state).create_gram_panchayat(&new).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /gram-panchayat/user/admin/edit-gram-panchayat
pub async fn edit_gram_panchayat(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<EditGramPanchayatRequest>,
) -> ApiResult<Value> {
    service(&state)
        .edit_gram_panchayat(request.id, &request.gram_panchayat, request.tehsil_id, request.block_id)
        .await?;
    Ok(ApiResponse::success(json!({ "id": request.id })))
}

/// DELETE /gram-panchayat/user/admin/gram-panchayat/{id}
pub async fn archive_gram_panchayat(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    archive(&state, GeoLevel::GramPanchayat, id).await
}

// Gaons

/// GET /gram-panchayat/user/admin/gaon
pub async fn list_gaons(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<CatalogueQuery>,
) -> ApiResult<Page<GaonRow>> {
    let filter = params.list_filter(&state.config.api)?;
    let gram_panchayat_ids = params.gram_panchayat_ids()?;
    let page = service(&state).gaons(&filter, &gram_panchayat_ids).await?;
    Ok(ApiResponse::success(page))
}

/// POST /gram-panchayat/user/admin/gaon - `{ "gaon": "Khera", "gramPanchayatId": 4, "name": "..", "phoneNo": ".." }`
pub async fn create_gaon(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<GaonRequest>,
) -> ApiResult<Created> {
    let lekhpal = Person {
        name: request.name,
        phone_no: request.phone_no,
    };
    let created = service(&state)
        .create_gaon(&request.gaon, request.gram_panchayat_id, &lekhpal)
        .await?;
    Ok(ApiResponse::created(created))
}

/// PUT /gram-panchayat/user/admin/gaon - `{ "id": 11, "name": "Khera" }`
pub async fn rename_gaon(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RenameRequest>,
) -> ApiResult<Value> {
    rename(&state, GeoLevel::Gaon, request).await
}

/// DELETE /gram-panchayat/user/admin/gaon/{id}
pub async fn archive_gaon(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    archive(&state, GeoLevel::Gaon, id).await
}

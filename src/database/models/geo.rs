use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlockRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TehsilRow {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub total_count: i64,
}

/// Tehsil together with the SDM assigned to it, if any.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TehsilWithSdmRow {
    pub id: i64,
    pub name: String,
    pub user_id: Option<i64>,
    pub sdm_name: Option<String>,
    pub phone_no: Option<String>,
    #[serde(skip)]
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GramPanchayatRow {
    pub id: i64,
    pub name: String,
    pub tehsil_id: i64,
    pub tehsil_name: String,
    pub block_id: Option<i64>,
    pub block_name: Option<String>,
    pub sachiv_name: Option<String>,
    pub sachiv_phone_no: Option<String>,
    pub sahayak_name: Option<String>,
    pub sahayak_phone_no: Option<String>,
    #[serde(skip)]
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GaonRow {
    pub id: i64,
    pub name: String,
    pub gram_panchayat_id: i64,
    pub gram_panchayat_name: String,
    pub lekhpal_name: Option<String>,
    pub lekhpal_phone_no: Option<String>,
    #[serde(skip)]
    pub total_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaonRef {
    pub id: i64,
    pub name: String,
}

/// Gram panchayat inside a user's scope, with its villages.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScopedGramPanchayatRow {
    pub id: i64,
    pub name: String,
    pub tehsil_id: i64,
    pub gaons: Json<Vec<GaonRef>>,
}

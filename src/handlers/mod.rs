// handlers/mod.rs - three access tiers
//
// public    no token                      /health, /gram-panchayat/send-otp, /verify-otp
// protected token + live session          /gram-panchayat/user/*
// admin     protected + Admin role        /gram-panchayat/user/admin/*

pub mod admin;
pub mod protected;
pub mod public;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::viewer::Viewer;
use crate::state::AppState;

/// JSON body whose rejection is reported in the API error envelope.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string whose rejection is reported in the API error envelope.
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Loads scope and task grants for the authenticated caller.
#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        Ok(Viewer::load(&state.db, user).await?)
    }
}

/// Local calendar date, the unit dashboards and validation work in.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

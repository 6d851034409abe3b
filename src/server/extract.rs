//! Extractors whose rejections are reported as [`PlannerError`], so malformed
//! bodies, paths and query strings get the same `{"error": ...}` body as
//! every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::PlannerError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PlannerError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PlannerError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(PlannerError))]
pub struct ApiQuery<T>(pub T);

//! Request extractors whose rejections render as the standard envelope.
//!
//! axum's own `Json`, `Query` and `Path` reject with plain-text bodies and
//! statuses such as 415 or 422. These wrappers route every rejection through
//! [`AppError`] so a malformed request is always a 400 with the reason in
//! `errors`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

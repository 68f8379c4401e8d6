//! `Query` and `Path` extractors whose rejections render as [`AppError`].

use axum::extract::FromRequestParts;

use crate::errors::AppError;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

//! HTTP handlers for the meteorological observation service

use axum::extract::FromRequest;

use crate::error::AppError;

pub mod health;
pub mod measurement;
pub mod observation;
pub mod vegetation;
pub mod zone;

pub use health::*;
pub use measurement::*;
pub use observation::*;
pub use vegetation::*;
pub use zone::*;

/// JSON request body whose rejections are reported as [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

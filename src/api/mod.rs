//! Forecast API Server module
//!
//! HTTP upload/download front end over the forecast pipeline.
//! Run with `forecast-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server};

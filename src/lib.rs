//! Vehicle Validator
//!
//! HTTP service that forwards a vehicle photo and a licence plate photo to an
//! Azure OpenAI vision deployment and relays the model's JSON verdict.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

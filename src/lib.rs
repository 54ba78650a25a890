#![doc = "The `taskpilot` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication, persistence, the AI suggestion client, routing"]
#![doc = "configuration and error handling for the Taskpilot API. The binary (`main.rs`)"]
#![doc = "wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod suggestions;

pub use crate::error::AppError;

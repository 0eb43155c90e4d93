//! Bilingual job marketplace API.
//!
//! The tag-overlap ranking engine in [`matching`] is pure and can be used on
//! its own; everything else serves the HTTP API started by the binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod profiles;
pub mod routes;
pub mod state;

//! Chirpy: a small social-post service.
//!
//! The substance is the record store ([`store`]), the session authority and
//! access gate built on it ([`auth`]), and the password vault ([`vault`]).
//! [`routes`] wires them to HTTP.

pub mod auth;
pub mod config;
pub mod dto;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod profanity;
pub mod routes;
pub mod states;
pub mod store;
pub mod vault;

pub use states::AppState;

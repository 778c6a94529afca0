//! Core library exports for the catalog service.
//!
//! The `data` feature exposes the domain types, Diesel models, schema and
//! repositories. The default `server` feature adds forms, services, image
//! storage, the cache-aside read path and the response envelope.

pub mod db;
pub mod domain;
mod error_conversions;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod cache;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod images;
#[cfg(feature = "server")]
pub mod services;

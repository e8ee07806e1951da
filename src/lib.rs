//! Pantry: Generation and Review Backend
//!
//! A small service that proxies image and recipe generation to an external
//! provider, uploads the resulting artifacts to object storage, and keeps
//! food reviews and generated metadata in an embedded key-value store.

pub mod artifact;
pub mod cache;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod http;
pub mod ledger;
pub mod logging;
pub mod provider;
pub mod store;
pub mod types;

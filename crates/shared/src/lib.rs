//! Shared configuration types for Arca.
//!
//! This crate provides the configuration surface consumed by the storage
//! backend:
//! - Object store connection parameters
//! - Per-storage options (bucket, key prefix, URL expiry)
//! - Layered file/environment loading

pub mod config;

pub use config::{ConnectionConfig, StorageOptions, StorageSettings};

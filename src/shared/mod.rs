//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client-side library and the RPC server. They describe spaces as they
//! are stored remotely and travel over the RPC API.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP.

/// Space record, color palette and metadata patches
pub mod space;

/// Opaque canvas snapshot helpers
pub mod snapshot;

/// RPC request/response shapes
pub mod rpc;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, BaasSettings, CollectionRef, ConfigError, Environment};
pub use error::SharedError;
pub use space::{MetadataPatch, SpaceColor, SpaceEntry, SpaceRecord};

//! RPC Module
//!
//! Procedure table and dispatch. HTTP concerns (paths, envelopes, input
//! parsing) live in `routes::rpc_routes`; this module only knows procedures,
//! callers and JSON values.

pub mod procedures;

pub use procedures::{dispatch, Procedure, ProcedureKind};

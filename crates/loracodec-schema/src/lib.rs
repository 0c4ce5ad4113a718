//! JSON Schema contracts for downlink records.
//!
//! Validate the JSON form of a settings, spectrum scan or command record
//! against JSON Schema 2020-12 before it is packed into bytes. A record
//! missing one of its nested objects is rejected here with a readable
//! message instead of surfacing later as an encoder error.
//!
//! Schemas are keyed by LoRaWAN port. [`SchemaRegistry::builtin`] carries the
//! contracts for ports 3, 30 and 99; deployments can load their own from a
//! directory.

pub mod config;
pub mod error;
pub mod registry;
pub mod validator;

pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use registry::{SchemaRegistry, BUILTIN_SCHEMAS};

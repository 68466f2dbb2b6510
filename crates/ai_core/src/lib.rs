//! AI Core - Generation engines and engine selection
//!
//! Defines the [`Engine`] port and its two adapters: a deterministic
//! [`MockEngine`] and an [`OllamaEngine`] talking to an Ollama-compatible
//! `/api/generate` endpoint. [`EngineSelector`] maps provider ids to engines.

pub mod config;
pub mod error;
pub mod mock;
pub mod ollama;
pub mod ports;
pub mod selector;

pub use config::RemoteEngineConfig;
pub use error::EngineError;
pub use mock::MockEngine;
pub use ollama::OllamaEngine;
pub use ports::{ChunkStream, Engine, GenerationRequest};
pub use selector::EngineSelector;

//! Ollama-compatible generation engine
//!
//! Talks to the `/api/generate` endpoint of any Ollama-compatible server,
//! either as a single blocking call or as an NDJSON stream.

mod client;
mod streaming;

pub use client::{OLLAMA_ENGINE_NAME, OllamaEngine};

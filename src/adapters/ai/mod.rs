//! AI adapters - Extraction oracle implementations.
//!
//! `GeminiOracle` is the live implementation over Google's Gemini API;
//! `ScriptedOracle` is a configurable test double.

mod gemini_oracle;
mod scripted_oracle;

pub use gemini_oracle::{GeminiConfig, GeminiOracle};
pub use scripted_oracle::ScriptedOracle;

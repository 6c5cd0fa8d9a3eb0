//! Claim extraction via the Gemini generative API.
//!
//! This module provides the extraction client that turns free-form source
//! text into a validated sequence of typed claims.

pub mod client;
pub mod prompt;

pub use client::{ClaimExtractor, ExtractError, ExtractorConfig, GeminiTransport, ModelTransport};

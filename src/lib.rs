//! Palaver is the tool-integration core of a terminal-first chat client.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript message model, including the app-authored
//!   notice kinds the lifecycle layer uses to surface failures.
//! - [`mcp`] provides Model Context Protocol server integration: the
//!   embedded tool-call transcript protocol, result rendering, server
//!   configuration merging, the submission lifecycle, and the persisted
//!   tool catalog.
//! - [`utils`] holds small shared helpers (tolerant base64 decoding, URL
//!   joining for the HTTP endpoint adapter).
//!
//! There is no runtime entrypoint here: a hosting client wires the
//! [`mcp::endpoint`] traits to its own backend, drives
//! [`mcp::lifecycle::LifecycleController`] from its UI events, and renders
//! the items produced by [`mcp::render`].

pub mod core;
pub mod mcp;
pub mod utils;

//! nodexpd - minimal host-metrics exporter library.
//!
//! Reads a fixed set of `/proc` pseudo-files, converts their textual
//! contents into labeled metric samples and renders them in the plaintext
//! exposition format consumed by pull-based monitoring collectors.
//!
//! - `collector` — procfs parsers, per-source scrapers, scrape coordinator
//! - `exposition` — metric types and the streaming text emitter
//! - `server` — single-connection HTTP dispatcher for `/metrics`

pub mod collector;
pub mod exposition;
pub mod server;

//! Scrape pipeline for Linux kernel pseudo-files.
//!
//! This module converts `/proc` text into labeled metric samples, with
//! filesystem access abstracted for testing:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                       Exporter                        │
//! │   ordered scraper registry + cumulative ScrapeStats   │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐  │
//! │  │   cpu    │ │  memory  │ │ network  │ │   ...    │  │
//! │  └────┬─────┘ └────┬─────┘ └────┬─────┘ └────┬─────┘  │
//! │       └────────────┴─────┬──────┴────────────┘        │
//! │                   ┌──────▼──────┐                     │
//! │                   │  FileSystem │ (trait)             │
//! │                   └──────┬──────┘                     │
//! └──────────────────────────┼───────────────────────────-┘
//!                 ┌──────────┴──────────┐
//!          ┌──────▼──────┐       ┌──────▼──────┐
//!          │   RealFs    │       │   MockFs    │
//!          │  (Linux)    │       │  (testing)  │
//!          └─────────────┘       └─────────────┘
//! ```
//!
//! Scrapers degrade to zero samples when a source is absent; a malformed
//! record never aborts the remaining sources.

mod exporter;
pub mod mock;
pub mod procfs;
pub mod scrapers;
pub mod traits;
pub mod uname;

pub use exporter::{Exporter, ScrapeStats, ScraperKind};
pub use mock::MockFs;
pub use traits::{FileSystem, RealFs};
pub use uname::UnameInfo;

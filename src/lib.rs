//! # paperdash
//!
//! Research paper dashboard: fetch accepted papers from a JSON endpoint and
//! search, sort, paginate and export them.
//!
//! ## Modules
//!
//! - [`pipeline`] - filter -> sort -> paginate over the in-memory record set
//! - [`query`] - search/sort/page state and its reset rules
//! - [`debounce`] - cancellable timer and search-input debouncer
//! - [`pagination`] - windowed page controls
//! - [`source`] - HTTP and file record sources
//! - [`export`] - CSV and printable HTML export
//! - [`dashboard`] - top-level view state
//! - [`render`] - plain-text presentation
//! - [`config`] - configuration file and environment
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use paperdash::{config::Config, dashboard::Dashboard, source::PaperSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let source = PaperSource::new(&config)?;
//!     let mut dash = Dashboard::new(config.page_size);
//!     dash.load(&source).await?;
//!     dash.apply_query("oncology");
//!     println!("{} matching papers", dash.view().total_items);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod export;
pub mod pagination;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod render;
pub mod selection;
pub mod source;

pub use error::{PaperdashError, Result};

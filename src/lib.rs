//! # dudiff
//!
//! Web server rendering the disk-usage changes between two `du` snapshots.
//!
//! Snapshots live in `<directory>/<location>/du-YYYY-MM-DD.gz` (plain `du`
//! output, gzipped). `GET /<location>/<old>..<new>` renders an HTML report of
//! every path whose size changed; the rendered page loads the `dudiff-page`
//! WebAssembly module (`webui/`) for sorting and depth filtering.
//! `GET /<location>/<old>..<new>.txt` returns the same diff as plain text.
//!
//! ## Core Components
//!
//! - [`cli`]: command line overrides
//! - [`config`]: layered configuration (embedded defaults, files, environment)
//! - [`du`]: snapshot parsing, diffing and snapshot file discovery
//! - [`error`]: error type and HTTP error responses
//! - [`metrics`]: request and cache counters
//! - [`middleware`]: security and caching headers
//! - [`report`]: HTML rendering and size formatting
//! - [`routes`]: HTTP handlers and the router
//! - [`state`]: shared state and the parsed snapshot cache

pub mod cli;
pub mod config;
pub mod du;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod report;
pub mod routes;
pub mod state;

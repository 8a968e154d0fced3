//! # du-diff report page behaviour
//!
//! Client-side enhancement of the HTML report rendered by the `dudiff` server:
//!
//! - clicking the *Delta* or *Location* header sorts the rows by size delta or
//!   by path ([`behavior::sort_rows`] with [`keys::by_delta`] / [`keys::by_path`])
//! - the numbered depth buttons hide rows nested deeper than the selected
//!   level ([`behavior::limit_depth`])
//!
//! The behaviour is written against the [`dom::Document`] trait. In the browser
//! [`web::start`] binds it to the live DOM; tests use an in-memory document.

pub mod behavior;
pub mod dom;
pub mod error;
pub mod keys;
#[cfg(test)]
pub mod memory;
pub mod web;

pub use behavior::{initialize, ReportPage};
pub use error::PageError;

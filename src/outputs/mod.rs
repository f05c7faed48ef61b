//! Output generation for the published result document.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`ResultDocument`](crate::models::ResultDocument) to disk
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── papers.json   # overwritten on every successful run
//! ```

pub mod json;

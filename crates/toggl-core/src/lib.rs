//! Core domain logic for the Toggl CLI.
//!
//! This crate contains the fundamental types and logic for:
//! - Projects: display and listing order
//! - Project store: aliases, the default project and refresh merging
//! - Rounding: quarter-hour start and end times for time entries

pub mod project;
pub mod rounding;
pub mod store;

pub use project::{Project, compare_projects, sort_projects};
pub use rounding::EndRounding;
pub use store::{ProjectStore, StoreError};

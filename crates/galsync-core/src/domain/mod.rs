//! Domain entities and pure business logic
//!
//! - Newtypes for remote identifiers and the sync watermark
//! - Remote object metadata and mime-type classification
//! - Gallery naming rules (sanitized filenames, titles, dates)
//! - Front-matter document rendering
//! - Domain-specific error types

pub mod document;
pub mod errors;
pub mod naming;
pub mod newtypes;
pub mod remote_object;

pub use document::{render_document, render_listing, yaml_escape, Resource};
pub use errors::{DomainError, SetupError};
pub use naming::{gallery_date, gallery_title, is_safe_component, sanitize_file_name};
pub use newtypes::{RemoteId, Watermark};
pub use remote_object::{RemoteObject, FOLDER_MIME_TYPE, IMAGE_MIME_TYPES};

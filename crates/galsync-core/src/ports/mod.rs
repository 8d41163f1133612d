//! Port definitions (hexagonal architecture interfaces)
//!
//! - [`IRemoteStore`] - Listing and download capability of an authenticated
//!   remote session
//! - [`IStateStore`] - Persistence for the watermark and the optional
//!   gallery folder snapshot

pub mod remote_store;
pub mod state_store;

pub use remote_store::{IRemoteStore, KindFilter, ListQuery};
pub use state_store::{FolderSnapshot, IStateStore};

//! galsync Core - Domain logic for mirroring remote image galleries
//!
//! This crate contains the hexagonal core shared by every galsync entry point:
//! - **Domain types** - `RemoteObject`, `RemoteId`, `Watermark`, gallery naming
//!   and front-matter rendering
//! - **Port definitions** - `IRemoteStore` (listing/download capability) and
//!   `IStateStore` (persisted watermark and folder snapshot)
//! - **Use cases** - `ChangeDetector` with pluggable `ChangeProbe` strategies
//! - **Configuration** - YAML-backed `Config` with environment overrides
//!
//! # Architecture
//!
//! The domain module is pure: no I/O, no network. Ports are traits that the
//! `galsync-drive` and `galsync-sync` adapter crates implement. Use cases
//! orchestrate domain logic through those ports and never perform raw
//! network calls themselves.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

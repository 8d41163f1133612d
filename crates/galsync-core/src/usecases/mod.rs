//! Use cases (interactors) for galsync
//!
//! - [`ChangeDetector`] - Watermark-based remote change detection with
//!   pluggable [`ChangeProbe`] strategies

pub mod detect_changes;

pub use detect_changes::{
    ChangeDetector, ChangeProbe, ChangeSignal, ChangeVerdict, FolderSetProbe, ModifiedSinceProbe,
};

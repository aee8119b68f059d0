//! Error Types
//!
//! This module defines the error types used throughout Throng.
//!
//! # Overview
//!
//! The main error type [`ThrongError`] covers two families of failure:
//! - Initialization-order errors: an operation was invoked on a record that
//!   is not (or no longer) initialized.
//! - Invalid-configuration errors: missing mesh types, bad bone indices,
//!   degenerate clips, malformed hierarchies and similar input problems.
//!
//! No operation retries internally. Every failure is synchronous and local
//! to the call that caused it.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ThrongError>`.
//!
//! ```rust
//! use throng_core::errors::{Result, ThrongError};
//!
//! fn require_speed(speed: f32) -> Result<()> {
//!     if speed < 0.0 {
//!         return Err(ThrongError::InvalidPlaybackSpeed(speed));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_speed(-1.0).is_err());
//! ```

use thiserror::Error;

/// The main error type for Throng.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThrongError {
    // ========================================================================
    // Initialization-Order Errors
    // ========================================================================
    /// The record has not been initialized yet.
    #[error("Skinned mesh is not initialized: cannot {operation}")]
    NotInitialized {
        /// The rejected operation
        operation: &'static str,
    },

    /// `initialize` was called twice on the same record.
    #[error("Skinned mesh is already initialized")]
    AlreadyInitialized,

    /// The record has been disposed; it is terminal.
    #[error("Skinned mesh has been disposed: cannot {operation}")]
    Disposed {
        /// The rejected operation
        operation: &'static str,
    },

    // ========================================================================
    // Invalid-Configuration Errors
    // ========================================================================
    /// No mesh type has been assigned to the root or to a sub-mesh.
    #[error("No mesh type assigned to {0}")]
    MissingMeshType(&'static str),

    /// Bone index outside of the skeleton.
    #[error("Invalid bone index {index} (bone count: {bone_count})")]
    InvalidBoneIndex {
        /// The rejected bone index
        index: usize,
        /// Number of bones in the skeleton
        bone_count: usize,
    },

    /// A clip (or one of its bone tracks) has a tick length of zero.
    #[error("Degenerate animation clip '{0}': tick length is zero")]
    DegenerateClip(String),

    /// Tick arithmetic was asked to wrap or clamp against a zero length.
    #[error("Tick length is zero: cannot compute animation phase")]
    ZeroTickLength,

    /// A keyframe track is empty or its arrays disagree.
    #[error("Invalid keyframe track: {0}")]
    InvalidTrack(String),

    /// Parent indices do not form a tree.
    #[error("Invalid bone hierarchy: {0}")]
    InvalidHierarchy(String),

    /// A clip's bone track count does not match the skeleton.
    #[error("Clip '{clip}' has {actual} bone tracks, skeleton has {expected} bones")]
    BoneCountMismatch {
        /// Clip name
        clip: String,
        /// Bones in the hierarchy
        expected: usize,
        /// Bone tracks in the clip
        actual: usize,
    },

    /// Lookup by name failed.
    #[error("Animation not found: {0}")]
    AnimationNotFound(String),

    /// Lookup by identifier failed.
    #[error("Animation clip id {0} is not part of this controller")]
    ClipNotFound(u32),

    /// The controller carries no clips at all.
    #[error("Animation controller '{0}' has no animations")]
    EmptyController(String),

    /// Playback speed must be finite and non-negative.
    #[error("Invalid playback speed {0}: speed must be finite and >= 0")]
    InvalidPlaybackSpeed(f32),

    /// Cross-fade duration must be finite and non-negative.
    #[error("Invalid cross-fade duration {0}")]
    InvalidFadeDuration(f32),

    /// The hierarchy is deeper than the instancer was configured for.
    #[error("Bone hierarchy depth {depth} exceeds configured parent depth {max}")]
    HierarchyTooDeep {
        /// Required parent depth
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    // ========================================================================
    // Sink Errors
    // ========================================================================
    /// An identifier pool ran out of free slots.
    #[error("Identifier pool exhausted: {pool} (capacity: {capacity})")]
    IdPoolExhausted {
        /// Pool name
        pool: &'static str,
        /// Pool capacity
        capacity: usize,
    },

    /// The handle does not refer to a live instance.
    #[error("Unknown instance id {0}")]
    UnknownInstance(u32),
}

impl ThrongError {
    /// Returns `true` for errors caused by calling an operation in the wrong
    /// lifecycle state.
    #[must_use]
    pub fn is_initialization_order(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized { .. } | Self::AlreadyInitialized | Self::Disposed { .. }
        )
    }
}

/// Alias for `Result<T, ThrongError>`.
pub type Result<T> = std::result::Result<T, ThrongError>;

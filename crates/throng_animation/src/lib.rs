//! Throng Animation
//!
//! Immutable clip data and the CPU side of bone evaluation:
//!
//! - [`tracks`] / [`values`]: keyframe tracks and interpolation
//! - [`clip`]: per-bone tracks grouped into [`AnimationClip`]s
//! - [`hierarchy`]: validated bone trees with parent-first order
//! - [`controller`]: clip families and the global [`ClipRegistry`]
//! - [`clock`]: tick arithmetic shared with the GPU evaluator
//! - [`evaluator`]: hierarchical bone evaluation and per-bone blending

pub mod clip;
pub mod clock;
pub mod controller;
pub mod evaluator;
pub mod hierarchy;
pub mod pose;
pub mod tracks;
pub mod values;

pub use clip::{AnimationClip, BoneAnimation};
pub use clock::{PlaybackClock, raw_to_speed, speed_to_raw, tick_phase};
pub use controller::{AnimationController, ClipRegistry, ControllerKey};
pub use evaluator::{AnimationLayer, BoneEvaluator, PoseSource};
pub use hierarchy::{BoneChain, BoneHierarchy, ROOT_BONE_SENTINEL};
pub use pose::BoneTransform;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;

//! Throng Instancing
//!
//! CPU-side mirror of GPU instance state and its differential sync:
//!
//! - [`instance`] / [`dirty`]: instance records with sticky dirty flags
//! - [`instancer`]: the [`MeshInstancer`] Sink interface
//! - [`staging`]: an in-memory reference Sink
//! - [`skeleton`]: per-bone instance fan-out
//! - [`skinned_mesh`]: the animated object, its lifecycle and cross-fades

pub mod cross_fade;
pub mod dirty;
pub mod gpu;
pub mod instance;
pub mod instancer;
pub mod skeleton;
pub mod skinned_mesh;
pub mod staging;

pub use cross_fade::{CrossFade, CrossFadeStatus};
pub use dirty::DirtyFlags;
pub use gpu::{GpuInstance, INSTANCE_FLAG_ANIMATION_CULLING, INSTANCE_FLAG_PLAY_ONCE};
pub use instance::{InstanceData, InstanceProperties};
pub use instancer::MeshInstancer;
pub use skeleton::Skeleton;
pub use skinned_mesh::{
    BlendParams, FadeParams, Lifecycle, PlaybackParams, SkinnedMesh, SkinnedMeshDesc, SubMeshes,
};
pub use staging::{StagingInstancer, StagingStats};

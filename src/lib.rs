//! # Throng
//!
//! GPU-instanced skeletal animation for large crowds.
//!
//! Thousands of skinned instances share immutable clips. Each instance
//! carries a small animation state (two clip slots, clock offsets, a blend
//! weight) that a GPU compute pass evaluates every frame. This crate keeps
//! the CPU side of that contract:
//!
//! - tick arithmetic and hierarchical bone evaluation that match the GPU
//!   result, for gameplay queries and debug views ([`animation`])
//! - per-instance cross-fades and explicit two-clip blends ([`SkinnedMesh`])
//! - sticky dirty flags that coalesce writes into sparse uploads through a
//!   [`MeshInstancer`] Sink ([`instancing`])
//!
//! ```rust
//! use throng::prelude::*;
//!
//! # fn main() -> throng::Result<()> {
//! let mut registry = ClipRegistry::new();
//! let hierarchy = BoneHierarchy::new(vec![None, Some(0)])?;
//! let idle = AnimationClip::new("idle", vec![BoneAnimation::new(60), BoneAnimation::new(60)])?;
//! let controller = registry.register("walker", hierarchy, vec![idle])?;
//!
//! let mut sink = StagingInstancer::default();
//! sink.register_controller(&controller)?;
//!
//! let mut mesh = SkinnedMesh::new(SkinnedMeshDesc::new(MeshTypeId::new(1), controller));
//! mesh.initialize(&mut sink, true)?;
//! mesh.update_all(&mut sink)?;
//! assert_eq!(sink.flush().len(), mesh.instance_count());
//! # Ok(())
//! # }
//! ```

pub use throng_animation as animation;
pub use throng_core::time;
pub use throng_instancing as instancing;

pub use throng_core::{
    ClipId, FrameClock, InstanceId, InstancerSettings, MeshTypeId, Result, SPEED_SCALE,
    SkeletonId, TICKS_PER_SECOND, ThrongError, TickClock, Ticks,
};

pub use throng_animation::{
    AnimationClip, AnimationController, BoneAnimation, BoneHierarchy, BoneTransform, ClipRegistry,
    InterpolationMode, KeyframeTrack,
};

pub use throng_instancing::{
    BlendParams, CrossFadeStatus, DirtyFlags, FadeParams, GpuInstance, InstanceData, Lifecycle,
    MeshInstancer, PlaybackParams, SkinnedMesh, SkinnedMeshDesc, StagingInstancer,
};

pub mod prelude {
    pub use crate::{
        AnimationClip, AnimationController, BlendParams, BoneAnimation, BoneHierarchy,
        BoneTransform, ClipId, ClipRegistry, CrossFadeStatus, DirtyFlags, FadeParams, FrameClock,
        InstancerSettings, InterpolationMode, KeyframeTrack, MeshInstancer, MeshTypeId,
        PlaybackParams, SkinnedMesh, SkinnedMeshDesc, StagingInstancer, ThrongError,
    };
}

//! Instancer Settings
//!
//! Configuration consumed once when a Sink is created.
//!
//! ```rust
//! use throng_core::settings::InstancerSettings;
//!
//! let settings = InstancerSettings {
//!     max_instances: 4096,
//!     ..Default::default()
//! };
//! assert!(settings.animation_culling);
//! ```

/// Global configuration for a mesh instancer.
///
/// | Field                | Description                                   | Default |
/// |----------------------|-----------------------------------------------|---------|
/// | `max_instances`      | Capacity of the GPU instance buffer           | `65536` |
/// | `max_skeletons`      | Capacity of the skeleton id pool              | `8192`  |
/// | `num_skeleton_bones` | Largest bone count of any registered skeleton | `64`    |
/// | `max_parent_depth`   | Deepest parent chain the GPU resolves         | `10`    |
/// | `animation_culling`  | Culling flag hosts pass to `initialize`       | `true`  |
///
/// `max_parent_depth` must cover the deepest bone chain plus two levels:
/// one for the mesh root and one for objects attached to bones.
///
/// The Sink never reads `animation_culling` itself. Hosts read it back through
/// the Sink's settings and hand it to `SkinnedMesh::initialize` for each new mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstancerSettings {
    pub max_instances: usize,
    pub max_skeletons: usize,
    pub num_skeleton_bones: usize,
    pub max_parent_depth: usize,
    pub animation_culling: bool,
}

impl Default for InstancerSettings {
    fn default() -> Self {
        Self {
            max_instances: 65_536,
            max_skeletons: 8_192,
            num_skeleton_bones: 64,
            max_parent_depth: 10,
            animation_culling: true,
        }
    }
}

impl InstancerSettings {
    /// Parent depth needed for a skeleton whose deepest bone chain has
    /// `hierarchy_depth` levels.
    #[inline]
    #[must_use]
    pub fn required_parent_depth(hierarchy_depth: usize) -> usize {
        hierarchy_depth + 2
    }
}

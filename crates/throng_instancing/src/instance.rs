//! CPU mirror of one GPU instance record.
//!
//! Fields are only reachable through setters so that every write marks the
//! matching [`DirtyFlags`] group. Setters are O(1) and never talk to the GPU.

use glam::{Affine3A, Quat, Vec3};
use throng_animation::ROOT_BONE_SENTINEL;
use throng_core::{ClipId, InstanceId, MeshTypeId, SPEED_SCALE, SkeletonId};

use crate::dirty::DirtyFlags;

/// Animation state of an instance, as laid out for the GPU evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceProperties {
    pub animation_id: ClipId,
    pub instance_ticks: u32,
    pub animation_id_b: ClipId,
    pub instance_ticks_b: u32,
    /// Weight of animation B in `[0, 1]`.
    pub animation_blend: f32,
    /// Fixed-point speed, scaled by [`SPEED_SCALE`].
    pub animation_speed_raw: u32,
    pub play_once: bool,
    pub animation_culling: bool,
}

impl Default for InstanceProperties {
    fn default() -> Self {
        Self {
            animation_id: ClipId::NONE,
            instance_ticks: 0,
            animation_id_b: ClipId::NONE,
            instance_ticks_b: 0,
            animation_blend: 0.0,
            animation_speed_raw: SPEED_SCALE,
            play_once: false,
            animation_culling: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstanceData {
    id: InstanceId,
    mesh_type: MeshTypeId,
    parent: InstanceId,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    radius: f32,
    property_id: u32,
    skeleton_id: SkeletonId,
    bone: u32,
    props: InstanceProperties,
    dirty: DirtyFlags,
}

impl Default for InstanceData {
    fn default() -> Self {
        Self::new(MeshTypeId::NONE)
    }
}

impl InstanceData {
    #[must_use]
    pub fn new(mesh_type: MeshTypeId) -> Self {
        Self {
            id: InstanceId::NONE,
            mesh_type,
            parent: InstanceId::NONE,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            radius: 1.0,
            property_id: 0,
            skeleton_id: SkeletonId::NONE,
            bone: ROOT_BONE_SENTINEL,
            props: InstanceProperties::default(),
            dirty: DirtyFlags::empty(),
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn mesh_type(&self) -> MeshTypeId {
        self.mesh_type
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> InstanceId {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    #[must_use]
    pub fn property_id(&self) -> u32 {
        self.property_id
    }

    #[inline]
    #[must_use]
    pub fn skeleton_id(&self) -> SkeletonId {
        self.skeleton_id
    }

    /// Bone index for skeleton bone instances, [`ROOT_BONE_SENTINEL`] otherwise.
    #[inline]
    #[must_use]
    pub fn bone(&self) -> u32 {
        self.bone
    }

    #[inline]
    #[must_use]
    pub fn props(&self) -> &InstanceProperties {
        &self.props
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    // ========================================================================
    // Dirty tracking
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Reads and clears the dirty mask in one step. Only the Sink calls
    /// this, after it has copied the flagged fields.
    #[inline]
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Assigned by the Sink on allocation. Marks the whole record dirty.
    pub fn set_id(&mut self, id: InstanceId) {
        self.id = id;
        self.dirty = DirtyFlags::all();
    }

    pub fn set_mesh_type(&mut self, mesh_type: MeshTypeId) {
        self.mesh_type = mesh_type;
        self.dirty |= DirtyFlags::MESH_TYPE;
    }

    pub fn set_parent(&mut self, parent: InstanceId) {
        self.parent = parent;
        self.dirty |= DirtyFlags::PARENT;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty |= DirtyFlags::POSITION;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty |= DirtyFlags::ROTATION;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty |= DirtyFlags::SCALE;
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.dirty |= DirtyFlags::RADIUS;
    }

    pub fn set_property_id(&mut self, property_id: u32) {
        self.property_id = property_id;
        self.dirty |= DirtyFlags::PROPERTY;
    }

    pub fn set_skeleton_id(&mut self, skeleton_id: SkeletonId) {
        self.skeleton_id = skeleton_id;
        self.dirty |= DirtyFlags::SKELETON;
    }

    pub fn set_bone(&mut self, bone: u32) {
        self.bone = bone;
        self.dirty |= DirtyFlags::EXTRA;
    }

    pub fn set_animation_id(&mut self, id: ClipId) {
        self.props.animation_id = id;
        self.dirty |= DirtyFlags::ANIMATION_ID;
    }

    pub fn set_instance_ticks(&mut self, ticks: u32) {
        self.props.instance_ticks = ticks;
        self.dirty |= DirtyFlags::INSTANCE_TICKS;
    }

    pub fn set_animation_id_b(&mut self, id: ClipId) {
        self.props.animation_id_b = id;
        self.dirty |= DirtyFlags::ANIMATION_ID_B;
    }

    pub fn set_instance_ticks_b(&mut self, ticks: u32) {
        self.props.instance_ticks_b = ticks;
        self.dirty |= DirtyFlags::INSTANCE_TICKS_B;
    }

    /// Clamped to `[0, 1]`.
    pub fn set_animation_blend(&mut self, blend: f32) {
        self.props.animation_blend = if blend.is_nan() { 0.0 } else { blend.clamp(0.0, 1.0) };
        self.dirty |= DirtyFlags::ANIMATION_BLEND;
    }

    pub fn set_playback(&mut self, speed_raw: u32, play_once: bool) {
        self.props.animation_speed_raw = speed_raw;
        self.props.play_once = play_once;
        self.dirty |= DirtyFlags::EXTRA;
    }

    pub fn set_animation_culling(&mut self, culling: bool) {
        self.props.animation_culling = culling;
        self.dirty |= DirtyFlags::EXTRA;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_is_clamped() {
        let mut d = InstanceData::new(MeshTypeId::new(1));
        d.set_animation_blend(1.7);
        assert!((d.props().animation_blend - 1.0).abs() < f32::EPSILON);
        d.set_animation_blend(-3.0);
        assert!(d.props().animation_blend.abs() < f32::EPSILON);
        d.set_animation_blend(f32::NAN);
        assert!(d.props().animation_blend.abs() < f32::EPSILON);
    }

    #[test]
    fn take_dirty_clears_mask() {
        let mut d = InstanceData::new(MeshTypeId::new(1));
        d.set_radius(2.0);
        d.set_position(Vec3::X);
        assert_eq!(d.take_dirty(), DirtyFlags::RADIUS | DirtyFlags::POSITION);
        assert!(!d.is_dirty());
    }
}

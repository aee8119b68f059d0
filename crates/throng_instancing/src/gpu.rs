//! GPU-side instance record layout.

use bytemuck::{Pod, Zeroable};

use crate::dirty::DirtyFlags;
use crate::instance::InstanceData;

/// `GpuInstance::flags` bit: clamp at the last tick instead of wrapping.
pub const INSTANCE_FLAG_PLAY_ONCE: u32 = 1 << 0;
/// `GpuInstance::flags` bit: skip bone evaluation when the instance is culled.
pub const INSTANCE_FLAG_ANIMATION_CULLING: u32 = 1 << 1;

/// One instance slot of the GPU instance buffer (96 bytes, 16-byte rows).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GpuInstance {
    pub position: [f32; 3],
    pub radius: f32,

    pub rotation: [f32; 4],

    pub scale: [f32; 3],
    pub parent_id: u32,

    pub mesh_type: u32,
    pub skeleton_id: u32,
    pub bone: u32,
    pub property_id: u32,

    pub animation_id: u32,
    pub instance_ticks: u32,
    pub animation_id_b: u32,
    pub instance_ticks_b: u32,

    pub animation_blend: f32,
    pub animation_speed: u32,
    pub flags: u32,
    pub _padding: u32,
}

impl GpuInstance {
    /// Copies the field groups selected by `flags` from `data`.
    pub fn apply(&mut self, data: &InstanceData, flags: DirtyFlags) {
        if flags.contains(DirtyFlags::POSITION) {
            self.position = data.position().to_array();
        }
        if flags.contains(DirtyFlags::ROTATION) {
            self.rotation = data.rotation().to_array();
        }
        if flags.contains(DirtyFlags::SCALE) {
            self.scale = data.scale().to_array();
        }
        if flags.contains(DirtyFlags::PARENT) {
            self.parent_id = data.parent().raw();
        }
        if flags.contains(DirtyFlags::MESH_TYPE) {
            self.mesh_type = data.mesh_type().raw();
        }
        if flags.contains(DirtyFlags::RADIUS) {
            self.radius = data.radius();
        }
        if flags.contains(DirtyFlags::SKELETON) {
            self.skeleton_id = data.skeleton_id().raw();
        }
        if flags.contains(DirtyFlags::PROPERTY) {
            self.property_id = data.property_id();
        }

        let props = data.props();
        if flags.contains(DirtyFlags::ANIMATION_ID) {
            self.animation_id = props.animation_id.raw();
        }
        if flags.contains(DirtyFlags::INSTANCE_TICKS) {
            self.instance_ticks = props.instance_ticks;
        }
        if flags.contains(DirtyFlags::ANIMATION_ID_B) {
            self.animation_id_b = props.animation_id_b.raw();
        }
        if flags.contains(DirtyFlags::INSTANCE_TICKS_B) {
            self.instance_ticks_b = props.instance_ticks_b;
        }
        if flags.contains(DirtyFlags::ANIMATION_BLEND) {
            self.animation_blend = props.animation_blend;
        }
        if flags.contains(DirtyFlags::EXTRA) {
            self.bone = data.bone();
            self.animation_speed = props.animation_speed_raw;
            let mut bits = 0;
            if props.play_once {
                bits |= INSTANCE_FLAG_PLAY_ONCE;
            }
            if props.animation_culling {
                bits |= INSTANCE_FLAG_ANIMATION_CULLING;
            }
            self.flags = bits;
        }
    }
}

const _: () = assert!(std::mem::size_of::<GpuInstance>() == 96);

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use throng_core::MeshTypeId;

    #[test]
    fn apply_copies_only_flagged_groups() {
        let mut data = InstanceData::new(MeshTypeId::new(3));
        data.set_position(Vec3::new(1.0, 2.0, 3.0));
        data.set_radius(4.0);

        let mut gpu = GpuInstance::zeroed();
        gpu.apply(&data, DirtyFlags::POSITION);

        assert_eq!(gpu.position, [1.0, 2.0, 3.0]);
        assert!(gpu.radius.abs() < f32::EPSILON, "radius was not flagged");
        assert_eq!(gpu.mesh_type, 0);
    }

    #[test]
    fn extra_group_packs_flags() {
        let mut data = InstanceData::new(MeshTypeId::new(1));
        data.set_playback(25, true);
        data.set_animation_culling(false);

        let mut gpu = GpuInstance::zeroed();
        gpu.apply(&data, DirtyFlags::EXTRA);

        assert_eq!(gpu.animation_speed, 25);
        assert_eq!(gpu.flags, INSTANCE_FLAG_PLAY_ONCE);
    }
}

//! Sticky per-instance dirty flags.
//!
//! Every setter ORs in the bits of the field groups it touched. Bits stay set
//! until the Sink reads and clears them in one call
//! ([`InstanceData::take_dirty`](crate::InstanceData::take_dirty)), so
//! several writes to the same field between two flushes coalesce into a
//! single transfer.

bitflags::bitflags! {
    /// Field groups of the GPU instance record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u32 {
        const POSITION = 1 << 0;
        const ROTATION = 1 << 1;
        const SCALE = 1 << 2;
        const PARENT = 1 << 3;
        const MESH_TYPE = 1 << 4;
        const RADIUS = 1 << 5;
        const SKELETON = 1 << 6;
        const PROPERTY = 1 << 7;
        /// Animation A clip id.
        const ANIMATION_ID = 1 << 8;
        /// Animation A clock offset.
        const INSTANCE_TICKS = 1 << 9;
        /// Animation B clip id.
        const ANIMATION_ID_B = 1 << 10;
        /// Animation B clock offset.
        const INSTANCE_TICKS_B = 1 << 11;
        const ANIMATION_BLEND = 1 << 12;
        /// Catch-all: speed, play-once, culling and bone index.
        const EXTRA = 1 << 13;

        const TRANSFORM = Self::POSITION.bits() | Self::ROTATION.bits() | Self::SCALE.bits();
        const ANIMATION = Self::ANIMATION_ID.bits()
            | Self::INSTANCE_TICKS.bits()
            | Self::ANIMATION_ID_B.bits()
            | Self::INSTANCE_TICKS_B.bits()
            | Self::ANIMATION_BLEND.bits()
            | Self::EXTRA.bits();
    }
}

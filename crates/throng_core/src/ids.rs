//! Identifier newtypes shared between the CPU mirror and the GPU buffers.
//!
//! Every identifier reserves `0` as "none", matching the layout of the GPU
//! instance buffer where a zeroed field means "unset".

use std::fmt;

macro_rules! gpu_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// The reserved "none" value.
            pub const NONE: Self = Self(0);

            #[inline]
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            #[must_use]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }

            #[inline]
            #[must_use]
            pub const fn is_some(self) -> bool {
                self.0 != 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

gpu_id!(
    /// Global identifier of an animation clip in the GPU animation buffer.
    ClipId
);

gpu_id!(
    /// Slot of an instance in the GPU instance buffer.
    InstanceId
);

gpu_id!(
    /// Skeleton identifier allocated by the Sink, shared by a root and its sub-meshes.
    SkeletonId
);

gpu_id!(
    /// Registered mesh type (a "group" of instances drawn with one mesh).
    MeshTypeId
);

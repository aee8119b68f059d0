//! Throng Core
//!
//! Foundational types shared by every Throng crate:
//!
//! - [`errors`]: the [`ThrongError`] taxonomy and [`Result`] alias
//! - [`time`]: global tick counter and frame clock snapshots
//! - [`ids`]: GPU-facing identifier newtypes
//! - [`settings`]: [`InstancerSettings`]

pub mod errors;
pub mod ids;
pub mod settings;
pub mod time;

pub use errors::{Result, ThrongError};
pub use ids::{ClipId, InstanceId, MeshTypeId, SkeletonId};
pub use settings::InstancerSettings;
pub use time::{FrameClock, SPEED_SCALE, TICKS_PER_SECOND, TickClock, Ticks};

//! The per-frame stages that turn visibility, readiness and the fan flag into
//! a renderable assembly.
//!
//! Stages run in this order every tick, and none reads a later stage's output:
//! - `selector` picks the visible, loaded catalog entries
//! - `cloner` rebuilds the assembly scene from private copies when that set changes
//! - `centering`, `annotations` and `animator` each work on the fresh assembly
//! - `assembler` lays out the draw list handed to the host

pub mod animator;
pub mod annotations;
pub mod assembler;
pub mod centering;
pub mod cloner;
pub mod selector;

pub use animator::{FanAnimator, Phase, RotationState};
pub use annotations::{AnnotationEntry, AnnotationLocator, TelemetryRow};
pub use assembler::{DrawItem, Frame, Overlay};
pub use centering::{BoundingCenter, CenterState};
pub use cloner::{Assembly, InstanceCloner, VisibleInstance};
pub use selector::select_visible;

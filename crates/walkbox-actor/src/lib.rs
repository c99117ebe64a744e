//! Actors walking over walkbox rooms: walk arithmetic, facing, the per-tick
//! walk state machine, save state and a scene driving several actors.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actor;
pub mod config;
pub mod error;
pub mod facing;
pub mod policy;
pub mod scene;
pub mod snapshot;
pub mod walk;

pub use actor::{Actor, ActorId, ActorView};
pub use config::WalkConfig;
pub use error::WalkError;
pub use policy::{LegacyCounter, Leg, PolicyKind, RectangularSpeed, ScaledStep, StepOutcome, WalkPolicy, WalkSpeed};
pub use scene::Scene;
pub use snapshot::{WalkSnapshot, NO_ID};
pub use walk::{WalkState, WalkStatus};

use thiserror::Error;

use walkbox_nav::NavError;

use crate::ActorId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    #[error("walk speed must be positive on both axes (got {x}x{y})")]
    InvalidSpeed { x: u16, y: u16 },

    #[error("no actor with id {0:?}")]
    UnknownActor(ActorId),

    #[error("actor {0:?} already exists")]
    DuplicateActor(ActorId),

    #[error(transparent)]
    Nav(#[from] NavError),
}

//! Level simulation errors

use super::body::BodyId;

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// A singular entity the frame needs was never registered
    #[error("no {0} registered")]
    NotRegistered(&'static str),

    #[error("body {0:?} is not in the physics world")]
    MissingBody(BodyId),

    #[error("illegal {entity} transition: {from} -> {to}")]
    IllegalTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Settings(#[from] serde_json::Error),
}

//! Error types for the combat core.
//!
//! Everything here is a local, recoverable condition: the director's tick
//! never propagates a fatal error to the host loop. Malformed input degrades
//! to "nothing observable happens this tick".

use crate::agent::AgentId;

/// Formation planning failures.
///
/// The formation kind is a closed enum, so an unknown kind is
/// unrepresentable; what remains recoverable is degenerate geometry input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormationError {
    #[error("cannot plan a formation for zero agents")]
    Empty,
    #[error("degenerate formation parameter: {0}")]
    DegenerateParams(&'static str),
}

/// Group creation failures. The group is not created; no agent is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error(transparent)]
    Formation(#[from] FormationError),
    #[error("agent {0:?} is not present in the registry")]
    UnknownMember(AgentId),
    #[error("agent {0:?} already belongs to a group")]
    AlreadyGrouped(AgentId),
}

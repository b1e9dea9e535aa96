//! Error taxonomy of the world model

use thiserror::Error;

use crate::types::{PrefixedName, Scale};
use crate::world::{AnnotationId, BodyId, ConnectionId, DofId};

/// A proposed edit would violate a tree invariant
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("Body already exists: {0}")]
    DuplicateBody(PrefixedName),
    #[error("Body not found: {0:?}")]
    BodyNotFound(BodyId),
    #[error("Connection not found: {0:?}")]
    ConnectionNotFound(ConnectionId),
    #[error("Connecting {parent:?} -> {child:?} would create a cycle")]
    WouldCreateCycle { parent: BodyId, child: BodyId },
    #[error("Body already has a parent: {0:?}")]
    AlreadyHasParent(BodyId),
    #[error("Body has no parent: {0:?}")]
    NoParent(BodyId),
    #[error("Body cannot be connected to itself: {0:?}")]
    SelfConnection(BodyId),
    #[error("Connection {0} was created for another world")]
    ForeignConnection(PrefixedName),
    #[error("Degree of freedom already exists: {0}")]
    DuplicateDof(PrefixedName),
    #[error("Degree of freedom is not owned by any connection: {0}")]
    OrphanDof(PrefixedName),
    #[error("World has more than one root: {0:?}")]
    MultipleRoots(Vec<BodyId>),
    #[error("Inconsistent kinematic structure: {0}")]
    Inconsistent(String),
}

/// A factory's domain precondition failed; raised before any structural change
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainValidationError {
    #[error("Invalid door dimensions {scale:?}: a door must be thin and tall")]
    InvalidDoorDimensions { scale: Scale },
    #[error("Invalid scale {0:?}: extents must be positive and finite")]
    InvalidScale(Scale),
    #[error("Invalid thickness {0}: must be positive and finite")]
    InvalidThickness(f32),
    #[error("A double door needs two distinct doors")]
    DuplicateDoors,
}

/// Errors returned by world operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Domain(#[from] DomainValidationError),
    #[error("Annotation not found or of another type: {0:?}")]
    UnknownAnnotation(AnnotationId),
    #[error("Degree of freedom not found: {0:?}")]
    DofNotFound(DofId),
    #[error("Position {position} of {name} is outside [{lower}, {upper}]")]
    DofOutOfBounds {
        name: PrefixedName,
        position: f32,
        lower: f32,
        upper: f32,
    },
}

pub type WorldResult<T> = Result<T, WorldError>;

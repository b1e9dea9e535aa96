//! Semantic annotations attach domain meaning to bodies of the tree
//!
//! Every variant declares its type tag and the capabilities it implements;
//! the world's [`AnnotationIndex`] is keyed by those tags so that a query for
//! a capability such as [`AnnotationType::HasCase`] returns fridges, drawers
//! and dressers alike.

mod case;
mod door;
mod double_door;
mod drawer;
mod handle;
mod mechanism;
mod registry;
mod surface;

pub use case::{Dresser, Fridge, HasCase};
pub use door::Door;
pub use double_door::DoubleDoor;
pub use drawer::Drawer;
pub use handle::Handle;
pub use mechanism::{Hinge, Slider};
pub use registry::AnnotationIndex;
pub use surface::{Floor, Wall};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::connection::{Connection, ConnectionBuilder};
use crate::error::{DomainValidationError, StructureError, WorldResult};
use crate::types::{PrefixedName, Scale};
use crate::world::{AnnotationId, Body, BodyId, WorldEdit};

/// Variant and capability tags of the annotation index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationType {
    Door,
    Drawer,
    Handle,
    Hinge,
    Slider,
    Fridge,
    Dresser,
    Wall,
    Floor,
    DoubleDoor,
    /// Annotates exactly one body
    HasBody,
    /// Has a replaceable case body
    HasCase,
    HasHinge,
    HasSlider,
    HasHandle,
    HasDoors,
    HasDrawers,
}

/// A registered annotation
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticAnnotation {
    Door(Door),
    Drawer(Drawer),
    Handle(Handle),
    Hinge(Hinge),
    Slider(Slider),
    Fridge(Fridge),
    Dresser(Dresser),
    Wall(Wall),
    Floor(Floor),
    DoubleDoor(DoubleDoor),
}

/// Dispatch over every variant of [`SemanticAnnotation`]
macro_rules! each_annotation {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            SemanticAnnotation::Door($a) => $body,
            SemanticAnnotation::Drawer($a) => $body,
            SemanticAnnotation::Handle($a) => $body,
            SemanticAnnotation::Hinge($a) => $body,
            SemanticAnnotation::Slider($a) => $body,
            SemanticAnnotation::Fridge($a) => $body,
            SemanticAnnotation::Dresser($a) => $body,
            SemanticAnnotation::Wall($a) => $body,
            SemanticAnnotation::Floor($a) => $body,
            SemanticAnnotation::DoubleDoor($a) => $body,
        }
    };
}

impl SemanticAnnotation {
    pub fn annotation_type(&self) -> AnnotationType {
        each_annotation!(self, a => annotation_type_of(a))
    }

    pub fn capabilities(&self) -> &'static [AnnotationType] {
        each_annotation!(self, a => capabilities_of(a))
    }

    /// Whether this annotation is of type `ty` or implements capability `ty`
    pub fn implements(&self, ty: AnnotationType) -> bool {
        self.annotation_type() == ty || self.capabilities().contains(&ty)
    }

    pub fn name(&self) -> &PrefixedName {
        each_annotation!(self, a => a.name())
    }

    /// Bodies this annotation describes
    pub fn bodies(&self) -> Vec<BodyId> {
        each_annotation!(self, a => a.bodies())
    }

    /// View as the "has a replaceable case" capability
    pub fn as_has_case(&self) -> Option<&dyn HasCase> {
        match self {
            SemanticAnnotation::Fridge(a) => Some(a),
            SemanticAnnotation::Drawer(a) => Some(a),
            SemanticAnnotation::Dresser(a) => Some(a),
            _ => None,
        }
    }
}

fn annotation_type_of<T: Annotation>(_: &T) -> AnnotationType {
    T::TYPE
}

fn capabilities_of<T: Annotation>(_: &T) -> &'static [AnnotationType] {
    T::CAPABILITIES
}

/// Implemented by every concrete annotation variant
pub trait Annotation: Clone + Into<SemanticAnnotation> {
    const TYPE: AnnotationType;
    const CAPABILITIES: &'static [AnnotationType];

    fn name(&self) -> &PrefixedName;
    fn bodies(&self) -> Vec<BodyId>;
    fn from_annotation(annotation: &SemanticAnnotation) -> Option<&Self>;
    fn from_annotation_mut(annotation: &mut SemanticAnnotation) -> Option<&mut Self>;
}

/// Implements [`Annotation`] for a variant annotating a single `body`
macro_rules! single_body_annotation {
    ($variant:ident, [$($capability:ident),* $(,)?]) => {
        impl $crate::annotation::Annotation for $variant {
            const TYPE: $crate::annotation::AnnotationType =
                $crate::annotation::AnnotationType::$variant;
            const CAPABILITIES: &'static [$crate::annotation::AnnotationType] =
                &[$($crate::annotation::AnnotationType::$capability),*];

            fn name(&self) -> &$crate::types::PrefixedName {
                &self.name
            }

            fn bodies(&self) -> Vec<$crate::world::BodyId> {
                vec![self.body]
            }

            fn from_annotation(
                annotation: &$crate::annotation::SemanticAnnotation,
            ) -> Option<&Self> {
                match annotation {
                    $crate::annotation::SemanticAnnotation::$variant(a) => Some(a),
                    _ => None,
                }
            }

            fn from_annotation_mut(
                annotation: &mut $crate::annotation::SemanticAnnotation,
            ) -> Option<&mut Self> {
                match annotation {
                    $crate::annotation::SemanticAnnotation::$variant(a) => Some(a),
                    _ => None,
                }
            }
        }

        impl From<$variant> for $crate::annotation::SemanticAnnotation {
            fn from(annotation: $variant) -> Self {
                $crate::annotation::SemanticAnnotation::$variant(annotation)
            }
        }
    };
}

pub(crate) use single_body_annotation;

/// Typed handle to a registered annotation; compares by identity
pub struct AnnotationRef<T> {
    id: AnnotationId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AnnotationRef<T> {
    pub(crate) fn new(id: AnnotationId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

impl<T> Clone for AnnotationRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AnnotationRef<T> {}

impl<T> PartialEq for AnnotationRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AnnotationRef<T> {}

impl<T> Hash for AnnotationRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for AnnotationRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnnotationRef").field(&self.id).finish()
    }
}

impl<T> From<AnnotationRef<T>> for AnnotationId {
    fn from(handle: AnnotationRef<T>) -> Self {
        handle.id
    }
}

/// Extents must be positive and finite
pub(crate) fn validate_scale(scale: Scale) -> Result<(), DomainValidationError> {
    if scale.is_positive() {
        Ok(())
    } else {
        Err(DomainValidationError::InvalidScale(scale))
    }
}

/// Create a body and connect it to `parent`
pub(crate) fn create_body_with_connection(
    edit: &mut WorldEdit<'_>,
    name: PrefixedName,
    parent: BodyId,
    configure: impl FnOnce(ConnectionBuilder) -> ConnectionBuilder,
) -> WorldResult<BodyId> {
    if edit.body(parent).is_none() {
        return Err(StructureError::BodyNotFound(parent).into());
    }

    let body = edit.add_body(Body::new(name))?;
    let connection = configure(Connection::builder(parent, body)).create_with_dofs(edit)?;
    edit.add_connection(connection)?;
    Ok(body)
}

/// Insert `mechanism` between `body` and its current parent
///
/// If the mechanism body hangs below `body`, it is first lifted to the
/// former parent with a connection of its own variant, so both creation
/// orders end in `former_parent -> mechanism -> body`.
pub(crate) fn insert_mechanism(
    edit: &mut WorldEdit<'_>,
    body: BodyId,
    mechanism: BodyId,
    configure: impl FnOnce(ConnectionBuilder) -> ConnectionBuilder,
) -> WorldResult<()> {
    if body == mechanism {
        return Err(StructureError::SelfConnection(body).into());
    }
    let former_parent = edit.parent_body(body).ok_or(StructureError::NoParent(body))?;

    if edit.is_ancestor(body, mechanism) {
        edit.reparent(mechanism, former_parent)?;
    }

    edit.detach(body)?;
    let connection = configure(Connection::builder(mechanism, body)).create_with_dofs(edit)?;
    edit.add_connection(connection)?;
    Ok(())
}

/// Re-attach `child` under `parent` with a fixed connection
pub(crate) fn attach_fixed(edit: &mut WorldEdit<'_>, child: BodyId, parent: BodyId) -> WorldResult<()> {
    if edit.body(parent).is_none() {
        return Err(StructureError::BodyNotFound(parent).into());
    }
    if edit.is_ancestor(child, parent) {
        return Err(StructureError::WouldCreateCycle { parent, child }.into());
    }

    edit.detach(child)?;
    let connection = Connection::fixed_with_dofs(edit, parent, child)?;
    edit.add_connection(connection)?;
    Ok(())
}

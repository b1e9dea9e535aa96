//! World (kinematic tree) for bodies, connections and semantic annotations
//!
//! Bodies, connections, degrees of freedom and annotations live in
//! index-addressed arenas owned by a [`KinematicTree`]. A [`World`] wraps the
//! committed tree; every structural change goes through
//! [`World::scoped_edit`], which stages the change on a copy and swaps it in
//! only after the whole graph validated.

mod edit;
mod graph;
mod shared;
mod transforms;
mod validate;

pub use edit::WorldEdit;
pub use shared::{SharedWorld, create_shared_world};

use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::annotation::{Annotation, AnnotationIndex, AnnotationRef, AnnotationType, SemanticAnnotation};
use crate::config::TwinConfig;
use crate::connection::Connection;
use crate::dof::DegreeOfFreedom;
use crate::error::{WorldError, WorldResult};
use crate::types::PrefixedName;

/// Index of a body in its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub(crate) u32);

/// Index of a connection in its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub(crate) u32);

/// Index of a degree of freedom in its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DofId(pub(crate) u32);

/// Index of a semantic annotation in its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationId(pub(crate) u32);

/// A rigid node of the kinematic tree
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: PrefixedName,
    /// Incoming connection (None for the root or a not yet connected body)
    pub(crate) parent_connection: Option<ConnectionId>,
    /// Outgoing connections, in insertion order
    pub(crate) child_connections: Vec<ConnectionId>,
}

impl Body {
    pub fn new(name: impl Into<PrefixedName>) -> Self {
        Self {
            name: name.into(),
            parent_connection: None,
            child_connections: Vec::new(),
        }
    }

    pub fn parent_connection(&self) -> Option<ConnectionId> {
        self.parent_connection
    }

    pub fn child_connections(&self) -> &[ConnectionId] {
        &self.child_connections
    }
}

/// Arena storage of the kinematic structure plus the annotation index
#[derive(Debug, Clone, Default)]
pub struct KinematicTree {
    pub(crate) bodies: Vec<Body>,
    pub(crate) body_name_index: HashMap<PrefixedName, BodyId>,
    pub(crate) connections: BTreeMap<ConnectionId, Connection>,
    pub(crate) dofs: BTreeMap<DofId, DegreeOfFreedom>,
    pub(crate) dof_name_index: HashMap<PrefixedName, DofId>,
    pub(crate) annotations: Vec<SemanticAnnotation>,
    pub(crate) annotation_index: AnnotationIndex,
    pub(crate) next_connection: u32,
    pub(crate) next_dof: u32,
}

impl KinematicTree {
    /// The body without an incoming connection (first in insertion order)
    pub fn root(&self) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.parent_connection.is_none())
            .map(|i| BodyId(i as u32))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    /// Find a body ID by name (O(1) lookup)
    pub fn body_by_name(&self, name: &PrefixedName) -> Option<BodyId> {
        self.body_name_index.get(name).copied()
    }

    /// All bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyId(i as u32), b))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections.iter().map(|(id, c)| (*id, c))
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the connection linking a body to its parent
    pub fn parent_connection(&self, body: BodyId) -> Option<&Connection> {
        self.body(body)
            .and_then(|b| b.parent_connection)
            .and_then(|id| self.connections.get(&id))
    }

    /// Get the parent body of a given body
    pub fn parent_body(&self, body: BodyId) -> Option<BodyId> {
        self.parent_connection(body).map(|c| c.parent)
    }

    /// Get all direct children of a body
    pub fn child_bodies(&self, body: BodyId) -> Vec<BodyId> {
        self.body(body)
            .map(|b| {
                b.child_connections
                    .iter()
                    .filter_map(|id| self.connections.get(id))
                    .map(|c| c.child)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the chain of body IDs from a body up to the root (inclusive)
    pub fn chain_to_root(&self, body: BodyId) -> Vec<BodyId> {
        let mut chain = vec![body];
        let mut current = body;

        while let Some(parent) = self.parent_body(current) {
            // A cycle can only exist transiently in a broken staging tree
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain
    }

    /// Check if a body is an ancestor of another (a body is its own ancestor)
    pub fn is_ancestor(&self, ancestor: BodyId, descendant: BodyId) -> bool {
        self.chain_to_root(descendant).contains(&ancestor)
    }

    /// Get all descendant body IDs (depth-first)
    pub fn descendants(&self, body: BodyId) -> Vec<BodyId> {
        let mut descendants = Vec::new();
        let mut stack = vec![body];

        while let Some(current) = stack.pop() {
            for child in self.child_bodies(current) {
                if child != body && !descendants.contains(&child) {
                    descendants.push(child);
                    stack.push(child);
                }
            }
        }

        descendants
    }

    pub fn dof(&self, id: DofId) -> Option<&DegreeOfFreedom> {
        self.dofs.get(&id)
    }

    pub fn dof_by_name(&self, name: &PrefixedName) -> Option<DofId> {
        self.dof_name_index.get(name).copied()
    }

    pub fn dofs(&self) -> impl Iterator<Item = (DofId, &DegreeOfFreedom)> {
        self.dofs.iter().map(|(id, d)| (*id, d))
    }

    pub fn dof_position(&self, id: DofId) -> WorldResult<f32> {
        self.dofs
            .get(&id)
            .map(|d| d.position)
            .ok_or(WorldError::DofNotFound(id))
    }

    pub(crate) fn set_dof_position(&mut self, id: DofId, position: f32) -> WorldResult<()> {
        let dof = self.dofs.get_mut(&id).ok_or(WorldError::DofNotFound(id))?;
        if !dof.limits.contains(position) {
            return Err(WorldError::DofOutOfBounds {
                name: dof.name.clone(),
                position,
                lower: dof.limits.lower,
                upper: dof.limits.upper,
            });
        }
        dof.position = position;
        Ok(())
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&SemanticAnnotation> {
        self.annotations.get(id.0 as usize)
    }

    pub fn annotations(&self) -> impl Iterator<Item = (AnnotationId, &SemanticAnnotation)> {
        self.annotations
            .iter()
            .enumerate()
            .map(|(i, a)| (AnnotationId(i as u32), a))
    }

    /// Resolve a typed handle to its annotation
    pub fn resolve<T: Annotation>(&self, handle: AnnotationRef<T>) -> WorldResult<&T> {
        self.annotation(handle.id())
            .and_then(T::from_annotation)
            .ok_or(WorldError::UnknownAnnotation(handle.id()))
    }

    /// Typed handle for an id, if it names an annotation of type `T`
    pub fn annotation_ref<T: Annotation>(&self, id: AnnotationId) -> Option<AnnotationRef<T>> {
        self.annotation(id)
            .and_then(T::from_annotation)
            .map(|_| AnnotationRef::new(id))
    }

    /// All annotations whose variant is `ty` or that implement capability `ty`
    ///
    /// Returns an empty vector when nothing matches.
    pub fn get_semantic_annotations_by_type(&self, ty: AnnotationType) -> Vec<AnnotationId> {
        self.annotation_index.get(ty).to_vec()
    }

    /// Typed handles to all annotations of a concrete variant
    pub fn semantic_annotations<T: Annotation>(&self) -> Vec<AnnotationRef<T>> {
        self.annotation_index
            .get(T::TYPE)
            .iter()
            .map(|id| AnnotationRef::new(*id))
            .collect()
    }
}

/// The kinematic world: a committed tree, its identity and configuration
#[derive(Debug, Clone)]
pub struct World {
    id: Uuid,
    pub name: String,
    pub(crate) tree: KinematicTree,
    pub(crate) config: TwinConfig,
    version: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::with_config(TwinConfig::default())
    }

    pub fn with_config(config: TwinConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "world".to_string(),
            tree: KinematicTree::default(),
            config,
            version: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &TwinConfig {
        &self.config
    }

    /// Number of committed edit scopes
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn tree(&self) -> &KinematicTree {
        &self.tree
    }

    /// Set a DoF position; the value must lie within the DoF's limits
    pub fn set_dof_position(&mut self, id: DofId, position: f32) -> WorldResult<()> {
        self.tree.set_dof_position(id, position)
    }
}

impl Deref for World {
    type Target = KinematicTree;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

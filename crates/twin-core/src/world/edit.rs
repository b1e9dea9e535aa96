//! Transactional edit scopes
//!
//! An edit scope works on a staged copy of the committed tree. On success the
//! staged tree is validated as a whole and swapped in; on error it is dropped,
//! so readers never observe a partial change. Operations that need to run
//! inside a caller's scope take `&mut WorldEdit` and join it.

use std::ops::Deref;

use uuid::Uuid;

use crate::annotation::{Annotation, AnnotationRef};
use crate::config::TwinConfig;
use crate::connection::{Connection, ConnectionBuilder};
use crate::error::{StructureError, WorldError, WorldResult};
use crate::types::{DofLimits, PrefixedName};

use super::{AnnotationId, Body, BodyId, ConnectionId, DofId, KinematicTree, World};

/// Mutable access to a world inside an edit scope
#[derive(Debug)]
pub struct WorldEdit<'w> {
    world_id: Uuid,
    config: &'w TwinConfig,
    staged: KinematicTree,
    operations: usize,
}

impl World {
    /// Run `f` inside an exclusive edit scope
    ///
    /// The world's invariants are validated when `f` returns `Ok`; the staged
    /// changes are committed only if validation passes. If `f` or the
    /// validation fails, the world is left exactly as it was before the call.
    pub fn scoped_edit<T>(
        &mut self,
        f: impl FnOnce(&mut WorldEdit<'_>) -> WorldResult<T>,
    ) -> WorldResult<T> {
        let mut edit = WorldEdit {
            world_id: self.id,
            config: &self.config,
            staged: self.tree.clone(),
            operations: 0,
        };

        let value = match f(&mut edit) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding edit of world {} after {} operations: {}", self.id, edit.operations, e);
                return Err(e);
            }
        };

        if let Err(errors) = edit.staged.validate() {
            tracing::warn!("Edit of world {} failed validation: {:?}", self.id, errors);
            // validate() never returns an empty error list
            let first = errors
                .into_iter()
                .next()
                .unwrap_or_else(|| StructureError::Inconsistent("validation failed".to_string()));
            return Err(first.into());
        }

        let operations = edit.operations;
        self.tree = edit.staged;
        self.version += 1;
        tracing::debug!(
            "Committed edit of world {} (version {}, {} operations, {} bodies)",
            self.id,
            self.version,
            operations,
            self.tree.body_count()
        );
        Ok(value)
    }

    /// Alias of [`World::scoped_edit`]
    pub fn modify_world<T>(
        &mut self,
        f: impl FnOnce(&mut WorldEdit<'_>) -> WorldResult<T>,
    ) -> WorldResult<T> {
        self.scoped_edit(f)
    }
}

impl WorldEdit<'_> {
    pub fn world_id(&self) -> Uuid {
        self.world_id
    }

    pub fn config(&self) -> &TwinConfig {
        self.config
    }

    /// Register a free-standing body
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, StructureError> {
        let name = body.name.clone();
        let id = self.staged.insert_body(body)?;
        self.operations += 1;
        tracing::debug!("Staged body {} as {:?}", name, id);
        Ok(id)
    }

    /// Register a body that may become the root of the tree
    pub fn add_kinematic_structure_entity(&mut self, body: Body) -> Result<BodyId, StructureError> {
        self.add_body(body)
    }

    /// Register a connection between two bodies already staged in this world
    pub fn add_connection(&mut self, connection: Connection) -> Result<ConnectionId, StructureError> {
        if connection.world_id() != self.world_id {
            return Err(StructureError::ForeignConnection(connection.name));
        }
        let name = connection.name.clone();
        let id = self.staged.connect(connection)?;
        self.operations += 1;
        tracing::debug!("Staged connection {} as {:?}", name, id);
        Ok(id)
    }

    /// Remove a body's incoming connection together with its DoFs
    ///
    /// The body stays registered but parentless; it has to be attached again
    /// before the scope ends unless it is meant to become the root.
    pub fn detach(&mut self, child: BodyId) -> Result<Connection, StructureError> {
        let connection = self.staged.disconnect(child)?;
        self.operations += 1;
        tracing::debug!("Detached {:?} from {:?}", child, connection.parent);
        Ok(connection)
    }

    /// Move a body (and its subtree) under a new parent
    ///
    /// The incoming connection is rebuilt with the same variant, axis, origin
    /// and limits; its DoFs are allocated anew.
    pub fn reparent(&mut self, child: BodyId, new_parent: BodyId) -> WorldResult<ConnectionId> {
        if self.staged.body(new_parent).is_none() {
            return Err(StructureError::BodyNotFound(new_parent).into());
        }
        if self.staged.is_ancestor(child, new_parent) {
            return Err(StructureError::WouldCreateCycle {
                parent: new_parent,
                child,
            }
            .into());
        }

        let template = self
            .staged
            .parent_connection(child)
            .ok_or(StructureError::NoParent(child))?;
        let builder = ConnectionBuilder::from_template(new_parent, child, template, &self.staged);

        self.detach(child)?;
        let connection = builder.create_with_dofs(self)?;
        Ok(self.add_connection(connection)?)
    }

    /// Allocate a DoF for a connection under construction
    pub(crate) fn allocate_dof(
        &mut self,
        name: PrefixedName,
        limits: DofLimits,
    ) -> Result<DofId, StructureError> {
        let id = self.staged.insert_dof(name, limits)?;
        self.operations += 1;
        Ok(id)
    }

    /// Set a DoF position inside the scope
    pub fn set_dof_position(&mut self, id: DofId, position: f32) -> WorldResult<()> {
        self.staged.set_dof_position(id, position)
    }

    /// Register an annotation in the type index
    pub fn add_semantic_annotation<T: Annotation>(&mut self, annotation: T) -> AnnotationRef<T> {
        let id = AnnotationId(self.staged.annotations.len() as u32);
        tracing::debug!("Registered {:?} annotation {} as {:?}", T::TYPE, annotation.name(), id);
        self.staged.annotation_index.register(id, T::TYPE, T::CAPABILITIES);
        self.staged.annotations.push(annotation.into());
        self.operations += 1;
        AnnotationRef::new(id)
    }

    /// Mutable access to a staged annotation
    pub fn resolve_mut<T: Annotation>(&mut self, handle: AnnotationRef<T>) -> WorldResult<&mut T> {
        self.staged
            .annotations
            .get_mut(handle.id().0 as usize)
            .and_then(T::from_annotation_mut)
            .ok_or(WorldError::UnknownAnnotation(handle.id()))
    }
}

impl Deref for WorldEdit<'_> {
    type Target = KinematicTree;

    fn deref(&self) -> &Self::Target {
        &self.staged
    }
}

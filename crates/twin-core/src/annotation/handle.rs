//! Handles mounted on doors and drawers

use crate::connection::ConnectionBuilder;
use crate::error::{DomainValidationError, WorldResult};
use crate::types::{PrefixedName, Scale};
use crate::world::{BodyId, World, WorldEdit};

use super::{AnnotationRef, create_body_with_connection, single_body_annotation, validate_scale};

/// Something to grasp when opening a door or drawer
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
    /// Wall thickness of the grip
    pub thickness: f32,
}

single_body_annotation!(Handle, [HasBody]);

impl Handle {
    pub const DEFAULT_SCALE: Scale = Scale::new(0.05, 0.1, 0.02);
    pub const DEFAULT_THICKNESS: f32 = 0.005;

    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
        thickness: f32,
    ) -> WorldResult<AnnotationRef<Handle>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent, scale, thickness))
    }

    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
        thickness: f32,
    ) -> WorldResult<AnnotationRef<Handle>> {
        let name = name.into();
        validate_scale(scale)?;
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(DomainValidationError::InvalidThickness(thickness).into());
        }

        let body = create_body_with_connection(edit, name.clone(), parent, ConnectionBuilder::fixed)?;
        tracing::info!("Created handle {}", name);
        Ok(edit.add_semantic_annotation(Handle {
            name,
            body,
            scale,
            thickness,
        }))
    }
}

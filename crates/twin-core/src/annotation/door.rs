//! Door leaves

use glam::Vec3;

use crate::config::DoorDimensionLimits;
use crate::connection::ConnectionBuilder;
use crate::error::{DomainValidationError, WorldResult};
use crate::types::{PrefixedName, Scale};
use crate::world::{BodyId, World, WorldEdit};

use super::{
    AnnotationRef, Handle, Hinge, attach_fixed, create_body_with_connection, insert_mechanism,
    single_body_annotation,
};

/// A thin, tall panel that swings on a hinge
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
    pub hinge: Option<AnnotationRef<Hinge>>,
    pub handle: Option<AnnotationRef<Handle>>,
}

single_body_annotation!(Door, [HasBody, HasHinge, HasHandle]);

impl Door {
    pub const DEFAULT_SCALE: Scale = Scale::new(0.03, 1.0, 2.0);

    /// A door must be thin against both its height and width, and taller than wide
    pub fn validate_dimensions(
        scale: Scale,
        limits: &DoorDimensionLimits,
    ) -> Result<(), DomainValidationError> {
        let thin = scale.depth() / scale.height() < limits.max_depth_to_height
            && scale.depth() / scale.width() < limits.max_depth_to_width;
        let tall = scale.width() / scale.height() < limits.max_width_to_height;

        if scale.is_positive() && thin && tall {
            Ok(())
        } else {
            Err(DomainValidationError::InvalidDoorDimensions { scale })
        }
    }

    /// Create a door body fixed to `parent` in its own edit scope
    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Door>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent, scale))
    }

    /// Create a door body fixed to `parent` inside an open edit scope
    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Door>> {
        let name = name.into();
        Self::validate_dimensions(scale, &edit.config().door)?;

        let body = create_body_with_connection(edit, name.clone(), parent, ConnectionBuilder::fixed)?;
        tracing::info!("Created door {} ({:?})", name, scale);
        Ok(edit.add_semantic_annotation(Door {
            name,
            body,
            scale,
            hinge: None,
            handle: None,
        }))
    }
}

impl AnnotationRef<Door> {
    /// Hang the door on `hinge`; see [`AnnotationRef::add_hinge_in`]
    pub fn add_hinge(self, world: &mut World, hinge: AnnotationRef<Hinge>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_hinge_in(edit, hinge))
    }

    /// Make the hinge body the door body's parent via a revolute connection
    ///
    /// Works whether the hinge was created next to the door or below it; in
    /// both cases the result is `former_parent -> hinge -> door`.
    pub fn add_hinge_in(self, edit: &mut WorldEdit<'_>, hinge: AnnotationRef<Hinge>) -> WorldResult<()> {
        let door_body = edit.resolve(self)?.body;
        let hinge_body = edit.resolve(hinge)?.body;
        let mechanisms = edit.config().mechanisms;
        let axis = Vec3::from(mechanisms.hinge_axis);

        insert_mechanism(edit, door_body, hinge_body, |builder| {
            builder.revolute(axis).limits(mechanisms.hinge_limits)
        })?;
        edit.resolve_mut(self)?.hinge = Some(hinge);
        Ok(())
    }

    /// Mount `handle` on the door; see [`AnnotationRef::add_handle_in`]
    pub fn add_handle(self, world: &mut World, handle: AnnotationRef<Handle>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_handle_in(edit, handle))
    }

    /// Re-attach the handle body to the door body with a fixed connection
    pub fn add_handle_in(self, edit: &mut WorldEdit<'_>, handle: AnnotationRef<Handle>) -> WorldResult<()> {
        let door_body = edit.resolve(self)?.body;
        let handle_body = edit.resolve(handle)?.body;

        attach_fixed(edit, handle_body, door_body)?;
        edit.resolve_mut(self)?.handle = Some(handle);
        Ok(())
    }
}

//! Drawers sliding out of a case
//!
//! A drawer is its own case body; the slider it is added to carries it on a
//! prismatic connection.

use glam::Vec3;

use crate::connection::ConnectionBuilder;
use crate::error::WorldResult;
use crate::types::{PrefixedName, Scale};
use crate::world::{BodyId, World, WorldEdit};

use super::{
    AnnotationRef, HasCase, Handle, Slider, attach_fixed, create_body_with_connection,
    insert_mechanism, single_body_annotation, validate_scale,
};

/// A box that slides out of a case
#[derive(Debug, Clone, PartialEq)]
pub struct Drawer {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
    pub slider: Option<AnnotationRef<Slider>>,
    pub handle: Option<AnnotationRef<Handle>>,
}

single_body_annotation!(Drawer, [HasBody, HasCase, HasSlider, HasHandle]);

impl HasCase for Drawer {
    fn case_body(&self) -> BodyId {
        self.body
    }

    fn case_scale(&self) -> Scale {
        self.scale
    }
}

impl Drawer {
    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Drawer>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent, scale))
    }

    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Drawer>> {
        let name = name.into();
        validate_scale(scale)?;

        let body = create_body_with_connection(edit, name.clone(), parent, ConnectionBuilder::fixed)?;
        tracing::info!("Created drawer {} ({:?})", name, scale);
        Ok(edit.add_semantic_annotation(Drawer {
            name,
            body,
            scale,
            slider: None,
            handle: None,
        }))
    }
}

impl AnnotationRef<Drawer> {
    pub fn add_slider(self, world: &mut World, slider: AnnotationRef<Slider>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_slider_in(edit, slider))
    }

    /// Make the slider body the drawer body's parent via a prismatic connection
    ///
    /// Converges to `former_parent -> slider -> drawer` for either creation
    /// order of the slider.
    pub fn add_slider_in(self, edit: &mut WorldEdit<'_>, slider: AnnotationRef<Slider>) -> WorldResult<()> {
        let drawer_body = edit.resolve(self)?.body;
        let slider_body = edit.resolve(slider)?.body;
        let mechanisms = edit.config().mechanisms;
        let axis = Vec3::from(mechanisms.slider_axis);

        insert_mechanism(edit, drawer_body, slider_body, |builder| {
            builder.prismatic(axis).limits(mechanisms.slider_limits)
        })?;
        edit.resolve_mut(self)?.slider = Some(slider);
        Ok(())
    }

    pub fn add_handle(self, world: &mut World, handle: AnnotationRef<Handle>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_handle_in(edit, handle))
    }

    /// Re-attach the handle body to the drawer body with a fixed connection
    pub fn add_handle_in(self, edit: &mut WorldEdit<'_>, handle: AnnotationRef<Handle>) -> WorldResult<()> {
        let drawer_body = edit.resolve(self)?.body;
        let handle_body = edit.resolve(handle)?.body;

        attach_fixed(edit, handle_body, drawer_body)?;
        edit.resolve_mut(self)?.handle = Some(handle);
        Ok(())
    }
}

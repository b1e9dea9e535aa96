//! Furniture with a case: fridges and dressers

use crate::connection::ConnectionBuilder;
use crate::error::WorldResult;
use crate::types::{PrefixedName, Scale};
use crate::world::{BodyId, World, WorldEdit};

use super::{
    AnnotationRef, Door, Drawer, create_body_with_connection, single_body_annotation, validate_scale,
};

/// Annotations whose body is a container case
pub trait HasCase {
    fn case_body(&self) -> BodyId;
    fn case_scale(&self) -> Scale;
}

/// A cooled case closed by doors
#[derive(Debug, Clone, PartialEq)]
pub struct Fridge {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
    pub doors: Vec<AnnotationRef<Door>>,
}

single_body_annotation!(Fridge, [HasBody, HasCase, HasDoors]);

impl HasCase for Fridge {
    fn case_body(&self) -> BodyId {
        self.body
    }

    fn case_scale(&self) -> Scale {
        self.scale
    }
}

impl Fridge {
    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Fridge>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent, scale))
    }

    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Fridge>> {
        let name = name.into();
        validate_scale(scale)?;

        let body = create_body_with_connection(edit, name.clone(), parent, ConnectionBuilder::fixed)?;
        tracing::info!("Created fridge {} ({:?})", name, scale);
        Ok(edit.add_semantic_annotation(Fridge {
            name,
            body,
            scale,
            doors: Vec::new(),
        }))
    }
}

impl AnnotationRef<Fridge> {
    pub fn add_door(self, world: &mut World, door: AnnotationRef<Door>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_door_in(edit, door))
    }

    /// Mount a door (with its hinge, if any) on the fridge case
    pub fn add_door_in(self, edit: &mut WorldEdit<'_>, door: AnnotationRef<Door>) -> WorldResult<()> {
        let case_body = edit.resolve(self)?.body;
        mount_door(edit, case_body, door)?;

        let doors = &mut edit.resolve_mut(self)?.doors;
        if !doors.contains(&door) {
            doors.push(door);
        }
        Ok(())
    }
}

/// A case holding drawers and doors
#[derive(Debug, Clone, PartialEq)]
pub struct Dresser {
    pub name: PrefixedName,
    pub body: BodyId,
    pub scale: Scale,
    pub doors: Vec<AnnotationRef<Door>>,
    pub drawers: Vec<AnnotationRef<Drawer>>,
}

single_body_annotation!(Dresser, [HasBody, HasCase, HasDoors, HasDrawers]);

impl HasCase for Dresser {
    fn case_body(&self) -> BodyId {
        self.body
    }

    fn case_scale(&self) -> Scale {
        self.scale
    }
}

impl Dresser {
    pub fn create_with_new_body_in_world(
        world: &mut World,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Dresser>> {
        let name = name.into();
        world.scoped_edit(|edit| Self::create_with_new_body(edit, name, parent, scale))
    }

    pub fn create_with_new_body(
        edit: &mut WorldEdit<'_>,
        name: impl Into<PrefixedName>,
        parent: BodyId,
        scale: Scale,
    ) -> WorldResult<AnnotationRef<Dresser>> {
        let name = name.into();
        validate_scale(scale)?;

        let body = create_body_with_connection(edit, name.clone(), parent, ConnectionBuilder::fixed)?;
        tracing::info!("Created dresser {} ({:?})", name, scale);
        Ok(edit.add_semantic_annotation(Dresser {
            name,
            body,
            scale,
            doors: Vec::new(),
            drawers: Vec::new(),
        }))
    }
}

impl AnnotationRef<Dresser> {
    pub fn add_door(self, world: &mut World, door: AnnotationRef<Door>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_door_in(edit, door))
    }

    pub fn add_door_in(self, edit: &mut WorldEdit<'_>, door: AnnotationRef<Door>) -> WorldResult<()> {
        let case_body = edit.resolve(self)?.body;
        mount_door(edit, case_body, door)?;

        let doors = &mut edit.resolve_mut(self)?.doors;
        if !doors.contains(&door) {
            doors.push(door);
        }
        Ok(())
    }

    pub fn add_drawer(self, world: &mut World, drawer: AnnotationRef<Drawer>) -> WorldResult<()> {
        world.scoped_edit(|edit| self.add_drawer_in(edit, drawer))
    }

    /// Mount a drawer (with its slider, if any) in the dresser case
    pub fn add_drawer_in(self, edit: &mut WorldEdit<'_>, drawer: AnnotationRef<Drawer>) -> WorldResult<()> {
        let case_body = edit.resolve(self)?.body;
        let (drawer_body, slider) = {
            let d = edit.resolve(drawer)?;
            (d.body, d.slider)
        };
        let slider_body = match slider {
            Some(slider) => Some(edit.resolve(slider)?.body),
            None => None,
        };
        let assembly = assembly_root(edit, drawer_body, slider_body);
        mount(edit, case_body, assembly)?;

        let drawers = &mut edit.resolve_mut(self)?.drawers;
        if !drawers.contains(&drawer) {
            drawers.push(drawer);
        }
        Ok(())
    }
}

fn mount_door(edit: &mut WorldEdit<'_>, case_body: BodyId, door: AnnotationRef<Door>) -> WorldResult<()> {
    let (door_body, hinge) = {
        let d = edit.resolve(door)?;
        (d.body, d.hinge)
    };
    let hinge_body = match hinge {
        Some(hinge) => Some(edit.resolve(hinge)?.body),
        None => None,
    };
    let assembly = assembly_root(edit, door_body, hinge_body);
    mount(edit, case_body, assembly)
}

/// The mechanism body when it carries `body`, else `body` itself
fn assembly_root(edit: &WorldEdit<'_>, body: BodyId, mechanism: Option<BodyId>) -> BodyId {
    match mechanism {
        Some(mechanism) if edit.parent_body(body) == Some(mechanism) => mechanism,
        _ => body,
    }
}

/// Move `assembly` under the case, keeping its connection variant
fn mount(edit: &mut WorldEdit<'_>, case_body: BodyId, assembly: BodyId) -> WorldResult<()> {
    if edit.parent_body(assembly) == Some(case_body) {
        return Ok(());
    }
    edit.reparent(assembly, case_body)?;
    Ok(())
}

//! Paired door leaves

use crate::error::{DomainValidationError, WorldResult};
use crate::types::PrefixedName;
use crate::world::{BodyId, World, WorldEdit};

use super::{Annotation, AnnotationRef, AnnotationType, Door, SemanticAnnotation};

/// Two doors opening as a pair
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleDoor {
    pub name: PrefixedName,
    pub left_door: AnnotationRef<Door>,
    pub right_door: AnnotationRef<Door>,
    /// Bodies of the left and right leaf, cached at registration
    door_bodies: [BodyId; 2],
}

impl Annotation for DoubleDoor {
    const TYPE: AnnotationType = AnnotationType::DoubleDoor;
    const CAPABILITIES: &'static [AnnotationType] = &[];

    fn name(&self) -> &PrefixedName {
        &self.name
    }

    fn bodies(&self) -> Vec<BodyId> {
        self.door_bodies.to_vec()
    }

    fn from_annotation(annotation: &SemanticAnnotation) -> Option<&Self> {
        match annotation {
            SemanticAnnotation::DoubleDoor(a) => Some(a),
            _ => None,
        }
    }

    fn from_annotation_mut(annotation: &mut SemanticAnnotation) -> Option<&mut Self> {
        match annotation {
            SemanticAnnotation::DoubleDoor(a) => Some(a),
            _ => None,
        }
    }
}

impl From<DoubleDoor> for SemanticAnnotation {
    fn from(annotation: DoubleDoor) -> Self {
        SemanticAnnotation::DoubleDoor(annotation)
    }
}

impl DoubleDoor {
    /// Register a pair of existing doors; the tree is not changed
    pub fn create_with_left_right_door_in_world(
        world: &mut World,
        left: AnnotationRef<Door>,
        right: AnnotationRef<Door>,
    ) -> WorldResult<AnnotationRef<DoubleDoor>> {
        world.scoped_edit(|edit| Self::create_with_left_right_door(edit, left, right))
    }

    pub fn create_with_left_right_door(
        edit: &mut WorldEdit<'_>,
        left: AnnotationRef<Door>,
        right: AnnotationRef<Door>,
    ) -> WorldResult<AnnotationRef<DoubleDoor>> {
        if left == right {
            return Err(DomainValidationError::DuplicateDoors.into());
        }
        let left_door = edit.resolve(left)?;
        let right_door = edit.resolve(right)?;
        let name = PrefixedName {
            name: format!("{}_{}", left_door.name.name, right_door.name.name),
            prefix: left_door.name.prefix.clone(),
        };
        let door_bodies = [left_door.body, right_door.body];

        tracing::info!("Created double door {}", name);
        Ok(edit.add_semantic_annotation(DoubleDoor {
            name,
            left_door: left,
            right_door: right,
            door_bodies,
        }))
    }

    /// Bodies of the left and right leaf
    pub fn door_bodies(&self) -> [BodyId; 2] {
        self.door_bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorldError;
    use crate::world::Body;

    #[test]
    fn test_double_door_does_not_touch_topology() {
        let mut world = World::new();
        let root = world
            .scoped_edit(|edit| Ok(edit.add_body(Body::new("root"))?))
            .unwrap();
        let left = Door::create_with_new_body_in_world(&mut world, "left_door", root, Door::DEFAULT_SCALE).unwrap();
        let right = Door::create_with_new_body_in_world(&mut world, "right_door", root, Door::DEFAULT_SCALE).unwrap();
        let connections = world.connection_count();

        let double = DoubleDoor::create_with_left_right_door_in_world(&mut world, left, right).unwrap();

        assert_eq!(world.connection_count(), connections);
        assert_eq!(world.get_semantic_annotations_by_type(AnnotationType::DoubleDoor), vec![double.id()]);
        let resolved = world.resolve(double).unwrap();
        assert_eq!(resolved.left_door, left);
        assert_eq!(resolved.name.name, "left_door_right_door");

        let err = DoubleDoor::create_with_left_right_door_in_world(&mut world, left, left).unwrap_err();
        assert_eq!(err, WorldError::Domain(DomainValidationError::DuplicateDoors));
    }
}

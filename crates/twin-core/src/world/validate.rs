//! Whole-graph validation run when an edit scope ends

use std::collections::HashSet;

use crate::error::StructureError;

use super::{BodyId, KinematicTree};

impl KinematicTree {
    /// Validate the tree
    ///
    /// Checks that there is at most one root, that every body is reachable
    /// from it by exactly one path, that connection endpoints and the cached
    /// parent/child links agree, and that every DoF is owned by exactly one
    /// connection. Annotations must reference bodies of this tree and appear
    /// under exactly the tags they implement.
    pub fn validate(&self) -> Result<(), Vec<StructureError>> {
        let mut errors = Vec::new();

        // Check connection endpoints and cached links
        for (id, connection) in &self.connections {
            let (Some(parent), Some(child)) =
                (self.body(connection.parent), self.body(connection.child))
            else {
                errors.push(StructureError::Inconsistent(format!(
                    "connection {} references a body outside the world",
                    connection.name
                )));
                continue;
            };
            if child.parent_connection != Some(*id) {
                errors.push(StructureError::Inconsistent(format!(
                    "{} is not the parent connection of {}",
                    connection.name, child.name
                )));
            }
            if !parent.child_connections.contains(id) {
                errors.push(StructureError::Inconsistent(format!(
                    "{} is missing from the children of {}",
                    connection.name, parent.name
                )));
            }
        }

        for (body_id, body) in self.bodies() {
            if let Some(connection_id) = body.parent_connection {
                match self.connections.get(&connection_id) {
                    Some(c) if c.child == body_id => {}
                    _ => errors.push(StructureError::Inconsistent(format!(
                        "{} points at a parent connection that does not lead to it",
                        body.name
                    ))),
                }
            }
        }

        // Check for a single root
        let roots: Vec<BodyId> = self
            .bodies()
            .filter(|(_, b)| b.parent_connection.is_none())
            .map(|(id, _)| id)
            .collect();
        if roots.len() > 1 {
            errors.push(StructureError::MultipleRoots(roots.clone()));
        }

        // Check reachability (catches cycles detached from the root)
        if let [root] = roots.as_slice() {
            let mut reachable = HashSet::new();
            self.collect_reachable(*root, &mut reachable);
            if reachable.len() != self.bodies.len() {
                errors.push(StructureError::Inconsistent(format!(
                    "{} of {} bodies are not reachable from the root",
                    self.bodies.len() - reachable.len(),
                    self.bodies.len()
                )));
            }
        } else if roots.is_empty() && !self.bodies.is_empty() {
            errors.push(StructureError::Inconsistent(
                "every body has a parent, the tree is cyclic".to_string(),
            ));
        }

        // Check DoF ownership
        for (dof_id, dof) in &self.dofs {
            let owners = self
                .connections
                .values()
                .filter(|c| c.dofs().contains(dof_id))
                .count();
            match owners {
                0 => errors.push(StructureError::OrphanDof(dof.name.clone())),
                1 => {}
                _ => errors.push(StructureError::Inconsistent(format!(
                    "degree of freedom {} is shared by {} connections",
                    dof.name, owners
                ))),
            }
        }
        for connection in self.connections.values() {
            for dof in connection.dofs() {
                if !self.dofs.contains_key(&dof) {
                    errors.push(StructureError::Inconsistent(format!(
                        "connection {} references unknown degree of freedom {:?}",
                        connection.name, dof
                    )));
                }
            }
        }

        // Check annotation references
        for (_, annotation) in self.annotations() {
            for body in annotation.bodies() {
                if self.body(body).is_none() {
                    errors.push(StructureError::Inconsistent(format!(
                        "annotation {} references a body outside the world",
                        annotation.name()
                    )));
                }
            }
        }

        // Check the type index against the annotations it lists
        for (id, annotation) in self.annotations() {
            let tags = std::iter::once(annotation.annotation_type())
                .chain(annotation.capabilities().iter().copied());
            for tag in tags {
                if !self.annotation_index.get(tag).contains(&id) {
                    errors.push(StructureError::Inconsistent(format!(
                        "annotation {} missing from the {:?} index",
                        annotation.name(),
                        tag
                    )));
                }
            }
        }
        for (tag, ids) in self.annotation_index.entries() {
            for id in ids {
                if !self.annotation(*id).is_some_and(|a| a.implements(tag)) {
                    errors.push(StructureError::Inconsistent(format!(
                        "{:?} index lists {:?}, which does not implement it",
                        tag, id
                    )));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn collect_reachable(&self, body: BodyId, reachable: &mut HashSet<BodyId>) {
        if !reachable.insert(body) {
            return; // Already visited
        }
        for child in self.child_bodies(body) {
            self.collect_reachable(child, reachable);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationType, Wall};
    use crate::types::Scale;
    use crate::world::{AnnotationId, Body};

    fn tree_with_wall(tag: AnnotationType) -> KinematicTree {
        let mut tree = KinematicTree::default();
        let body = tree.insert_body(Body::new("wall")).unwrap();
        tree.annotations.push(
            Wall {
                name: "wall".into(),
                body,
                scale: Scale::new(0.1, 4.0, 2.5),
            }
            .into(),
        );
        tree.annotation_index.register(AnnotationId(0), tag, &[AnnotationType::HasBody]);
        tree
    }

    #[test]
    fn test_empty_tree_is_valid() {
        assert!(KinematicTree::default().validate().is_ok());
    }

    #[test]
    fn test_orphan_body_reported() {
        let mut tree = KinematicTree::default();
        tree.insert_body(Body::new("a")).unwrap();
        tree.insert_body(Body::new("b")).unwrap();
        let errors = tree.validate().unwrap_err();
        assert!(matches!(errors[0], StructureError::MultipleRoots(ref r) if r.len() == 2));
    }

    #[test]
    fn test_annotation_index_checked() {
        assert!(tree_with_wall(AnnotationType::Wall).validate().is_ok());

        let errors = tree_with_wall(AnnotationType::Door).validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, StructureError::Inconsistent(_))));
    }
}

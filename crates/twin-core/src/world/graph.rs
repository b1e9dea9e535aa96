//! Graph operations for the kinematic tree (add, connect, disconnect)

use crate::connection::Connection;
use crate::dof::DegreeOfFreedom;
use crate::error::StructureError;
use crate::types::{DofLimits, PrefixedName};

use super::{Body, BodyId, ConnectionId, DofId, KinematicTree};

impl KinematicTree {
    /// Add a free-standing body
    pub(crate) fn insert_body(&mut self, body: Body) -> Result<BodyId, StructureError> {
        if self.body_name_index.contains_key(&body.name) {
            return Err(StructureError::DuplicateBody(body.name));
        }

        let id = BodyId(self.bodies.len() as u32);
        self.body_name_index.insert(body.name.clone(), id);
        self.bodies.push(Body {
            parent_connection: None,
            child_connections: Vec::new(),
            ..body
        });
        Ok(id)
    }

    /// Allocate a DoF that a connection will claim
    pub(crate) fn insert_dof(
        &mut self,
        name: PrefixedName,
        limits: DofLimits,
    ) -> Result<DofId, StructureError> {
        if self.dof_name_index.contains_key(&name) {
            return Err(StructureError::DuplicateDof(name));
        }

        let id = DofId(self.next_dof);
        self.next_dof += 1;
        self.dof_name_index.insert(name.clone(), id);
        self.dofs.insert(id, DegreeOfFreedom::new(name, limits));
        Ok(id)
    }

    /// Connect two bodies with a connection
    pub(crate) fn connect(&mut self, connection: Connection) -> Result<ConnectionId, StructureError> {
        let (parent, child) = (connection.parent, connection.child);

        // Validate bodies exist
        if self.body(parent).is_none() {
            return Err(StructureError::BodyNotFound(parent));
        }
        if self.body(child).is_none() {
            return Err(StructureError::BodyNotFound(child));
        }
        if parent == child {
            return Err(StructureError::SelfConnection(child));
        }

        // Check if child already has a parent
        if self.bodies[child.0 as usize].parent_connection.is_some() {
            return Err(StructureError::AlreadyHasParent(child));
        }

        // Check for cycles
        if self.would_create_cycle(parent, child) {
            return Err(StructureError::WouldCreateCycle { parent, child });
        }

        for dof in connection.dofs() {
            if !self.dofs.contains_key(&dof) {
                return Err(StructureError::Inconsistent(format!(
                    "connection {} references unknown degree of freedom {:?}",
                    connection.name, dof
                )));
            }
            if self.dof_owner(dof).is_some() {
                return Err(StructureError::Inconsistent(format!(
                    "degree of freedom {:?} is already owned by another connection",
                    dof
                )));
            }
        }

        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;

        self.bodies[parent.0 as usize].child_connections.push(id);
        self.bodies[child.0 as usize].parent_connection = Some(id);
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Disconnect a body from its parent, dropping the connection's DoFs
    pub(crate) fn disconnect(&mut self, child: BodyId) -> Result<Connection, StructureError> {
        let body = self
            .bodies
            .get_mut(child.0 as usize)
            .ok_or(StructureError::BodyNotFound(child))?;
        let connection_id = body
            .parent_connection
            .take()
            .ok_or(StructureError::NoParent(child))?;

        let connection = self
            .connections
            .remove(&connection_id)
            .ok_or(StructureError::ConnectionNotFound(connection_id))?;

        if let Some(parent) = self.bodies.get_mut(connection.parent.0 as usize) {
            parent.child_connections.retain(|id| *id != connection_id);
        }

        for dof in connection.dofs() {
            if let Some(removed) = self.dofs.remove(&dof) {
                self.dof_name_index.remove(&removed.name);
            }
        }

        Ok(connection)
    }

    /// Check if connecting parent to child would create a cycle
    pub(crate) fn would_create_cycle(&self, parent: BodyId, child: BodyId) -> bool {
        // Check if child is an ancestor of parent
        self.is_ancestor(child, parent)
    }

    /// The registered connection that claims a DoF, if any
    pub(crate) fn dof_owner(&self, dof: DofId) -> Option<ConnectionId> {
        self.connections
            .iter()
            .find(|(_, c)| c.dofs().contains(&dof))
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionKind;
    use crate::types::Pose;

    fn fixed(tree: &KinematicTree, parent: BodyId, child: BodyId) -> Connection {
        Connection::new_unchecked(
            format!("{}_T_{}", tree.bodies[parent.0 as usize].name, tree.bodies[child.0 as usize].name).into(),
            parent,
            child,
            Pose::default(),
            ConnectionKind::Fixed,
        )
    }

    #[test]
    fn test_duplicate_body_rejected() {
        let mut tree = KinematicTree::default();
        tree.insert_body(Body::new("a")).unwrap();
        let err = tree.insert_body(Body::new("a")).unwrap_err();
        assert_eq!(err, StructureError::DuplicateBody("a".into()));
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut tree = KinematicTree::default();
        let a = tree.insert_body(Body::new("a")).unwrap();
        let b = tree.insert_body(Body::new("b")).unwrap();

        let c = fixed(&tree, a, b);
        tree.connect(c).unwrap();
        assert_eq!(tree.parent_body(b), Some(a));
        assert_eq!(tree.child_bodies(a), vec![b]);

        let removed = tree.disconnect(b).unwrap();
        assert_eq!(removed.parent, a);
        assert_eq!(tree.parent_body(b), None);
        assert!(tree.child_bodies(a).is_empty());
        assert_eq!(tree.disconnect(b).unwrap_err(), StructureError::NoParent(b));
    }

    #[test]
    fn test_second_parent_rejected() {
        let mut tree = KinematicTree::default();
        let a = tree.insert_body(Body::new("a")).unwrap();
        let b = tree.insert_body(Body::new("b")).unwrap();
        let c = tree.insert_body(Body::new("c")).unwrap();

        tree.connect(fixed(&tree, a, c)).unwrap();
        let err = tree.connect(fixed(&tree, b, c)).unwrap_err();
        assert_eq!(err, StructureError::AlreadyHasParent(c));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = KinematicTree::default();
        let a = tree.insert_body(Body::new("a")).unwrap();
        let b = tree.insert_body(Body::new("b")).unwrap();
        let c = tree.insert_body(Body::new("c")).unwrap();

        tree.connect(fixed(&tree, a, b)).unwrap();
        tree.connect(fixed(&tree, b, c)).unwrap();
        let err = tree.connect(fixed(&tree, c, a)).unwrap_err();
        assert_eq!(err, StructureError::WouldCreateCycle { parent: c, child: a });
        assert_eq!(
            tree.connect(fixed(&tree, a, a)).unwrap_err(),
            StructureError::SelfConnection(a)
        );
    }

    #[test]
    fn test_duplicate_dof_rejected() {
        let mut tree = KinematicTree::default();
        tree.insert_dof("q".into(), DofLimits::default()).unwrap();
        assert_eq!(
            tree.insert_dof("q".into(), DofLimits::default()).unwrap_err(),
            StructureError::DuplicateDof("q".into())
        );
    }
}

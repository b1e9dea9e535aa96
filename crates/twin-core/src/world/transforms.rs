//! Forward kinematics: composing connection transforms from the root

use std::collections::HashMap;

use glam::Mat4;

use super::{BodyId, ConnectionId, KinematicTree};

impl KinematicTree {
    /// Parent-to-child transform of a connection at the current DoF positions
    pub fn connection_transform(&self, id: ConnectionId) -> Option<Mat4> {
        self.connections
            .get(&id)
            .map(|c| c.transform(|dof| self.dofs.get(&dof).map(|d| d.position).unwrap_or(0.0)))
    }

    /// Get the pose of a body relative to the root
    pub fn root_t_body(&self, body: BodyId) -> Mat4 {
        // Apply transforms from root to body
        self.chain_to_root(body)
            .into_iter()
            .rev()
            .filter_map(|id| self.body(id).and_then(|b| b.parent_connection))
            .filter_map(|c| self.connection_transform(c))
            .fold(Mat4::IDENTITY, |acc, t| acc * t)
    }

    /// Compute the pose of every body reachable from the root
    pub fn compute_forward_kinematics(&self) -> HashMap<BodyId, Mat4> {
        let mut poses = HashMap::with_capacity(self.bodies.len());
        if let Some(root) = self.root() {
            self.forward_kinematics_recursive(root, Mat4::IDENTITY, &mut poses);
        }
        poses
    }

    fn forward_kinematics_recursive(
        &self,
        body: BodyId,
        transform: Mat4,
        poses: &mut HashMap<BodyId, Mat4>,
    ) {
        if poses.insert(body, transform).is_some() {
            return;
        }

        let Some(children) = self.body(body).map(|b| b.child_connections.clone()) else {
            return;
        };
        for connection_id in children {
            if let (Some(connection), Some(local)) = (
                self.connections.get(&connection_id),
                self.connection_transform(connection_id),
            ) {
                self.forward_kinematics_recursive(connection.child, transform * local, poses);
            }
        }
    }
}

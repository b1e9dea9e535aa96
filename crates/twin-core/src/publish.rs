//! Visualization sinks
//!
//! A publisher receives read-only snapshots of a world. Failures to deliver
//! are the publisher's concern and never propagate into the world model.

use glam::Mat4;

use crate::world::World;

/// Receives world snapshots for visualization
pub trait WorldPublisher: Send + Sync {
    /// Publish the current state of `world` stamped with `time` (seconds)
    fn publish(&self, world: &World, time: f64);
}

/// Publishes body poses as `tracing` events
#[derive(Debug, Clone)]
pub struct TracingPublisher {
    target_frame: String,
}

impl Default for TracingPublisher {
    fn default() -> Self {
        Self::new("map")
    }
}

impl TracingPublisher {
    pub fn new(target_frame: impl Into<String>) -> Self {
        Self {
            target_frame: target_frame.into(),
        }
    }

    pub fn target_frame(&self) -> &str {
        &self.target_frame
    }

    /// Body names with their root-relative translation, in insertion order
    pub fn snapshot(world: &World) -> Vec<(String, [f32; 3])> {
        let poses = world.compute_forward_kinematics();
        world
            .bodies()
            .filter_map(|(id, body)| {
                poses
                    .get(&id)
                    .map(|pose: &Mat4| (body.name.to_string(), pose.w_axis.truncate().to_array()))
            })
            .collect()
    }
}

impl WorldPublisher for TracingPublisher {
    fn publish(&self, world: &World, time: f64) {
        let snapshot = Self::snapshot(world);
        if snapshot.len() != world.body_count() {
            tracing::warn!(
                "Publishing {} of {} bodies of {}, the rest are unreachable",
                snapshot.len(),
                world.body_count(),
                world.name
            );
        }

        for (name, translation) in snapshot {
            tracing::debug!(
                frame = %self.target_frame,
                time,
                body = %name,
                x = translation[0],
                y = translation[1],
                z = translation[2],
                "body pose"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use crate::world::Body;

    #[test]
    fn test_snapshot_lists_every_body() {
        let mut world = World::new();
        world
            .scoped_edit(|edit| {
                let root = edit.add_body(Body::new("root"))?;
                let tip = edit.add_body(Body::new("tip"))?;
                let c = Connection::builder(root, tip).xyz(0.0, 0.0, 1.5).create_with_dofs(edit)?;
                edit.add_connection(c)?;
                Ok(())
            })
            .unwrap();

        let publisher = TracingPublisher::default();
        publisher.publish(&world, 0.0);

        let snapshot = TracingPublisher::snapshot(&world);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1], ("tip".to_string(), [0.0, 0.0, 1.5]));
    }
}

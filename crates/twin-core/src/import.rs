//! URDF import
//!
//! Builds a [`World`] from a URDF description: links become bodies, joints
//! become connections. The whole tree is staged in one edit scope, so a
//! description that fails validation never yields a partial world.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec3;

use crate::config::TwinConfig;
use crate::connection::{Connection, ConnectionBuilder};
use crate::error::{StructureError, WorldError};
use crate::types::{DofLimits, Pose};
use crate::world::{Body, World};

/// Errors that can occur during URDF import
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse URDF: {0}")]
    UrdfParse(String),

    #[error("Empty URDF: no links defined")]
    EmptyUrdf,

    #[error("Link not found: {0}")]
    LinkNotFound(String),

    #[error("Joint {joint} has unsupported type {joint_type}")]
    UnsupportedJoint { joint: String, joint_type: String },

    #[error("Invalid kinematic structure: {0}")]
    Structure(StructureError),

    #[error(transparent)]
    World(WorldError),
}

impl From<StructureError> for ParseError {
    fn from(e: StructureError) -> Self {
        ParseError::Structure(e)
    }
}

impl From<WorldError> for ParseError {
    fn from(e: WorldError) -> Self {
        match e {
            WorldError::Structure(e) => ParseError::Structure(e),
            other => ParseError::World(other),
        }
    }
}

/// Parse a URDF document into a new world with default configuration
pub fn parse_urdf(source: &str) -> Result<World, ParseError> {
    parse_urdf_with_config(source, TwinConfig::default())
}

pub fn parse_urdf_with_config(source: &str, config: TwinConfig) -> Result<World, ParseError> {
    let robot = urdf_rs::read_from_string(source).map_err(|e| ParseError::UrdfParse(e.to_string()))?;
    build_world(&robot, config)
}

/// Read and parse a URDF file
pub fn parse_urdf_file(path: &Path) -> Result<World, ParseError> {
    let robot = urdf_rs::read_file(path).map_err(|e| ParseError::UrdfParse(e.to_string()))?;
    tracing::info!("Parsed URDF {:?} ({} links, {} joints)", path, robot.links.len(), robot.joints.len());
    build_world(&robot, TwinConfig::default())
}

fn build_world(robot: &urdf_rs::Robot, config: TwinConfig) -> Result<World, ParseError> {
    if robot.links.is_empty() {
        return Err(ParseError::EmptyUrdf);
    }

    let link_names: HashSet<&str> = robot.links.iter().map(|l| l.name.as_str()).collect();
    let mut builders = Vec::with_capacity(robot.joints.len());
    for urdf_joint in &robot.joints {
        for link in [&urdf_joint.parent.link, &urdf_joint.child.link] {
            if !link_names.contains(link.as_str()) {
                return Err(ParseError::LinkNotFound(link.clone()));
            }
        }
        builders.push(configure_joint(urdf_joint)?);
    }

    // Root link first (the link that is not a child of any joint)
    let child_links: HashSet<&str> = robot.joints.iter().map(|j| j.child.link.as_str()).collect();
    let mut links: Vec<&urdf_rs::Link> = robot.links.iter().collect();
    links.sort_by_key(|l| child_links.contains(l.name.as_str()));

    let mut world = World::with_config(config);
    world.name = robot.name.clone();

    world.scoped_edit(|edit| {
        for link in &links {
            edit.add_body(Body::new(link.name.as_str()))?;
        }

        for (urdf_joint, configure) in robot.joints.iter().zip(builders) {
            let parent = edit
                .body_by_name(&urdf_joint.parent.link.as_str().into())
                .ok_or_else(|| StructureError::Inconsistent(format!("link {} vanished", urdf_joint.parent.link)))?;
            let child = edit
                .body_by_name(&urdf_joint.child.link.as_str().into())
                .ok_or_else(|| StructureError::Inconsistent(format!("link {} vanished", urdf_joint.child.link)))?;

            let connection = configure(Connection::builder(parent, child)).create_with_dofs(edit)?;
            edit.add_connection(connection)?;
        }
        Ok(())
    })?;

    tracing::info!(
        "Imported URDF robot {} ({} bodies, {} connections)",
        world.name,
        world.body_count(),
        world.connection_count()
    );
    Ok(world)
}

type JointConfig = Box<dyn FnOnce(ConnectionBuilder) -> ConnectionBuilder>;

/// Map a URDF joint onto a connection builder step
fn configure_joint(urdf_joint: &urdf_rs::Joint) -> Result<JointConfig, ParseError> {
    let name = urdf_joint.name.clone();
    let origin = Pose::from(&urdf_joint.origin);
    let axis = Vec3::new(
        urdf_joint.axis.xyz.0[0] as f32,
        urdf_joint.axis.xyz.0[1] as f32,
        urdf_joint.axis.xyz.0[2] as f32,
    );
    let limit = &urdf_joint.limit;
    let limits = DofLimits {
        lower: limit.lower as f32,
        upper: limit.upper as f32,
        effort: limit.effort as f32,
        velocity: limit.velocity as f32,
    };
    // URDF leaves both bounds at zero when the limit tag is omitted
    let limits = (limits.lower < limits.upper).then_some(limits);

    let step: JointConfig = match urdf_joint.joint_type {
        urdf_rs::JointType::Fixed => Box::new(move |b: ConnectionBuilder| b.name(name).origin(origin).fixed()),
        urdf_rs::JointType::Revolute => Box::new(move |b: ConnectionBuilder| {
            with_limits(b.name(name).origin(origin).revolute(axis), limits)
        }),
        urdf_rs::JointType::Continuous => {
            let velocity = limit.velocity as f32;
            Box::new(move |b: ConnectionBuilder| {
                b.name(name)
                    .origin(origin)
                    .revolute(axis)
                    .limits(DofLimits::unbounded(velocity))
            })
        }
        urdf_rs::JointType::Prismatic => Box::new(move |b: ConnectionBuilder| {
            with_limits(b.name(name).origin(origin).prismatic(axis), limits)
        }),
        ref other => {
            return Err(ParseError::UnsupportedJoint {
                joint: urdf_joint.name.clone(),
                joint_type: format!("{:?}", other),
            });
        }
    };
    Ok(step)
}

fn with_limits(builder: ConnectionBuilder, limits: Option<DofLimits>) -> ConnectionBuilder {
    match limits {
        Some(limits) => builder.limits(limits),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::connection::ConnectionType;
    use crate::types::PrefixedName;

    const ARM: &str = r#"
        <robot name="arm">
          <link name="base"/>
          <link name="upper"/>
          <link name="tool"/>
          <joint name="wrist" type="fixed">
            <parent link="upper"/>
            <child link="tool"/>
            <origin xyz="0.3 0 0" rpy="0 0 0"/>
          </joint>
          <joint name="shoulder" type="revolute">
            <parent link="base"/>
            <child link="upper"/>
            <origin xyz="0 0 0.5" rpy="0 0 0"/>
            <axis xyz="0 0 1"/>
            <limit lower="-1.0" upper="1.0" effort="10" velocity="2"/>
          </joint>
        </robot>
    "#;

    #[test]
    fn test_parse_builds_tree() {
        let world = parse_urdf(ARM).unwrap();
        assert_eq!(world.name, "arm");
        assert_eq!(world.body_count(), 3);

        let base = world.body_by_name(&PrefixedName::new("base")).unwrap();
        let upper = world.body_by_name(&PrefixedName::new("upper")).unwrap();
        let tool = world.body_by_name(&PrefixedName::new("tool")).unwrap();
        assert_eq!(world.root(), Some(base));
        assert_eq!(world.parent_body(tool), Some(upper));

        let shoulder = world.parent_connection(upper).unwrap();
        assert_eq!(shoulder.name.name, "shoulder");
        assert_eq!(shoulder.connection_type(), ConnectionType::Revolute);
        let dof = world.dof(shoulder.dofs()[0]).unwrap();
        assert_eq!(dof.name.name, "shoulder_angle");
        assert_eq!(dof.limits.upper, 1.0);

        let p = world.root_t_body(tool).transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 0.3, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_floating_joint_rejected() {
        let urdf = r#"
            <robot name="free">
              <link name="a"/>
              <link name="b"/>
              <joint name="float" type="floating">
                <parent link="a"/>
                <child link="b"/>
              </joint>
            </robot>
        "#;
        assert!(matches!(
            parse_urdf(urdf),
            Err(ParseError::UnsupportedJoint { joint, .. }) if joint == "float"
        ));
    }

    #[test]
    fn test_missing_link_and_second_root() {
        let dangling = r#"
            <robot name="r">
              <link name="a"/>
              <joint name="j" type="fixed">
                <parent link="a"/>
                <child link="ghost"/>
              </joint>
            </robot>
        "#;
        assert_eq!(parse_urdf(dangling).unwrap_err(), ParseError::LinkNotFound("ghost".to_string()));

        let two_roots = r#"
            <robot name="r">
              <link name="a"/>
              <link name="b"/>
            </robot>
        "#;
        assert!(matches!(
            parse_urdf(two_roots),
            Err(ParseError::Structure(StructureError::MultipleRoots(_)))
        ));
    }
}

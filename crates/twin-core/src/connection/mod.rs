//! Connections: typed edges between a parent and a child body
//!
//! A connection owns the degrees of freedom its variant needs and maps them
//! to a parent-to-child transform: `origin * motion(q)`.

mod builder;

pub use builder::ConnectionBuilder;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WorldResult;
use crate::types::{Pose, PrefixedName};
use crate::world::{BodyId, DofId, WorldEdit};

/// Connection variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConnectionType {
    #[default]
    Fixed,
    Revolute,
    Prismatic,
    OmniDrive,
}

impl ConnectionType {
    /// Number of DoFs the variant allocates
    pub fn dof_count(&self) -> usize {
        match self {
            ConnectionType::Fixed => 0,
            ConnectionType::Revolute | ConnectionType::Prismatic => 1,
            ConnectionType::OmniDrive => 3,
        }
    }
}

/// Variant data of a connection, including the DoFs it owns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConnectionKind {
    Fixed,
    Revolute { axis: Vec3, dof: DofId },
    Prismatic { axis: Vec3, dof: DofId },
    /// Planar base: translation in x/y followed by a yaw rotation
    OmniDrive { x: DofId, y: DofId, yaw: DofId },
}

impl ConnectionKind {
    pub fn connection_type(&self) -> ConnectionType {
        match self {
            ConnectionKind::Fixed => ConnectionType::Fixed,
            ConnectionKind::Revolute { .. } => ConnectionType::Revolute,
            ConnectionKind::Prismatic { .. } => ConnectionType::Prismatic,
            ConnectionKind::OmniDrive { .. } => ConnectionType::OmniDrive,
        }
    }

    pub fn dofs(&self) -> Vec<DofId> {
        match *self {
            ConnectionKind::Fixed => Vec::new(),
            ConnectionKind::Revolute { dof, .. } | ConnectionKind::Prismatic { dof, .. } => vec![dof],
            ConnectionKind::OmniDrive { x, y, yaw } => vec![x, y, yaw],
        }
    }

    /// Motion part of the transform for the given DoF positions
    pub fn motion(&self, position_of: impl Fn(DofId) -> f32) -> Mat4 {
        match *self {
            ConnectionKind::Fixed => Mat4::IDENTITY,
            ConnectionKind::Revolute { axis, dof } => {
                Mat4::from_quat(Quat::from_axis_angle(axis, position_of(dof)))
            }
            ConnectionKind::Prismatic { axis, dof } => Mat4::from_translation(axis * position_of(dof)),
            ConnectionKind::OmniDrive { x, y, yaw } => Mat4::from_rotation_translation(
                Quat::from_rotation_z(position_of(yaw)),
                Vec3::new(position_of(x), position_of(y), 0.0),
            ),
        }
    }
}

/// A directed edge from a parent body to a child body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub name: PrefixedName,
    /// World whose edit scope created this connection
    world: Uuid,
    pub parent: BodyId,
    pub child: BodyId,
    /// Constant transform from the parent body to the connection frame
    pub origin: Pose,
    pub kind: ConnectionKind,
}

impl Connection {
    pub(crate) fn new(
        world: Uuid,
        name: PrefixedName,
        parent: BodyId,
        child: BodyId,
        origin: Pose,
        kind: ConnectionKind,
    ) -> Self {
        Self {
            name,
            world,
            parent,
            child,
            origin,
            kind,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(
        name: PrefixedName,
        parent: BodyId,
        child: BodyId,
        origin: Pose,
        kind: ConnectionKind,
    ) -> Self {
        Self::new(Uuid::nil(), name, parent, child, origin, kind)
    }

    /// Create a builder for constructing connections with fluent API
    pub fn builder(parent: BodyId, child: BodyId) -> ConnectionBuilder {
        ConnectionBuilder::new(parent, child)
    }

    /// Create a fixed connection (no DoFs)
    pub fn fixed_with_dofs(edit: &mut WorldEdit<'_>, parent: BodyId, child: BodyId) -> WorldResult<Self> {
        Self::builder(parent, child).fixed().create_with_dofs(edit)
    }

    /// Create a revolute connection with one angle DoF
    pub fn revolute_with_dofs(
        edit: &mut WorldEdit<'_>,
        parent: BodyId,
        child: BodyId,
        axis: Vec3,
    ) -> WorldResult<Self> {
        Self::builder(parent, child).revolute(axis).create_with_dofs(edit)
    }

    /// Create a prismatic connection with one offset DoF
    pub fn prismatic_with_dofs(
        edit: &mut WorldEdit<'_>,
        parent: BodyId,
        child: BodyId,
        axis: Vec3,
    ) -> WorldResult<Self> {
        Self::builder(parent, child).prismatic(axis).create_with_dofs(edit)
    }

    /// Create a planar base connection with `x`, `y` and `yaw` DoFs
    pub fn omni_drive_with_dofs(
        edit: &mut WorldEdit<'_>,
        parent: BodyId,
        child: BodyId,
    ) -> WorldResult<Self> {
        Self::builder(parent, child).omni_drive().create_with_dofs(edit)
    }

    pub fn world_id(&self) -> Uuid {
        self.world
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.kind.connection_type()
    }

    pub fn dofs(&self) -> Vec<DofId> {
        self.kind.dofs()
    }

    /// Joint axis (for revolute/prismatic)
    pub fn axis(&self) -> Option<Vec3> {
        match self.kind {
            ConnectionKind::Revolute { axis, .. } | ConnectionKind::Prismatic { axis, .. } => Some(axis),
            _ => None,
        }
    }

    /// Parent-to-child transform for arbitrary DoF positions
    ///
    /// Positions outside the DoF limits are evaluated as given.
    pub fn transform(&self, position_of: impl Fn(DofId) -> f32) -> Mat4 {
        self.origin.to_mat4() * self.kind.motion(position_of)
    }
}

//! Builder for connections; the terminal step allocates the DoFs

use glam::Vec3;

use crate::error::{StructureError, WorldResult};
use crate::types::{DofLimits, Pose, PrefixedName};
use crate::world::{BodyId, KinematicTree, WorldEdit};

use super::{Connection, ConnectionKind, ConnectionType};

/// Builder for creating connections with fluent API
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    name: Option<PrefixedName>,
    connection_type: ConnectionType,
    parent: BodyId,
    child: BodyId,
    origin: Pose,
    axis: Vec3,
    limits: Option<DofLimits>,
    /// Limits per DoF when rebuilding an existing connection
    template_limits: Vec<DofLimits>,
}

impl ConnectionBuilder {
    /// Create a new connection builder
    pub fn new(parent: BodyId, child: BodyId) -> Self {
        Self {
            name: None,
            connection_type: ConnectionType::Fixed,
            parent,
            child,
            origin: Pose::default(),
            axis: Vec3::Z,
            limits: None,
            template_limits: Vec::new(),
        }
    }

    /// Start from an existing connection, for a new parent
    pub(crate) fn from_template(
        parent: BodyId,
        child: BodyId,
        template: &Connection,
        tree: &KinematicTree,
    ) -> Self {
        let template_limits = template
            .dofs()
            .into_iter()
            .filter_map(|dof| tree.dof(dof).map(|d| d.limits))
            .collect();

        Self {
            name: None,
            connection_type: template.connection_type(),
            parent,
            child,
            origin: template.origin,
            axis: template.axis().unwrap_or(Vec3::Z),
            limits: None,
            template_limits,
        }
    }

    /// Override the derived `<parent>_T_<child>` name
    pub fn name(mut self, name: impl Into<PrefixedName>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the connection type
    pub fn connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    /// Set as a fixed connection
    pub fn fixed(mut self) -> Self {
        self.connection_type = ConnectionType::Fixed;
        self
    }

    /// Set as a revolute connection about `axis`
    pub fn revolute(mut self, axis: Vec3) -> Self {
        self.connection_type = ConnectionType::Revolute;
        self.axis(axis)
    }

    /// Set as a prismatic connection along `axis`
    pub fn prismatic(mut self, axis: Vec3) -> Self {
        self.connection_type = ConnectionType::Prismatic;
        self.axis(axis)
    }

    /// Set as a planar omni drive
    pub fn omni_drive(mut self) -> Self {
        self.connection_type = ConnectionType::OmniDrive;
        self
    }

    /// Set the connection origin
    pub fn origin(mut self, pose: Pose) -> Self {
        self.origin = pose;
        self
    }

    /// Set the connection origin position
    pub fn xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.origin.xyz = [x, y, z];
        self
    }

    /// Set the connection origin rotation (roll, pitch, yaw)
    pub fn rpy(mut self, roll: f32, pitch: f32, yaw: f32) -> Self {
        self.origin.rpy = [roll, pitch, yaw];
        self
    }

    /// Set the axis; a zero axis falls back to Z
    pub fn axis(mut self, axis: Vec3) -> Self {
        self.axis = axis.try_normalize().unwrap_or(Vec3::Z);
        self
    }

    /// Set the limits of the revolute/prismatic DoF
    pub fn limits(mut self, limits: DofLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set limits with a range
    pub fn limits_range(mut self, lower: f32, upper: f32) -> Self {
        self.limits = Some(DofLimits::with_range(lower, upper));
        self
    }

    /// Allocate the DoFs and build the connection
    ///
    /// DoF names derive from the child body's name, unique because a body has
    /// one incoming connection, or from the explicit connection name when one
    /// was given. The connection is not registered: pass it to
    /// [`WorldEdit::add_connection`].
    pub fn create_with_dofs(self, edit: &mut WorldEdit<'_>) -> WorldResult<Connection> {
        let parent = edit
            .body(self.parent)
            .ok_or(StructureError::BodyNotFound(self.parent))?;
        let child = edit
            .body(self.child)
            .ok_or(StructureError::BodyNotFound(self.child))?;

        // `<parent>_T_<child>` is not unique once body names contain `_T_`
        let dof_base = self.name.clone().unwrap_or_else(|| child.name.clone());
        let name = self.name.clone().unwrap_or_else(|| PrefixedName {
            name: format!("{}_T_{}", parent.name.name, child.name.name),
            prefix: child.name.prefix.clone(),
        });

        let config = edit.config();
        let (revolute_limits, prismatic_limits) = (config.revolute_limits, config.prismatic_limits);
        let omni = config.omni_drive;
        let limits_at = |i: usize, fallback: DofLimits| {
            self.template_limits
                .get(i)
                .copied()
                .or(self.limits)
                .unwrap_or(fallback)
        };

        let kind = match self.connection_type {
            ConnectionType::Fixed => ConnectionKind::Fixed,
            ConnectionType::Revolute => ConnectionKind::Revolute {
                axis: self.axis,
                dof: edit.allocate_dof(dof_base.child("angle"), limits_at(0, revolute_limits))?,
            },
            ConnectionType::Prismatic => ConnectionKind::Prismatic {
                axis: self.axis,
                dof: edit.allocate_dof(dof_base.child("offset"), limits_at(0, prismatic_limits))?,
            },
            ConnectionType::OmniDrive => {
                let translation = DofLimits::unbounded(omni.translation_velocity);
                let rotation = DofLimits::unbounded(omni.yaw_velocity);
                ConnectionKind::OmniDrive {
                    x: edit.allocate_dof(dof_base.child("x"), limits_at(0, translation))?,
                    y: edit.allocate_dof(dof_base.child("y"), limits_at(1, translation))?,
                    yaw: edit.allocate_dof(dof_base.child("yaw"), limits_at(2, rotation))?,
                }
            }
        };

        Ok(Connection::new(
            edit.world_id(),
            name,
            self.parent,
            self.child,
            self.origin,
            kind,
        ))
    }
}

//! Role and scope checks for every privileged operation.
//!
//! `Actor` collapses the (role, moderator_type) pair into a sum type so that
//! invalid combinations (a student with a moderator type, a moderator
//! without one) cannot be represented past the authentication boundary.

use uuid::Uuid;

use crate::models::{ModeratorType, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Coordinator,
    Monitor,
    Student,
}

impl Actor {
    /// Derive the actor from a stored or token-carried role pair. Fails on
    /// combinations the data model forbids.
    pub fn from_parts(role: Role, moderator_type: Option<ModeratorType>) -> Result<Self, String> {
        match (role, moderator_type) {
            (Role::Admin, None) => Ok(Actor::Admin),
            (Role::Student, None) => Ok(Actor::Student),
            (Role::Moderator, Some(ModeratorType::Coordinator)) => Ok(Actor::Coordinator),
            (Role::Moderator, Some(ModeratorType::Monitor)) => Ok(Actor::Monitor),
            (role, mtype) => Err(format!("invalid role combination: {role:?}/{mtype:?}")),
        }
    }

    pub fn is_admin(self) -> bool {
        self == Actor::Admin
    }

    pub fn is_moderator(self) -> bool {
        matches!(self, Actor::Coordinator | Actor::Monitor)
    }
}

/// Only students request reservations; moderators and admins manage them.
pub fn can_create_reservation(actor: Actor) -> bool {
    actor == Actor::Student
}

/// Admins resolve any reservation; moderators only those on labs they manage.
pub fn can_resolve_reservation(actor: Actor, scope: &[Uuid], lab_id: Uuid) -> bool {
    match actor {
        Actor::Admin => true,
        Actor::Coordinator | Actor::Monitor => scope.contains(&lab_id),
        Actor::Student => false,
    }
}

/// Lab creation and deletion is admin-only.
pub fn can_manage_labs(actor: Actor) -> bool {
    actor.is_admin()
}

/// Linking a moderator to a lab: admins anywhere; coordinators may only link
/// monitors, and only to labs inside their own scope.
pub fn can_link_moderator(
    actor: Actor,
    actor_scope: &[Uuid],
    target: Actor,
    lab_id: Uuid,
) -> bool {
    match actor {
        Actor::Admin => target.is_moderator(),
        Actor::Coordinator => target == Actor::Monitor && actor_scope.contains(&lab_id),
        Actor::Monitor | Actor::Student => false,
    }
}

/// Unlinking follows the same rule: a coordinator may never remove another
/// coordinator, even inside their own scope.
pub fn can_unlink_moderator(
    actor: Actor,
    actor_scope: &[Uuid],
    target: Actor,
    lab_id: Uuid,
) -> bool {
    can_link_moderator(actor, actor_scope, target, lab_id)
}

/// Admins register any role; coordinators only students and monitors.
pub fn can_register_user(actor: Actor, new_user: Actor) -> bool {
    match actor {
        Actor::Admin => true,
        Actor::Coordinator => matches!(new_user, Actor::Student | Actor::Monitor),
        Actor::Monitor | Actor::Student => false,
    }
}

/// User deletion is admin-only, and never of the admin's own account.
pub fn can_delete_user(actor: Actor, actor_id: Uuid, target_id: Uuid) -> bool {
    actor.is_admin() && actor_id != target_id
}

/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Permission checks shared by the commands.

use crate::{
    types::{AccountId, GrantablePermission, Permission},
    world_state::StateRead,
};

/// The actor may act on `target` if it is the target and holds `own`, if the target granted it
/// `grantable`, or if it holds Root.
pub(crate) fn can_act_on<R: StateRead + ?Sized>(
    state: &R,
    actor: &AccountId,
    target: &AccountId,
    own: Permission,
    grantable: GrantablePermission,
) -> bool {
    (actor == target && state.has_permission(actor, own))
        || state.has_grantable(actor, target, grantable)
        || state.has_permission(actor, Permission::Root)
}

/// Writing details to one's own account needs no permission.
pub(crate) fn can_set_detail<R: StateRead + ?Sized>(
    state: &R,
    actor: &AccountId,
    target: &AccountId,
) -> bool {
    actor == target
        || state.has_permission(actor, Permission::SetDetail)
        || state.has_grantable(actor, target, GrantablePermission::SetMyAccountDetail)
}

/// True if the actor holds every permission in `permissions`, or Root.
pub(crate) fn holds_all<'p, R: StateRead + ?Sized>(
    state: &R,
    actor: &AccountId,
    permissions: impl IntoIterator<Item = &'p Permission>,
) -> bool {
    let held = state.account_permissions(actor);
    held.contains(&Permission::Root) || permissions.into_iter().all(|p| held.contains(p))
}

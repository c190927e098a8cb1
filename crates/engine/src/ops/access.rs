use crate::{Actor, EngineError, ResultEngine};

/// Admins may touch any record; staff only the ones they created.
pub(super) fn ensure_can_modify(actor: &Actor, created_by: &str) -> ResultEngine<()> {
    if actor.is_admin() || actor.username == created_by {
        return Ok(());
    }
    Err(EngineError::Forbidden(format!(
        "{} may not modify records created by {created_by}",
        actor.username
    )))
}

pub(super) fn require_admin(actor: &Actor) -> ResultEngine<()> {
    if actor.is_admin() {
        return Ok(());
    }
    Err(EngineError::Forbidden(
        "admin role required".to_string(),
    ))
}

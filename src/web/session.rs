use actix_session::Session;

use crate::error::Result;
use crate::service::Actor;

const SESSION_KEY: &str = "user";

/// The actor stored in the request's session cookie, if any.
pub fn current_user(session: &Session) -> Option<Actor> {
    session.get::<Actor>(SESSION_KEY).ok().flatten()
}

pub fn sign_in(session: &Session, actor: &Actor) -> Result<()> {
    session.insert(SESSION_KEY, actor)?;
    Ok(())
}

pub fn sign_out(session: &Session) {
    session.purge();
}

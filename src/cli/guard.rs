//! Access guard for protected commands.
//!
//! One check per command, before any network call. A token that goes stale
//! between this check and the request is caught by the API client's 401
//! hook, not here.

use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// A token is present; run the command.
    Authorized,
    /// No token; the command must not run and the user is pointed at login.
    LoginRequired,
}

pub fn check(session: &SessionStore) -> Access {
    if session.is_authenticated() {
        Access::Authorized
    } else {
        Access::LoginRequired
    }
}

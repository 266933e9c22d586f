//! Per-user session context: bearer token and cached CSRF token

use std::sync::{Mutex, PoisonError};

/// Credentials shared by every request of one client.
///
/// The CSRF token is fetched on first use by the transport and dropped on
/// logout or when the server reports the session as invalid.
#[derive(Debug, Default)]
pub struct Session {
    access_token: Mutex<Option<String>>,
    csrf_token: Mutex<Option<String>>,
}

impl Session {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token: Mutex::new(access_token),
            csrf_token: Mutex::new(None),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store_csrf_token(&self, token: String) {
        *self.csrf_token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn invalidate_csrf_token(&self) {
        *self.csrf_token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Forget all credentials.
    pub fn logout(&self) {
        self.set_access_token(None);
        self.invalidate_csrf_token();
        log::debug!("Session cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_lifecycle() {
        let session = Session::new(Some("tok".into()));
        assert_eq!(session.csrf_token(), None);
        session.store_csrf_token("abc".into());
        assert_eq!(session.csrf_token().as_deref(), Some("abc"));
        session.invalidate_csrf_token();
        assert_eq!(session.csrf_token(), None);
        assert_eq!(session.access_token().as_deref(), Some("tok"));
    }

    #[test]
    fn logout_clears_everything() {
        let session = Session::new(Some("tok".into()));
        session.store_csrf_token("abc".into());
        session.logout();
        assert_eq!(session.access_token(), None);
        assert_eq!(session.csrf_token(), None);
    }
}

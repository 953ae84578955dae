use tracing::{debug, info, warn};

use super::state::GalleryStore;
use crate::api::{CredentialStore, GalleryApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Another load was still in flight; no request was made.
    Skipped,
    Failed,
}

/// Store, backend client and credentials, driven together by the async
/// flows. Each flow marks the store pending, awaits the backend and then
/// settles the store exactly once.
pub struct Session<C: CredentialStore> {
    pub store: GalleryStore,
    api: GalleryApi,
    pub credentials: C,
}

impl<C: CredentialStore> Session<C> {
    pub fn new(store: GalleryStore, api: GalleryApi, credentials: C) -> Self {
        Self {
            store,
            api,
            credentials,
        }
    }

    pub fn into_parts(self) -> (GalleryStore, C) {
        (self.store, self.credentials)
    }

    fn remember_access_token(&mut self, token: Option<String>) {
        if let Some(token) = token {
            debug!("access token refreshed");
            self.credentials.set_access_token(token);
        }
    }

    /// Load the current view. `is_replace` drops everything loaded so far.
    pub async fn load(&mut self, is_replace: bool) -> LoadOutcome {
        if !self.store.load_pending() {
            debug!("load of {:?} skipped, one is in flight", self.store.current_path);
            return LoadOutcome::Skipped;
        }

        let query = self.store.load_query(is_replace);
        match self.api.load(&query, &self.credentials).await {
            Ok(mut response) => {
                info!(
                    "loaded {:?}: {} albums, {} files",
                    query.path,
                    response.albums.len(),
                    response.files.len()
                );
                self.remember_access_token(response.access_token.take());
                self.store.load_fulfilled(is_replace, response);
                LoadOutcome::Loaded
            }
            Err(err) => {
                warn!("load of {:?} failed: {}", query.path, err);
                self.store.load_rejected();
                LoadOutcome::Failed
            }
        }
    }

    /// Exchange an identity-provider token for a session.
    pub async fn login(&mut self, google_token: &str) -> bool {
        self.store.login_pending();

        let reply = match self.api.login(google_token, &self.credentials).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("login failed: {}", err);
                self.store.login_rejected();
                return false;
            }
        };

        if !reply.is_success() {
            warn!("login rejected with {}", reply.status);
            self.store.login_rejected();
            return false;
        }

        let body = reply.body.unwrap_or_default();
        if let Some(csrf) = body.csrf {
            self.credentials.set_csrf(csrf);
        }
        self.remember_access_token(body.access_token.or(reply.access_token));
        info!(
            "logged in as {}",
            body.user.as_ref().map_or("<unknown>", |user| user.email.as_str())
        );
        self.store.login_fulfilled(body.user);
        true
    }

    pub async fn logout(&mut self) -> bool {
        self.store.logout_pending();

        match self.api.logout(&self.credentials).await {
            Ok(reply) if reply.is_success() => {
                self.credentials.forget();
                self.store.logout_fulfilled();
                info!("logged out");
                true
            }
            Ok(reply) => {
                warn!("logout rejected with {}", reply.status);
                self.store.logout_rejected();
                false
            }
            Err(err) => {
                warn!("logout failed: {}", err);
                self.store.logout_rejected();
                false
            }
        }
    }

    /// Send the pending queue. The queue is cleared only when the backend
    /// accepts it; otherwise it stays for another attempt.
    pub async fn commit(&mut self) -> bool {
        if self.store.changes.is_empty() {
            debug!("nothing to commit");
            self.store.edit_fulfilled(true);
            return true;
        }

        let pending = self.store.changes.len();
        match self.api.edit(&self.store.changes, &self.credentials).await {
            Ok(reply) => {
                let is_success = reply.is_success();
                self.remember_access_token(reply.access_token);
                if is_success {
                    info!("committed {} changes", pending);
                } else {
                    warn!("commit rejected with {}", reply.status);
                }
                self.store.edit_fulfilled(is_success);
                is_success
            }
            Err(err) => {
                warn!("commit failed: {}", err);
                self.store.edit_fulfilled(false);
                false
            }
        }
    }
}

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::gallery::{Album, Changes, FileDto, User};

/// Response header the backend uses to hand out a fresh access token.
pub const ACCESS_TOKEN_HEADER: &str = "access-token";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// How requests prove the session: an `Authorization: Bearer` access token
/// or the CSRF token returned by login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Bearer,
    Csrf,
}

/// Where the client keeps its credentials between requests.
pub trait CredentialStore {
    fn access_token(&self) -> Option<&str>;
    fn csrf(&self) -> Option<&str>;
    fn set_access_token(&mut self, token: String);
    fn set_csrf(&mut self, csrf: String);
    /// Drop everything, e.g. after logout.
    fn forget(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCredentials {
    pub access_token: Option<String>,
    pub csrf: Option<String>,
}

impl CredentialStore for MemoryCredentials {
    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn csrf(&self) -> Option<&str> {
        self.csrf.as_deref()
    }

    fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    fn set_csrf(&mut self, csrf: String) {
        self.csrf = Some(csrf);
    }

    fn forget(&mut self) {
        self.access_token = None;
        self.csrf = None;
    }
}

/// Raw outcome of a request: status, body when it parsed, and the access
/// token header when present.
#[derive(Debug)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: Option<T>,
    pub access_token: Option<String>,
}

impl<T> Reply<T> {
    pub fn is_success(&self) -> bool {
        self.status.as_u16() < 400
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeMode {
    Only,
    Include,
}

impl HomeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeMode::Only => "only",
            HomeMode::Include => "include",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadQuery {
    pub path: String,
    pub home: Option<HomeMode>,
    pub token: String,
    pub date_ranges: String,
}

impl LoadQuery {
    pub fn path(&self) -> String {
        format!("/get/{}", self.path)
    }

    /// Query pairs; empty values are left out.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(home) = self.home {
            params.push(("home", home.as_str()));
        }
        if !self.token.is_empty() {
            params.push(("token", self.token.as_str()));
        }
        if !self.date_ranges.is_empty() {
            params.push(("date-ranges", self.date_ranges.as_str()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub files: Vec<FileDto>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub csrf: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    token: &'a str,
}

pub struct GalleryApi {
    client: Client,
    base_url: String,
    auth_mode: AuthMode,
}

impl GalleryApi {
    pub fn new(client: Client, base_url: &str, auth_mode: AuthMode) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_mode,
        }
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    fn request<C: CredentialStore>(
        &self,
        method: Method,
        path: &str,
        credentials: &C,
    ) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        match self.auth_mode {
            AuthMode::Bearer => match credentials.access_token() {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            },
            AuthMode::Csrf => match credentials.csrf() {
                Some(csrf) => builder.header(CSRF_HEADER, csrf),
                None => builder,
            },
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        label: &str,
    ) -> Result<Reply<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let access_token = response
            .headers()
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let bytes = response.bytes().await?;
        // Status-only endpoints answer with an empty or non-JSON body.
        let body = serde_json::from_slice(&bytes).ok();
        debug!("{} -> {}", label, status);

        Ok(Reply {
            status,
            body,
            access_token,
        })
    }

    /// Fetch the albums and files for `query`. A token from the response
    /// header is folded into the body when the body has none.
    pub async fn load<C: CredentialStore>(
        &self,
        query: &LoadQuery,
        credentials: &C,
    ) -> Result<LoadResponse, ApiError> {
        let path = query.path();
        let builder = self
            .request(Method::GET, &path, credentials)
            .query(&query.params());
        let reply: Reply<LoadResponse> = self.send(builder, &format!("GET {}", path)).await?;

        if !reply.is_success() {
            warn!("GET {} failed: {}", path, reply.status);
            return Err(ApiError::Status {
                method: "GET".to_string(),
                path,
                status: reply.status.as_u16(),
            });
        }

        let mut response = reply.body.ok_or_else(|| ApiError::EmptyBody {
            method: "GET".to_string(),
            path: path.clone(),
        })?;
        if response.access_token.is_none() {
            response.access_token = reply.access_token;
        }
        Ok(response)
    }

    pub async fn login<C: CredentialStore>(
        &self,
        google_token: &str,
        credentials: &C,
    ) -> Result<Reply<LoginResponse>, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/login", credentials)
            .json(&LoginRequest {
                token: google_token,
            });
        self.send(builder, "POST /auth/login").await
    }

    pub async fn logout<C: CredentialStore>(
        &self,
        credentials: &C,
    ) -> Result<Reply<serde_json::Value>, ApiError> {
        let builder = self.request(Method::POST, "/auth/logout", credentials);
        self.send(builder, "POST /auth/logout").await
    }

    /// Submit the whole pending queue.
    pub async fn edit<C: CredentialStore>(
        &self,
        changes: &Changes,
        credentials: &C,
    ) -> Result<Reply<serde_json::Value>, ApiError> {
        let builder = self
            .request(Method::POST, "/edit", credentials)
            .json(changes);
        self.send(builder, "POST /edit").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_params_skip_empty_values() {
        let query = LoadQuery {
            path: "trips/alps".to_string(),
            home: None,
            token: String::new(),
            date_ranges: String::new(),
        };
        assert_eq!(query.path(), "/get/trips/alps");
        assert!(query.params().is_empty());

        let query = LoadQuery {
            path: String::new(),
            home: Some(HomeMode::Only),
            token: "t".to_string(),
            date_ranges: "2023-2024".to_string(),
        };
        assert_eq!(query.path(), "/get/");
        assert_eq!(
            query.params(),
            vec![("home", "only"), ("token", "t"), ("date-ranges", "2023-2024")]
        );
    }

    #[test]
    fn test_load_response_tolerates_missing_fields() {
        let response: LoadResponse = serde_json::from_str(
            r#"{ "albums": [{ "path": "a", "title": "A" }], "files": [{ "filename": "1.jpg", "path": "a" }] }"#,
        )
        .unwrap();
        assert_eq!(response.albums[0].path, "a");
        assert_eq!(response.files[0].filename, "1.jpg");
        assert!(response.user.is_none());
        assert!(response.access_token.is_none());
    }

    #[test]
    fn test_memory_credentials_forget() {
        let mut credentials = MemoryCredentials::default();
        credentials.set_access_token("a".to_string());
        credentials.set_csrf("c".to_string());
        assert_eq!(credentials.access_token(), Some("a"));

        credentials.forget();
        assert_eq!(credentials, MemoryCredentials::default());
    }

    #[test]
    fn test_auth_mode_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            auth_mode: AuthMode,
        }
        let wrapper: Wrapper = toml::from_str(r#"auth_mode = "csrf""#).unwrap();
        assert_eq!(wrapper.auth_mode, AuthMode::Csrf);
        assert_eq!(AuthMode::default(), AuthMode::Bearer);
    }
}

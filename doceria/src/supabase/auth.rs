//! GoTrue authentication operations.
//!
//! Three calls cover the whole login lifecycle: the password grant issues a
//! session, `get_user` validates an access token and resolves it to the
//! authenticated user, and `sign_out` revokes the session server side.

use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::Supabase;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Auth API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Session issued by the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Expiry as a unix timestamp.
    ///
    /// GoTrue versions that omit `expires_at` still send `expires_in`, so
    /// derive the timestamp from the current time in that case.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
            .or_else(|| self.expires_in.map(|secs| Utc::now().timestamp() + secs))
    }
}

/// The subset of the GoTrue user record this application reads.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl Supabase {
    /// Exchange an email and password for a session.
    ///
    /// Any 4xx from GoTrue is collapsed into [`AuthError::InvalidCredentials`];
    /// the caller cannot distinguish a wrong password from a disabled user, and
    /// should not.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = self.endpoint("auth/v1/token")?;
        let response = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.service_role_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let message = error_message(response).await;
            debug!(%status, message, "Password grant rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(response.json().await?)
    }

    /// Resolve an access token to the user it belongs to.
    #[instrument(skip_all)]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .http
            .get(url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(response.json().await?)
    }

    /// Revoke the session behind an access token.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .http
            .post(url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        Ok(())
    }
}

/// Best-effort extraction of a message from a GoTrue error body.
///
/// The field name varies across GoTrue versions; newer releases use
/// `error_code`/`msg`, older ones use the OAuth-style `error_description`.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<GotrueErrorBody>().await {
        Ok(body) => body.into_message().unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    }
}

#[derive(Debug, Deserialize)]
struct GotrueErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

impl GotrueErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.error).or(self.error_code)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::SupabaseConfig;

    fn test_client(server: &MockServer) -> Supabase {
        crate::test_utils::install_crypto_provider();
        Supabase::new(&SupabaseConfig {
            url: Url::parse(&server.uri()).unwrap(),
            service_role_key: "service-key".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    const USER_ID: &str = "c56a4180-65aa-42ec-a945-5fd21dec0538";

    // Test: the password grant posts to the token endpoint with the service
    // key and parses the session it gets back.
    #[tokio::test]
    async fn password_grant_returns_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "service-key"))
            .and(body_json(json!({ "email": "ana@example.com", "password": "s3cret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-access",
                "token_type": "bearer",
                "expires_in": 3600,
                "expires_at": 1_700_003_600,
                "refresh_token": "jwt-refresh",
                "user": { "id": USER_ID, "email": "ana@example.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = test_client(&server)
            .sign_in_with_password("ana@example.com", "s3cret")
            .await
            .unwrap();

        assert_eq!(session.access_token, "jwt-access");
        assert_eq!(session.refresh_token, "jwt-refresh");
        assert_eq!(session.expires_at(), Some(1_700_003_600));
        assert_eq!(session.user.id.to_string(), USER_ID);
    }

    // Test: a session without `expires_at` falls back to now + expires_in.
    #[tokio::test]
    async fn session_expiry_derived_from_expires_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-access",
                "refresh_token": "jwt-refresh",
                "expires_in": 3600,
                "user": { "id": USER_ID }
            })))
            .mount(&server)
            .await;

        let session = test_client(&server)
            .sign_in_with_password("ana@example.com", "s3cret")
            .await
            .unwrap();

        let expires_at = session.expires_at().unwrap();
        assert!(expires_at >= Utc::now().timestamp() + 3590);
    }

    // Test: GoTrue 400s collapse into InvalidCredentials regardless of body.
    #[tokio::test]
    async fn rejected_grant_is_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_code": "invalid_credentials",
                "msg": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .sign_in_with_password("ana@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    // Test: token validation forwards the bearer token and parses the user.
    #[tokio::test]
    async fn get_user_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer user-jwt"))
            .and(header("apikey", "service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": USER_ID,
                "email": "ana@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = test_client(&server).get_user("user-jwt").await.unwrap();
        assert_eq!(user.id.to_string(), USER_ID);
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
    }

    // Test: a 401 from the user endpoint means the token is dead.
    #[tokio::test]
    async fn expired_token_is_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "msg": "JWT expired"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).get_user("stale-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    // Test: logout tolerates the empty 204 GoTrue responds with.
    #[tokio::test]
    async fn sign_out_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer user-jwt"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server).sign_out("user-jwt").await.unwrap();
    }

    #[test]
    fn error_body_prefers_description_over_code() {
        let body = GotrueErrorBody {
            error_description: Some("Invalid login credentials".to_string()),
            msg: None,
            error: Some("invalid_grant".to_string()),
            error_code: None,
        };
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));
    }
}

// Typed resource operations
//
// Read-oriented list/get operations over the authenticated session and
// the decoder. One logical page fetch per call; only the `results`
// envelope is unwrapped, never followed.

use serde_json::Value;
use tracing::debug;

use crate::client::{VictorClient, preview};
use crate::decode::{Resource, UnknownFields, decode, decode_list};
use crate::error::Error;
use crate::resources::{Activity, MobileApp, Operator, Profile, Trap, User};

/// Typed access to the Victor Smart-Kill resources.
///
/// Thin composition over [`VictorClient`]: the session owns auth and
/// retry, the decoder owns schema validation, this type owns the URL
/// templates. Errors from either layer propagate unchanged.
#[derive(Clone)]
pub struct VictorApi {
    client: VictorClient,
    unknown_fields: UnknownFields,
}

impl VictorApi {
    /// Wrap a session with the default strict unknown-field policy.
    pub fn new(client: VictorClient) -> Self {
        Self::with_unknown_fields(client, UnknownFields::default())
    }

    /// Wrap a session with an explicit unknown-field policy.
    pub fn with_unknown_fields(client: VictorClient, unknown_fields: UnknownFields) -> Self {
        Self {
            client,
            unknown_fields,
        }
    }

    /// The underlying session.
    pub fn client(&self) -> &VictorClient {
        &self.client
    }

    // ── Traps ────────────────────────────────────────────────────────

    /// List all traps. `GET traps/`
    pub async fn traps(&self) -> Result<Vec<Trap>, Error> {
        self.get_list("traps/").await
    }

    /// Get a trap by id. `GET traps/{id}/`
    pub async fn trap_by_id(&self, trap_id: i64) -> Result<Trap, Error> {
        self.trap_by_url(&format!("traps/{trap_id}/")).await
    }

    /// Get a trap by resource URL.
    pub async fn trap_by_url(&self, url: &str) -> Result<Trap, Error> {
        self.get_one(url).await
    }

    /// Activity history of one trap. `GET traps/{id}/history/`
    pub async fn trap_history(&self, trap_id: i64) -> Result<Vec<Activity>, Error> {
        self.get_list(&format!("traps/{trap_id}/history/")).await
    }

    // ── Activity logs ────────────────────────────────────────────────

    /// List activity log records. `GET activitylogs/`
    pub async fn activity_logs(&self) -> Result<Vec<Activity>, Error> {
        self.get_list("activitylogs/").await
    }

    /// Get one activity log record by id. `GET activitylogs/{id}/`
    pub async fn activity_log_record(&self, record_id: i64) -> Result<Activity, Error> {
        self.get_one(&format!("activitylogs/{record_id}/")).await
    }

    // ── Operators ────────────────────────────────────────────────────

    /// List operators. `GET operators/`
    pub async fn operators(&self) -> Result<Vec<Operator>, Error> {
        self.get_list("operators/").await
    }

    /// Get an operator by id. `GET operators/{id}/`
    pub async fn operator_by_id(&self, operator_id: i64) -> Result<Operator, Error> {
        self.operator_by_url(&format!("operators/{operator_id}/")).await
    }

    /// Get an operator by resource URL.
    pub async fn operator_by_url(&self, url: &str) -> Result<Operator, Error> {
        self.get_one(url).await
    }

    // ── Profiles ─────────────────────────────────────────────────────

    /// List profiles. `GET profiles/`
    pub async fn profiles(&self) -> Result<Vec<Profile>, Error> {
        self.get_list("profiles/").await
    }

    /// Get a profile by id. `GET profiles/{id}/`
    pub async fn profile_by_id(&self, profile_id: i64) -> Result<Profile, Error> {
        self.profile_by_url(&format!("profiles/{profile_id}/")).await
    }

    /// Get a profile by resource URL.
    pub async fn profile_by_url(&self, url: &str) -> Result<Profile, Error> {
        self.get_one(url).await
    }

    // ── Users ────────────────────────────────────────────────────────

    /// List users. `GET users/`
    pub async fn users(&self) -> Result<Vec<User>, Error> {
        self.get_list("users/").await
    }

    /// Get a user by id. `GET users/{id}/`
    pub async fn user_by_id(&self, user_id: i64) -> Result<User, Error> {
        self.user_by_url(&format!("users/{user_id}/")).await
    }

    /// Get a user by resource URL.
    pub async fn user_by_url(&self, url: &str) -> Result<User, Error> {
        self.get_one(url).await
    }

    // ── Mobile apps ──────────────────────────────────────────────────

    /// List mobile app version requirements. `GET mobileapps/`
    pub async fn mobile_apps(&self) -> Result<Vec<MobileApp>, Error> {
        self.get_list("mobileapps/").await
    }

    /// Get mobile app requirements by id. `GET mobileapps/{id}/`
    pub async fn mobile_app_by_id(&self, app_id: i64) -> Result<MobileApp, Error> {
        self.mobile_app_by_url(&format!("mobileapps/{app_id}/")).await
    }

    /// Get mobile app requirements by resource URL.
    pub async fn mobile_app_by_url(&self, url: &str) -> Result<MobileApp, Error> {
        self.get_one(url).await
    }

    // ── Fetch helpers ────────────────────────────────────────────────

    async fn get_json(&self, url: &str) -> Result<Value, Error> {
        let response = self.client.get(url).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let body = response.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::UnexpectedResponse {
            message: format!("response body is not JSON: {e}"),
        })
    }

    async fn get_list<T: Resource>(&self, url: &str) -> Result<Vec<T>, Error> {
        debug!("listing {} at {url}", T::NAME);
        let body = self.get_json(url).await?;
        decode_list(self.unknown_fields, &body)
    }

    async fn get_one<T: Resource>(&self, url: &str) -> Result<T, Error> {
        debug!("fetching {} at {url}", T::NAME);
        let body = self.get_json(url).await?;
        decode(self.unknown_fields, &body)
    }
}

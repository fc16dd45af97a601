//! VRChat API v1 adapter for the identity and group provider ports.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use url::form_urlencoded::byte_serialize;

use rollcall_application::{AuthProvider, GroupProvider, MemberPageRequest};
use rollcall_core::{AppError, AppResult, UserIdentity};
use rollcall_domain::{GroupMember, GroupRole, GroupSummary};

use self::wire::{
    CurrentUserResponse, GroupMemberResponse, GroupResponse, GroupRoleResponse,
    VerifyCodeRequest, VerifyCodeResponse,
};

mod wire;

/// Public VRChat API endpoint.
pub const DEFAULT_VRCHAT_API_BASE_URL: &str = "https://api.vrchat.cloud/api/1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Member listing order: oldest joins first, so new joins land at the end.
const MEMBER_LISTING_SORT: &str = "joinedAt:asc";

/// Connection settings for [`VrchatApiClient`].
#[derive(Clone)]
pub struct VrchatApiConfig {
    /// API root, e.g. [`DEFAULT_VRCHAT_API_BASE_URL`].
    pub base_url: String,
    /// Account username or email.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Identifying user agent required by the API.
    pub user_agent: String,
}

/// HTTP client for the VRChat API.
///
/// Holds the session cookie jar, so one instance is one logged-in session.
pub struct VrchatApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    basic_credentials: String,
}

impl VrchatApiClient {
    /// Creates a client. No request is sent until a port method is called.
    pub fn new(config: VrchatApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(config.base_url.as_str()).map_err(|error| {
            AppError::Config(format!(
                "invalid API base url '{}': {error}",
                config.base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent)
            .cookie_store(true)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            base_url,
            basic_credentials: basic_credentials(&config.username, &config.password),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::Config("API base url cannot carry a path".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|error| {
            AppError::provider(format!("failed to call {operation} endpoint: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::provider_status(
                format!(
                    "{operation} endpoint returned status {}: {body}",
                    status.as_u16()
                ),
                status.as_u16(),
            ));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Provider {
                message: format!("failed to parse {operation} response body: {error}"),
                status: Some(status.as_u16()),
            }
        })
    }
}

/// Basic credentials as VRChat expects them: each part URL-encoded before
/// base64, with spaces as `%20`.
fn basic_credentials(username: &str, password: &str) -> String {
    let encode = |value: &str| {
        byte_serialize(value.as_bytes())
            .collect::<String>()
            .replace('+', "%20")
    };
    let joined = format!("{}:{}", encode(username), encode(password));
    format!("Basic {}", STANDARD.encode(joined))
}

/// Reclassifies provider errors whose status means the credentials or code
/// were refused.
fn rejected_as_auth(error: AppError, statuses: &[u16]) -> AppError {
    match error {
        AppError::Provider {
            message,
            status: Some(status),
        } if statuses.contains(&status) => AppError::Auth(message),
        error => error,
    }
}

#[async_trait]
impl AuthProvider for VrchatApiClient {
    async fn current_identity(&self) -> AppResult<Option<UserIdentity>> {
        let url = self.endpoint(&["auth", "user"])?;
        debug!(%url, "requesting current user");

        let response: CurrentUserResponse = self
            .send_json(
                self.http_client
                    .get(url)
                    .header(header::AUTHORIZATION, self.basic_credentials.as_str()),
                "current user",
            )
            .await
            .map_err(|error| rejected_as_auth(error, &[401]))?;

        Ok(response.into_identity())
    }

    async fn verify_second_factor(&self, code: &str) -> AppResult<()> {
        let url = self.endpoint(&["auth", "twofactorauth", "totp", "verify"])?;
        debug!(%url, "submitting second factor code");

        let result = self
            .send_json::<VerifyCodeResponse>(
                self.http_client.post(url).json(&VerifyCodeRequest { code }),
                "second factor verify",
            )
            .await;

        match result.map_err(|error| rejected_as_auth(error, &[400, 401]))? {
            response if response.verified => Ok(()),
            _ => Err(AppError::Auth(
                "second factor code was not verified".to_owned(),
            )),
        }
    }
}

#[async_trait]
impl GroupProvider for VrchatApiClient {
    async fn group(&self, group_id: &str) -> AppResult<GroupSummary> {
        let url = self.endpoint(&["groups", group_id])?;
        debug!(%url, "requesting group");

        let response: GroupResponse = self.send_json(self.http_client.get(url), "group").await?;
        Ok(response.into())
    }

    async fn roles(&self, group_id: &str) -> AppResult<Vec<GroupRole>> {
        let url = self.endpoint(&["groups", group_id, "roles"])?;
        debug!(%url, "requesting group roles");

        let response: Vec<GroupRoleResponse> = self
            .send_json(self.http_client.get(url), "group roles")
            .await?;
        Ok(response.into_iter().map(GroupRole::from).collect())
    }

    async fn members(
        &self,
        group_id: &str,
        request: MemberPageRequest,
    ) -> AppResult<Vec<GroupMember>> {
        let mut url = self.endpoint(&["groups", group_id, "members"])?;
        url.query_pairs_mut()
            .append_pair("n", request.limit.to_string().as_str())
            .append_pair("offset", request.offset.to_string().as_str())
            .append_pair("sort", MEMBER_LISTING_SORT);
        debug!(%url, "requesting group members page");

        let response: Vec<GroupMemberResponse> = self
            .send_json(self.http_client.get(url), "group members")
            .await?;
        Ok(response.into_iter().map(GroupMember::from).collect())
    }
}

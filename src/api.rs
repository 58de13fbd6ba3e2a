//! Minimal Slack Web API client (read-only methods used by the exporter).

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

const SLACK_API_URL: &str = "https://slack.com/api";

/// Conversation kinds the exporter handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    /// 1:1 direct message (`im` in the Slack API).
    DirectMessage,
    /// Group direct message (`groups` in the Slack API, `mpdm-` named).
    GroupDirectMessage,
}

impl ConversationKind {
    /// Slack method that pages through history for this kind.
    pub fn history_method(self) -> &'static str {
        match self {
            ConversationKind::DirectMessage => "im.history",
            ConversationKind::GroupDirectMessage => "groups.history",
        }
    }
}

/// Identity of the calling user, from `auth.test`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthInfo {
    pub team: String,
    pub team_id: String,
    pub user: String,
    pub user_id: String,
}

/// A 1:1 direct message conversation, from `im.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectMessage {
    pub id: String,
    /// The other participant.
    pub user: String,
    pub created: i64,
}

/// A roster entry from `users.list`: the fields the exporter needs, plus
/// the verbatim object for the final user list.
#[derive(Debug, Clone)]
pub struct RosterMember {
    pub id: String,
    pub name: String,
    pub raw: Value,
}

#[derive(Deserialize)]
struct MemberFields {
    id: String,
    name: String,
}

impl RosterMember {
    fn from_value(raw: Value) -> Result<Self> {
        let fields: MemberFields = serde_json::from_value(raw.clone())?;
        Ok(Self {
            id: fields.id,
            name: fields.name,
            raw,
        })
    }
}

/// A group conversation from `groups.list`: typed fields plus the verbatim
/// object, which goes into the manifest untouched.
#[derive(Debug, Clone)]
pub struct GroupDirectMessage {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub raw: Value,
}

#[derive(Deserialize)]
struct GroupFields {
    id: String,
    name: String,
    #[serde(default)]
    members: Vec<String>,
}

impl GroupDirectMessage {
    fn from_value(raw: Value) -> Result<Self> {
        let fields: GroupFields = serde_json::from_value(raw.clone())?;
        Ok(Self {
            id: fields.id,
            name: fields.name,
            members: fields.members,
            raw,
        })
    }
}

/// One page of conversation history, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    pub messages: Vec<Value>,
    pub has_more: bool,
}

#[derive(Deserialize)]
struct UsersListResponse {
    members: Vec<Value>,
}

#[derive(Deserialize)]
struct ImListResponse {
    ims: Vec<DirectMessage>,
}

#[derive(Deserialize)]
struct GroupsListResponse {
    groups: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    /// Create client with the provided user API token.
    pub fn new<S: Into<String>>(token: S) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::InvalidArgument("API token is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent(format!("slack_exporter/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token,
            base_url: SLACK_API_URL.to_string(),
        })
    }

    /// Create client with custom base url (primarily for tests).
    pub fn with_base_url<S1: Into<String>, S2: Into<String>>(
        token: S1,
        base_url: S2,
    ) -> Result<Self> {
        let mut client = Self::new(token)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    /// Call a Web API method and deserialize its envelope.
    ///
    /// Every Slack envelope carries `ok`; when it is false the `error`
    /// field names the failure and nothing else in the payload is valid.
    async fn call<D>(&self, method: &'static str, params: &[(&str, String)]) -> Result<D>
    where
        D: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .get(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(Error::Api {
                method: method.to_string(),
                reason: format!("HTTP {}: {}", status.as_u16(), text),
            });
        }

        let envelope: Value = serde_json::from_str(&text)?;
        if !envelope.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let reason = envelope
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(Error::Api {
                method: method.to_string(),
                reason,
            });
        }

        Ok(serde_json::from_value(envelope)?)
    }

    /// Verify the token works and identify the calling user and team.
    pub async fn auth_test(&self) -> Result<AuthInfo> {
        self.call("auth.test", &[]).await.map_err(|err| match err {
            Error::Api { reason, .. } => Error::AuthFailed(reason),
            other => other,
        })
    }

    /// Full team roster.
    pub async fn users_list(&self) -> Result<Vec<RosterMember>> {
        let response: UsersListResponse = self.call("users.list", &[]).await?;
        response
            .members
            .into_iter()
            .map(RosterMember::from_value)
            .collect()
    }

    /// All direct message conversations of the calling user.
    pub async fn im_list(&self) -> Result<Vec<DirectMessage>> {
        let response: ImListResponse = self.call("im.list", &[]).await?;
        Ok(response.ims)
    }

    /// All group conversations, unfiltered (the exporter keeps `mpdm-` ones).
    pub async fn groups_list(&self) -> Result<Vec<GroupDirectMessage>> {
        let response: GroupsListResponse = self.call("groups.list", &[]).await?;
        response
            .groups
            .into_iter()
            .map(GroupDirectMessage::from_value)
            .collect()
    }

    /// One page of history older than `latest` (newest first). The lower
    /// bound is pinned to the epoch start, so pagination is unbounded
    /// backwards.
    pub async fn history(
        &self,
        kind: ConversationKind,
        channel: &str,
        latest: Option<&str>,
        count: usize,
    ) -> Result<HistoryPage> {
        let mut params = vec![
            ("channel", channel.to_string()),
            ("oldest", "0".to_string()),
            ("count", count.to_string()),
        ];
        if let Some(ts) = latest {
            params.push(("latest", ts.to_string()));
        }
        self.call(kind.history_method(), &params).await
    }
}

//! Paginated history retrieval for a single conversation.

use serde_json::Value;

use crate::api::{ConversationKind, SlackClient};
use crate::error::Result;

/// Page size used when the caller has no preference.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// The `ts` field of a message, used as the pagination cursor.
pub fn message_ts(message: &Value) -> Option<&str> {
    message.get("ts").and_then(Value::as_str)
}

/// Fetch the complete history for one conversation.
///
/// Pages backwards from the most recent message: every request asks for up
/// to `page_size` messages older than the last one accumulated so far, and
/// the loop ends when the API reports no further pages. Messages are kept
/// in received order (newest first), concatenated across pages.
///
/// Any transport or API failure aborts the fetch; there is no retry.
pub async fn fetch_history(
    client: &SlackClient,
    kind: ConversationKind,
    channel_id: &str,
    page_size: usize,
) -> Result<Vec<Value>> {
    let mut messages: Vec<Value> = Vec::new();
    let mut last_timestamp: Option<String> = None;

    loop {
        let page = client
            .history(kind, channel_id, last_timestamp.as_deref(), page_size)
            .await?;
        messages.extend(page.messages);

        if !page.has_more {
            break;
        }

        match messages.last().and_then(message_ts) {
            Some(ts) => last_timestamp = Some(ts.to_string()),
            // A continuation page without a usable cursor cannot advance.
            None => break,
        }
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> SlackClient {
        SlackClient::with_base_url("test-token", server.base_url()).expect("client")
    }

    #[test]
    fn test_message_ts_extraction() {
        assert_eq!(message_ts(&json!({ "ts": "1.000", "text": "hi" })), Some("1.000"));
        assert_eq!(message_ts(&json!({ "text": "no ts" })), None);
        assert_eq!(message_ts(&json!({ "ts": 42 })), None);
    }

    #[tokio::test]
    async fn single_page_returned_unmodified() {
        let server = MockServer::start_async().await;

        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/im.history")
                .query_param("channel", "D100")
                .query_param("oldest", "0")
                .query_param("count", "100");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [
                    { "ts": "200.000", "text": "second" },
                    { "ts": "100.000", "text": "first" }
                ],
                "has_more": false
            }));
        });

        let messages = fetch_history(
            &client(&server),
            ConversationKind::DirectMessage,
            "D100",
            DEFAULT_PAGE_SIZE,
        )
        .await
        .expect("history");

        page_mock.assert_calls(1);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["text"], json!("second"));
        assert_eq!(messages[1]["text"], json!("first"));
    }

    #[tokio::test]
    async fn paginates_with_last_accumulated_timestamp() {
        let server = MockServer::start_async().await;

        let first_page = server.mock(|when, then| {
            when.method(GET)
                .path("/groups.history")
                .query_param("channel", "G9")
                .query_param("count", "2")
                .query_param_missing("latest");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [
                    { "ts": "300.000", "text": "c" },
                    { "ts": "200.000", "text": "b" }
                ],
                "has_more": true
            }));
        });

        let second_page = server.mock(|when, then| {
            when.method(GET)
                .path("/groups.history")
                .query_param("channel", "G9")
                .query_param("latest", "200.000");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [
                    { "ts": "100.000", "text": "a" }
                ],
                "has_more": false
            }));
        });

        let messages = fetch_history(
            &client(&server),
            ConversationKind::GroupDirectMessage,
            "G9",
            2,
        )
        .await
        .expect("history");

        first_page.assert_calls(1);
        second_page.assert_calls(1);
        assert_eq!(messages.len(), 3);
        assert_eq!(message_ts(&messages[2]), Some("100.000"));
    }

    #[tokio::test]
    async fn stops_when_continuation_has_no_cursor() {
        let server = MockServer::start_async().await;

        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/im.history");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [],
                "has_more": true
            }));
        });

        let messages = fetch_history(
            &client(&server),
            ConversationKind::DirectMessage,
            "D100",
            50,
        )
        .await
        .expect("history");

        page_mock.assert_calls(1);
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn api_failure_aborts_the_fetch() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(GET).path("/im.history");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "channel_not_found" }));
        });

        let err = fetch_history(
            &client(&server),
            ConversationKind::DirectMessage,
            "D404",
            50,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("channel_not_found"));
    }
}

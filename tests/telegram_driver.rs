//! Integration tests driving the full `Driver` contract of the Telegram
//! driver, with a mock transport capturing the outbound form.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use botbridge::config::MapConfig;
use botbridge::drivers::telegram::TOKEN_CONFIG_KEY;
use botbridge::transport::{HttpTransport, TransportError, TransportResponse};
use botbridge::{Answer, Button, Driver, DriverError, Message, Question, Reply, TelegramDriver};

/// Captures every posted request and replies with a canned response.
#[derive(Default)]
struct CapturingTransport {
    posts: Mutex<Vec<(Url, BTreeMap<String, String>)>>,
    status: Option<u16>,
}

impl CapturingTransport {
    fn failing(status: u16) -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            status: Some(status),
        }
    }

    fn last_post(&self) -> (Url, BTreeMap<String, String>) {
        self.posts
            .lock()
            .expect("transport lock")
            .last()
            .cloned()
            .expect("at least one post")
    }
}

#[async_trait]
impl HttpTransport for CapturingTransport {
    async fn post(
        &self,
        url: &Url,
        form: &BTreeMap<String, String>,
    ) -> Result<TransportResponse, TransportError> {
        self.posts
            .lock()
            .expect("transport lock")
            .push((url.clone(), form.clone()));
        Ok(TransportResponse {
            status: self.status.unwrap_or(200),
            body: r#"{"ok":true}"#.to_string(),
        })
    }
}

fn make_driver(body: &[u8], transport: Arc<CapturingTransport>) -> TelegramDriver {
    let mut config = MapConfig::default();
    config.set(TOKEN_CONFIG_KEY, "999:token");
    TelegramDriver::new(body, Arc::new(config), transport)
}

const PLAIN_UPDATE: &[u8] =
    br#"{"update_id":1,"message":{"text":"hi","chat":{"id":42},"from":{"id":7}}}"#;

const CALLBACK_UPDATE: &[u8] =
    br#"{"update_id":2,"callback_query":{"data":"opt1","message":{"chat":{"id":9}},"from":{"id":3}}}"#;

#[test]
fn plain_update_end_to_end_inbound() {
    let driver = make_driver(PLAIN_UPDATE, Arc::new(CapturingTransport::default()));

    assert!(driver.matches_request());
    assert!(!driver.is_bot());

    let messages = driver.messages().expect("well-formed update");
    assert_eq!(messages, vec![Message::new("hi", "42", "7")]);

    let answer = driver
        .conversation_answer(&messages[0])
        .expect("well-formed update");
    assert_eq!(answer, Answer::from_text("hi"));
}

#[test]
fn callback_update_end_to_end_inbound() {
    let driver = make_driver(CALLBACK_UPDATE, Arc::new(CapturingTransport::default()));

    assert!(driver.matches_request());

    let messages = driver.messages().expect("well-formed update");
    assert_eq!(messages, vec![Message::new("opt1", "9", "3")]);

    let answer = driver
        .conversation_answer(&messages[0])
        .expect("well-formed update");
    assert_eq!(answer, Answer::from_callback("opt1"));
    assert!(answer.is_interactive_reply);
}

#[test]
fn foreign_payloads_never_match() {
    let transport = Arc::new(CapturingTransport::default());
    // Same shape minus update_id: a foreign provider's webhook.
    let driver = make_driver(
        br#"{"message":{"text":"hi","chat":{"id":42},"from":{"id":7}}}"#,
        Arc::clone(&transport),
    );
    assert!(!driver.matches_request());

    let driver = make_driver(br#"{"event":"slack_style"}"#, Arc::clone(&transport));
    assert!(!driver.matches_request());

    let driver = make_driver(b"", transport);
    assert!(!driver.matches_request());
}

#[test]
fn entities_mark_automated_senders() {
    let transport = Arc::new(CapturingTransport::default());
    let driver = make_driver(
        br#"{"update_id":3,"message":{"text":"/start","chat":{"id":1},"from":{"id":2},"entities":[{"type":"bot_command","offset":0,"length":6}]}}"#,
        Arc::clone(&transport),
    );
    assert!(driver.is_bot());

    let driver = make_driver(PLAIN_UPDATE, transport);
    assert!(!driver.is_bot());
}

#[tokio::test]
async fn text_reply_posts_form_encoded_send_message() {
    let transport = Arc::new(CapturingTransport::default());
    let driver = make_driver(PLAIN_UPDATE, Arc::clone(&transport));
    let message = driver.messages().expect("well-formed")[0].clone();

    let response = driver
        .reply(&Reply::text("hello back"), &message, &BTreeMap::new())
        .await
        .expect("transport succeeds");
    assert!(response.is_success());

    let (url, form) = transport.last_post();
    assert_eq!(
        url.as_str(),
        "https://api.telegram.org/bot999:token/sendMessage"
    );
    assert_eq!(form.get("chat_id").map(String::as_str), Some("42"));
    assert_eq!(form.get("text").map(String::as_str), Some("hello back"));
    assert!(!form.contains_key("reply_markup"));
}

#[tokio::test]
async fn question_reply_markup_round_trips() {
    let transport = Arc::new(CapturingTransport::default());
    let driver = make_driver(PLAIN_UPDATE, Arc::clone(&transport));
    let message = driver.messages().expect("well-formed")[0].clone();

    let question = Question::new("Pick one")
        .add_button(Button::new("A", "a"))
        .add_button(Button::new("B", "b"));
    driver
        .reply(&question.into(), &message, &BTreeMap::new())
        .await
        .expect("transport succeeds");

    let (_, form) = transport.last_post();
    assert_eq!(form.get("text").map(String::as_str), Some("Pick one"));

    // reply_markup is a JSON string inside the form body; decode it back
    // and check the single-row inline keyboard.
    let markup = form.get("reply_markup").expect("markup present");
    let decoded: serde_json::Value = serde_json::from_str(markup).expect("markup is JSON");
    assert_eq!(
        decoded,
        serde_json::json!({
            "inline_keyboard": [[
                {"text": "A", "callback_data": "a"},
                {"text": "B", "callback_data": "b"}
            ]]
        })
    );
}

#[tokio::test]
async fn extra_params_merge_with_override() {
    let transport = Arc::new(CapturingTransport::default());
    let driver = make_driver(PLAIN_UPDATE, Arc::clone(&transport));
    let message = driver.messages().expect("well-formed")[0].clone();

    let mut extras = BTreeMap::new();
    extras.insert("chat_id".to_string(), "555".to_string());
    extras.insert("disable_notification".to_string(), "true".to_string());
    driver
        .reply(&Reply::text("quiet"), &message, &extras)
        .await
        .expect("transport succeeds");

    let (_, form) = transport.last_post();
    assert_eq!(form.get("chat_id").map(String::as_str), Some("555"));
    assert_eq!(
        form.get("disable_notification").map(String::as_str),
        Some("true")
    );
    assert_eq!(form.get("text").map(String::as_str), Some("quiet"));
}

#[tokio::test]
async fn provider_failure_passes_through_unchanged() {
    let transport = Arc::new(CapturingTransport::failing(403));
    let driver = make_driver(PLAIN_UPDATE, Arc::clone(&transport));
    let message = driver.messages().expect("well-formed")[0].clone();

    let response = driver
        .reply(&Reply::text("hello"), &message, &BTreeMap::new())
        .await
        .expect("a completed exchange is not a driver error");
    assert_eq!(response.status, 403);
    assert!(!response.is_success());
}

#[tokio::test]
async fn missing_token_fails_before_any_post() {
    let transport = Arc::new(CapturingTransport::default());
    let driver = TelegramDriver::new(
        PLAIN_UPDATE,
        Arc::new(MapConfig::default()),
        Arc::clone(&transport) as Arc<dyn HttpTransport>,
    );
    let message = driver.messages().expect("well-formed")[0].clone();

    let err = driver
        .reply(&Reply::text("hello"), &message, &BTreeMap::new())
        .await
        .expect_err("no token configured");
    assert!(matches!(err, DriverError::MissingConfig("telegram_token")));
    assert!(transport.posts.lock().expect("transport lock").is_empty());
}

#[test]
fn malformed_matching_payload_is_a_hard_failure() {
    // Matches (update_id + callback_query) but the callback carries no data.
    let driver = make_driver(
        br#"{"update_id":4,"callback_query":{"message":{"chat":{"id":9}},"from":{"id":3}}}"#,
        Arc::new(CapturingTransport::default()),
    );
    assert!(driver.matches_request());
    let err = driver.messages().expect_err("data is required");
    assert!(matches!(
        err,
        DriverError::MalformedPayload {
            field: "callback_query.data"
        }
    ));
}

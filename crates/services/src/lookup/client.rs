use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reader_core::model::WordDetail;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// External word lookup: pinyin and a short translation for one word.
#[async_trait]
pub trait LookupClient: Send + Sync {
    /// # Errors
    ///
    /// Returns `LookupError` for transport failures and malformed responses.
    async fn lookup(&self, word: &str) -> Result<WordDetail, LookupError>;

    /// Whether lookups can succeed at all.
    fn enabled(&self) -> bool {
        true
    }
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug)]
pub struct AiLookupConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl AiLookupConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `READER_AI_*` variables; `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("READER_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("READER_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("READER_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let timeout = env::var("READER_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Some(Self {
            base_url,
            api_key,
            model,
            timeout,
        })
    }
}

/// Looks words up through an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct AiLookupClient {
    client: Client,
    config: Option<AiLookupConfig>,
}

impl AiLookupClient {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(AiLookupConfig::from_env())
    }

    /// A client without config answers every lookup with `LookupError::Disabled`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: Option<AiLookupConfig>) -> Result<Self, reqwest::Error> {
        let timeout = config
            .as_ref()
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), |c| c.timeout);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(client, config))
    }

    /// Use a preconfigured HTTP client; its own timeout applies.
    #[must_use]
    pub fn with_http_client(client: Client, config: Option<AiLookupConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl LookupClient for AiLookupClient {
    async fn lookup(&self, word: &str) -> Result<WordDetail, LookupError> {
        if word.trim().is_empty() {
            return Err(LookupError::InvalidInput);
        }
        let config = self.config.as_ref().ok_or(LookupError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: lookup_prompt(word),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status));
        }

        // Any 2xx body that is not a chat envelope counts as a bad format.
        let text = response.text().await?;
        let body: ChatResponse =
            serde_json::from_str(&text).map_err(|e| LookupError::InvalidFormat(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LookupError::EmptyResponse)?;

        parse_detail(&content)
    }

    fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

fn lookup_prompt(word: &str) -> String {
    format!(
        "Given the Chinese word \"{word}\", provide its Pinyin transcription and a concise \
         English translation. Respond strictly in the following JSON format: \
         {{\"pinyin\": \"...\", \"translation\": \"...\"}}."
    )
}

/// Parse the model's reply, accepting an optional markdown code fence.
fn parse_detail(content: &str) -> Result<WordDetail, LookupError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyResponse);
    }
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let detail: LookupReply =
        serde_json::from_str(json).map_err(|e| LookupError::InvalidFormat(e.to_string()))?;
    Ok(WordDetail::new(detail.pinyin, detail.translation))
}

#[derive(Debug, Deserialize)]
struct LookupReply {
    pinyin: String,
    translation: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    #[test]
    fn parses_plain_json_reply() {
        let detail = parse_detail(r#"{"pinyin": "chuán tǒng", "translation": "tradition"}"#)
            .unwrap();
        assert_eq!(detail, WordDetail::new("chuán tǒng", "tradition"));
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n{\"pinyin\": \"jié rì\", \"translation\": \"festival\"}\n```";
        let detail = parse_detail(reply).unwrap();
        assert_eq!(detail.translation, "festival");
    }

    #[test]
    fn missing_field_is_invalid_format() {
        let err = parse_detail(r#"{"pinyin": "jié rì"}"#).unwrap_err();
        assert!(matches!(err, LookupError::InvalidFormat(_)));
    }

    #[test]
    fn non_string_field_is_invalid_format() {
        let err = parse_detail(r#"{"pinyin": 1, "translation": "x"}"#).unwrap_err();
        assert!(matches!(err, LookupError::InvalidFormat(_)));
    }

    #[test]
    fn blank_reply_is_empty_response() {
        assert!(matches!(parse_detail("  "), Err(LookupError::EmptyResponse)));
    }

    #[test]
    fn prompt_names_the_word() {
        assert!(lookup_prompt("龙").contains("\"龙\""));
    }

    #[tokio::test]
    async fn unconfigured_client_is_disabled() {
        let client = AiLookupClient::new(None).unwrap();
        assert!(!client.enabled());
        let err = client.lookup("龙").await.unwrap_err();
        assert!(matches!(err, LookupError::Disabled));
    }

    #[tokio::test]
    async fn empty_word_is_rejected_before_any_request() {
        let client = AiLookupClient::new(Some(AiLookupConfig::new("key"))).unwrap();
        let err = client.lookup(" ").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput));
    }

    //
    // Local HTTP stub: answers one request and hands back the raw request.
    //

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (format!("http://{addr}/v1/"), handle)
    }

    fn stub_client(base_url: String) -> AiLookupClient {
        let mut config = AiLookupConfig::new("test-key");
        config.base_url = base_url;
        let http = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        AiLookupClient::with_http_client(http, Some(config))
    }

    async fn lookup_against(status: &'static str, body: &'static str) -> Result<WordDetail, LookupError> {
        let (base_url, server) = serve_once(status, body);
        let result = stub_client(base_url).lookup("龙").await;
        server.join().unwrap();
        result
    }

    #[tokio::test]
    async fn posts_chat_request_with_bearer_key() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"content":"{\"pinyin\":\"lóng\",\"translation\":\"dragon\"}"}}]}"#,
        );
        let detail = stub_client(base_url).lookup("龙").await.unwrap();
        let request = server.join().unwrap();

        assert_eq!(detail, WordDetail::new("lóng", "dragon"));
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(request.to_lowercase().contains("authorization: bearer test-key"));
        assert!(request.contains(r#""model":"gpt-4o-mini""#));
        assert!(request.contains("龙"));
    }

    #[tokio::test]
    async fn error_status_is_http_status() {
        let err = lookup_against("503 Service Unavailable", "{}").await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::HttpStatus(status) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
        assert_eq!(err.placeholder(), "(AI lookup failed - error)");
    }

    #[tokio::test]
    async fn html_body_is_invalid_format() {
        let err = lookup_against("200 OK", "<html>oops</html>").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidFormat(_)));
        assert_eq!(err.placeholder(), "(AI lookup failed - invalid format)");
    }

    #[tokio::test]
    async fn wrong_envelope_shape_is_invalid_format() {
        let err = lookup_against("200 OK", r#"{"choices":"x"}"#).await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn no_choices_is_empty_response() {
        let err = lookup_against("200 OK", r#"{"choices":[]}"#).await.unwrap_err();
        assert!(matches!(err, LookupError::EmptyResponse));
        assert_eq!(err.placeholder(), "(AI lookup failed - invalid format)");
    }

    #[tokio::test]
    async fn null_content_is_empty_response() {
        let err = lookup_against("200 OK", r#"{"choices":[{"message":{"content":null}}]}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::EmptyResponse));
    }
}

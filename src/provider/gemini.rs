use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::ProviderSettings;
use crate::error::SegmentationError;
use crate::types::{Language, Segment, SEGMENT_DURATION_SECS};

use super::payload::parse_segment_payload;
use super::SegmentationStrategy;

/// Segmentation backed by the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiSegmenter {
    api_key: String,
    url: String,
    client: Client,
}

impl GeminiSegmenter {
    pub fn new(api_key: String, settings: &ProviderSettings) -> Result<Self, SegmentationError> {
        let client = client_builder(settings).build()?;
        Self::with_client(api_key, settings, client)
    }

    fn with_client(
        api_key: String,
        settings: &ProviderSettings,
        client: Client,
    ) -> Result<Self, SegmentationError> {
        if api_key.trim().is_empty() {
            return Err(SegmentationError::MissingApiKey);
        }
        let url = format!(
            "{}/models/{}:generateContent",
            settings.endpoint.trim_end_matches('/'),
            settings.model
        );
        Ok(Self {
            api_key,
            url,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn client_builder(settings: &ProviderSettings) -> ClientBuilder {
    Client::builder().timeout(Duration::from_secs(settings.timeout_secs))
}

/// Instruction text sent alongside the script
pub fn build_instruction(script: &str, language: Language) -> String {
    let (min_words, max_words) = language.word_band();
    format!(
        r#"Task: split the following script into voiceover segments.
Each segment MUST be exactly long enough to be read aloud in {seconds} seconds.

Rules:
- About {min_words}-{max_words} words of {language} per segment.
- Keep the original wording and order; do not drop, add or rephrase words.
- Language: {language}.
- Script: "{script}"

Return a JSON object {{"segments": [{{"id": number, "voiceText": string}}]}} with ids starting at 1."#,
        seconds = SEGMENT_DURATION_SECS,
        min_words = min_words,
        max_words = max_words,
        language = language.name(),
        script = script,
    )
}

fn request_body(script: &str, language: Language) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": build_instruction(script, language) }]
            }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "segments": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "id": { "type": "NUMBER" },
                                "voiceText": { "type": "STRING" }
                            },
                            "required": ["id", "voiceText"]
                        }
                    }
                },
                "required": ["segments"]
            }
        }
    })
}

/// Pull the generated text out of a `generateContent` response
fn extract_text(response: &Value) -> Result<&str, SegmentationError> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| {
            SegmentationError::MalformedResponse(
                "response carries no candidate text".to_string(),
            )
        })
}

#[async_trait]
impl SegmentationStrategy for GeminiSegmenter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn segment(
        &self,
        script: &str,
        language: Language,
    ) -> Result<Vec<Segment>, SegmentationError> {
        info!(
            language = %language,
            chars = script.len(),
            "requesting AI segmentation"
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(script, language))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(SegmentationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = response.json().await?;
        let generated_text = extract_text(&response_json)?;
        debug!(generated_text, "provider output");

        let segments = parse_segment_payload(generated_text)?;
        info!(count = segments.len(), "AI segmentation returned segments");
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run, RunStatus, StopSignal, Storyboard};
    use crate::prompts::PromptSynthesizer;
    use crate::types::RunRequest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Answer exactly one request on a local port; returns the endpoint URL.
    async fn serve_once(status: &'static str, body: String, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}/v1beta", addr)
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    fn candidate_body(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    fn local_segmenter(endpoint: String, timeout_secs: u64) -> GeminiSegmenter {
        let settings = ProviderSettings {
            endpoint,
            timeout_secs,
            ..ProviderSettings::default()
        };
        let client = client_builder(&settings).no_proxy().build().unwrap();
        GeminiSegmenter::with_client("test-key".to_string(), &settings, client).unwrap()
    }

    #[tokio::test]
    async fn segments_from_candidate_text() {
        let text = r#"{"segments":[{"id":1,"voiceText":"hello there"},{"id":2,"voiceText":"general"}]}"#;
        let endpoint = serve_once("200 OK", candidate_body(text), Duration::ZERO).await;
        let segments = local_segmenter(endpoint, 5)
            .segment("hello there general", Language::English)
            .await
            .unwrap();
        assert_eq!(
            segments,
            vec![Segment::new(1, "hello there"), Segment::new(2, "general")]
        );
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let endpoint = serve_once(
            "500 Internal Server Error",
            r#"{"error":"internal"}"#.to_string(),
            Duration::ZERO,
        )
        .await;
        let err = local_segmenter(endpoint, 5)
            .segment("hello", Language::English)
            .await
            .unwrap_err();
        match err {
            SegmentationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("internal"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn response_without_candidates_is_malformed() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"candidates":[]}"#.to_string(),
            Duration::ZERO,
        )
        .await;
        let err = local_segmenter(endpoint, 5)
            .segment("hello", Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, SegmentationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn fenced_prose_is_malformed() {
        let body = candidate_body("```json\nSure, here are your segments!\n```");
        let endpoint = serve_once("200 OK", body, Duration::ZERO).await;
        let err = local_segmenter(endpoint, 5)
            .segment("hello", Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, SegmentationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let body = candidate_body(r#"[{"id":1,"voiceText":"late"}]"#);
        let endpoint = serve_once("200 OK", body, Duration::from_secs(3)).await;
        let err = local_segmenter(endpoint, 1)
            .segment("hello", Language::English)
            .await
            .unwrap_err();
        match err {
            SegmentationError::Http(err) => assert!(err.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_provider_run_emits_no_scenes() {
        let endpoint = serve_once(
            "503 Service Unavailable",
            r#"{"error":"overloaded"}"#.to_string(),
            Duration::ZERO,
        )
        .await;
        let segmenter = local_segmenter(endpoint, 5);
        let request = RunRequest::new("one two three", Language::English, "anime").unwrap();

        let state = run(
            Storyboard::new(),
            &request,
            &segmenter,
            &PromptSynthesizer::default(),
            &StopSignal::new(),
            |_| panic!("no scene may be emitted on failure"),
        )
        .await;

        assert_eq!(state.status, RunStatus::Failed);
        assert!(state.scenes.is_empty());
        let message = state.error.unwrap();
        assert!(message.contains("switch to local segmentation"));
        assert!(message.contains("503"));
    }

    #[test]
    fn instruction_carries_language_band() {
        let vi = build_instruction("xin chào", Language::Vietnamese);
        assert!(vi.contains("About 20-25 words of Vietnamese"));
        assert!(vi.contains("8 seconds"));
        assert!(vi.contains("\"xin chào\""));

        let en = build_instruction("hello", Language::English);
        assert!(en.contains("About 25-30 words of English"));
    }

    #[test]
    fn body_requests_json_schema() {
        let body = request_body("hello", Language::English);
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"][0],
            "segments"
        );
    }

    #[test]
    fn extracts_candidate_text() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"segments\":[]}" }] } }]
        });
        assert_eq!(extract_text(&response).unwrap(), "{\"segments\":[]}");
        assert!(extract_text(&json!({ "candidates": [] })).is_err());
    }

    #[test]
    fn rejects_blank_api_key() {
        let err = GeminiSegmenter::new("  ".to_string(), &ProviderSettings::default()).unwrap_err();
        assert!(matches!(err, SegmentationError::MissingApiKey));
    }

    #[test]
    fn builds_model_url() {
        let settings = ProviderSettings {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..ProviderSettings::default()
        };
        let segmenter = GeminiSegmenter::new("key".to_string(), &settings).unwrap();
        assert_eq!(
            segmenter.url(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }
}

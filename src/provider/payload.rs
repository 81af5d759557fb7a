use serde_json::Value;
use tracing::warn;

use crate::error::SegmentationError;
use crate::types::Segment;

/// Validate provider output and turn it into segments.
///
/// Accepts `{"segments": [...]}` or a bare array, optionally wrapped in a
/// Markdown code fence. Every item needs a numeric `id` and a non-blank string
/// `voiceText`. Segments are renumbered by position.
pub fn parse_segment_payload(raw: &str) -> Result<Vec<Segment>, SegmentationError> {
    let json_text = strip_code_fence(raw);
    let value: Value = serde_json::from_str(json_text)
        .map_err(|e| malformed(format!("response is not valid JSON: {}", e)))?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("segments")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing `segments` array"))?,
        _ => return Err(malformed("expected a JSON object or array")),
    };
    if items.is_empty() {
        return Err(malformed("provider returned no segments"));
    }

    let mut segments = Vec::with_capacity(items.len());
    let mut ids_in_order = true;
    for (idx, item) in items.iter().enumerate() {
        let reported_id = item
            .get("id")
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed(format!("segment {} has no numeric `id`", idx + 1)))?;
        let voice_text = item
            .get("voiceText")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(format!("segment {} has no string `voiceText`", idx + 1)))?
            .trim();
        if voice_text.is_empty() {
            return Err(malformed(format!("segment {} has empty `voiceText`", idx + 1)));
        }

        let position = idx as u32 + 1;
        if reported_id != f64::from(position) {
            ids_in_order = false;
        }
        segments.push(Segment::new(position, voice_text));
    }

    if !ids_in_order {
        warn!(
            count = segments.len(),
            "provider segment ids were not 1..N; renumbered by position"
        );
    }
    Ok(segments)
}

/// Drop a surrounding Markdown fence, whatever its info string
fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(fenced) = text.strip_prefix("```") else {
        return text;
    };
    let body = match fenced.split_once('\n') {
        Some((_info, rest)) => rest,
        None => fenced,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn malformed(message: impl Into<String>) -> SegmentationError {
    SegmentationError::MalformedResponse(message.into())
}

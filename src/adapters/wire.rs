//! Interpretation of Question Service response bodies.
//!
//! Every endpoint answers with a JSON envelope whose `status` must be `"ok"`.
//! Anything else is a protocol error carrying the service's `detail` or
//! `message` text when one is present.

use crate::domain::model::{AnswerValue, Question, QuestionBatch, VerificationResult};
use crate::utils::error::{QuizError, Result};
use serde_json::Value;

/// Parse a raw response body and return it only if it is an ok envelope.
pub fn ok_envelope(http_status: u16, body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        QuizError::protocol(format!(
            "Unreadable response from question service (HTTP {}): {}",
            http_status, e
        ))
    })?;

    let status = value.get("status").and_then(Value::as_str);
    let http_ok = (200..300).contains(&http_status);

    if http_ok && status == Some("ok") {
        return Ok(value);
    }

    let message = service_message(&value).unwrap_or_else(|| match status {
        Some(status) if http_ok => format!("Question service answered with status '{}'", status),
        _ => format!("Question service request failed (HTTP {})", http_status),
    });
    Err(QuizError::protocol(message))
}

/// `detail` wins over `message`; structured details (validation errors) are
/// shown as compact JSON.
pub fn service_message(value: &Value) -> Option<String> {
    match value.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Null) | None => {}
        Some(detail) => return Some(detail.to_string()),
    }
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub fn parse_batch(value: &Value) -> Result<QuestionBatch> {
    let session_id = value
        .get("session_id")
        .and_then(Value::as_str)
        .ok_or_else(|| QuizError::protocol("Response is missing a session id"))?
        .to_string();

    let items = value
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| QuizError::protocol("Response does not contain a list of questions"))?;

    let questions = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Question>(item.clone()).map_err(|e| {
                QuizError::protocol(format!("Question {} is malformed: {}", index + 1, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBatch {
        session_id,
        questions,
    })
}

pub fn parse_verification(value: &Value) -> Result<VerificationResult> {
    let correct = value
        .get("correct")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            QuizError::protocol("Response does not say whether the answer is correct")
        })?;

    let explanation = value
        .get("explanation")
        .and_then(Value::as_str)
        .ok_or_else(|| QuizError::protocol("Response is missing an explanation"))?
        .to_string();

    let expected = value
        .get("expected")
        .and_then(|v| serde_json::from_value::<AnswerValue>(v.clone()).ok());

    Ok(VerificationResult {
        correct,
        explanation,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QuestionKind;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_accepts_ok_status() {
        let value = ok_envelope(200, r#"{"status": "ok", "correct": true}"#).unwrap();
        assert_eq!(value["correct"], json!(true));
    }

    #[test]
    fn test_error_status_uses_message() {
        let body = r#"{"status": "error", "message": "OpenAI API key is missing."}"#;
        let err = ok_envelope(500, body).unwrap_err();
        assert_eq!(err.user_friendly_message(), "OpenAI API key is missing.");

        let err = ok_envelope(200, r#"{"status": "error"}"#).unwrap_err();
        assert_eq!(
            err.user_friendly_message(),
            "Question service answered with status 'error'"
        );
    }

    #[test]
    fn test_detail_takes_precedence() {
        let err = ok_envelope(
            404,
            r#"{"detail": "Question not found or expired", "message": "ignored"}"#,
        )
        .unwrap_err();
        assert_eq!(err.user_friendly_message(), "Question not found or expired");

        let err = ok_envelope(422, r#"{"status": "error", "detail": [{"loc": ["body", "n"]}]}"#)
            .unwrap_err();
        assert_eq!(err.user_friendly_message(), r#"[{"loc":["body","n"]}]"#);
    }

    #[test]
    fn test_non_json_body_is_protocol_error() {
        let err = ok_envelope(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_ok_status_with_http_error_is_rejected() {
        assert!(ok_envelope(500, r#"{"status": "ok"}"#).is_err());
    }

    #[test]
    fn test_parse_batch() {
        let value = json!({
            "status": "ok",
            "session_id": "s-1",
            "questions": [
                {"question_id": "q-1", "type": "mcq", "question": "Pick", "options": ["a", "b"]},
                {
                    "question_id": "q-2",
                    "type": "drag_drop",
                    "question": "Order",
                    "options": ["x", "y"]
                }
            ]
        });
        let batch = parse_batch(&value).unwrap();
        assert_eq!(batch.session_id, "s-1");
        assert_eq!(batch.questions.len(), 2);
        assert_eq!(batch.questions[1].kind, QuestionKind::Ordering);
    }

    #[test]
    fn test_parse_batch_rejects_missing_fields() {
        assert!(parse_batch(&json!({"status": "ok", "questions": []})).is_err());
        let questions_not_a_list = json!({"status": "ok", "session_id": "s", "questions": {}});
        assert!(parse_batch(&questions_not_a_list).is_err());

        let err = parse_batch(&json!({
            "session_id": "s",
            "questions": [{"question_id": "q", "type": "essay", "question": "?"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Question 1 is malformed"));
    }

    #[test]
    fn test_parse_verification() {
        let result = parse_verification(&json!({
            "status": "ok",
            "correct": false,
            "expected": ["a", "b"],
            "explanation": "Order matters"
        }))
        .unwrap();
        assert!(!result.correct);
        assert_eq!(result.explanation, "Order matters");
        assert_eq!(
            result.expected,
            Some(AnswerValue::Sequence(vec!["a".into(), "b".into()]))
        );

        let result =
            parse_verification(&json!({"status": "ok", "correct": true, "explanation": ""}))
                .unwrap();
        assert_eq!(result.explanation, "");
        assert_eq!(result.expected, None);

        assert!(parse_verification(&json!({"status": "ok"})).is_err());
    }

    #[test]
    fn test_parse_verification_requires_explanation() {
        let err = parse_verification(&json!({"status": "ok", "correct": true})).unwrap_err();
        assert!(matches!(err, QuizError::ProtocolError { .. }));
        assert_eq!(err.user_friendly_message(), "Response is missing an explanation");
    }
}

//! Model output → typed values.
//!
//! Steps, in order: trim, unwrap a fenced block, strict JSON parse, schema
//! check. Nothing here retries or panics; every failure is a [`ParseError`].

mod fence;

pub use fence::strip_fence;

use crate::errors::ParseError;
use crate::model::{Evaluation, QuestionSet, MAX_SCORE, MIN_SCORE, QUESTION_COUNT};
use serde_json::Value;
use tracing::warn;

/// Shape expected from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// `{"questions": [string, string, string]}`
    Generation,
    /// `{"score": integer, "comment": string}`
    Evaluation,
}

/// A value produced by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Questions(QuestionSet),
    Evaluation(Evaluation),
}

pub fn parse(raw: &str, schema: Schema) -> Result<Parsed, ParseError> {
    match schema {
        Schema::Generation => parse_generation(raw).map(Parsed::Questions),
        Schema::Evaluation => parse_evaluation(raw).map(Parsed::Evaluation),
    }
}

pub fn parse_generation(raw: &str) -> Result<QuestionSet, ParseError> {
    let payload = parse_json(raw)?;
    let obj = payload
        .as_object()
        .ok_or_else(|| ParseError::schema(format!("expected a JSON object, got {}", type_name(&payload))))?;

    let questions = obj
        .get("questions")
        .ok_or_else(|| ParseError::schema("'questions' key not found"))?;
    let items = questions.as_array().ok_or_else(|| {
        ParseError::schema(format!(
            "'questions' must be an array, got {}",
            type_name(questions)
        ))
    })?;
    if items.len() != QUESTION_COUNT {
        return Err(ParseError::schema(format!(
            "'questions' must hold exactly {} items, got {}",
            QUESTION_COUNT,
            items.len()
        )));
    }

    let mut out: Vec<String> = Vec::with_capacity(QUESTION_COUNT);
    for (idx, item) in items.iter().enumerate() {
        let text = item.as_str().ok_or_else(|| {
            ParseError::schema(format!(
                "'questions[{}]' must be a string, got {}",
                idx,
                type_name(item)
            ))
        })?;
        if text.trim().is_empty() {
            return Err(ParseError::schema(format!("'questions[{}]' is empty", idx)));
        }
        out.push(text.to_string());
    }

    let arr: [String; QUESTION_COUNT] = out
        .try_into()
        .map_err(|_| ParseError::schema("question count changed during validation"))?;
    Ok(QuestionSet::from_array(arr))
}

pub fn parse_evaluation(raw: &str) -> Result<Evaluation, ParseError> {
    let payload = parse_json(raw)?;
    let obj = payload
        .as_object()
        .ok_or_else(|| ParseError::schema(format!("expected a JSON object, got {}", type_name(&payload))))?;

    let (score, comment) = match (obj.get("score"), obj.get("comment")) {
        (Some(s), Some(c)) => (s, c),
        _ => return Err(ParseError::schema("'score' or 'comment' key not found")),
    };

    let score = integral(score).ok_or_else(|| {
        ParseError::schema(format!("'score' must be an integer, got {}", score))
    })?;
    let comment = comment.as_str().ok_or_else(|| {
        ParseError::schema(format!("'comment' must be a string, got {}", type_name(comment)))
    })?;

    Ok(Evaluation {
        score: clamp_score(score),
        comment: comment.to_string(),
    })
}

fn parse_json(raw: &str) -> Result<Value, ParseError> {
    let body = strip_fence(raw);
    serde_json::from_str(body).map_err(|e| ParseError::MalformedJson {
        detail: e.to_string(),
    })
}

/// Integers, or floats with no fractional part (`4.0`). Values outside the
/// `i64` range saturate; the caller clamps them anyway.
fn integral(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    if v.as_u64().is_some() {
        return Some(i64::MAX);
    }
    let f = v.as_f64()?;
    // `as` saturates out-of-range floats.
    (f.fract() == 0.0).then_some(f as i64)
}

fn clamp_score(score: i64) -> u8 {
    let clamped = score.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE));
    if clamped != score {
        warn!(score, clamped, "model score outside [1, 5], clamping");
    }
    // In range after clamp.
    clamped as u8
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn schema_detail(err: ParseError) -> String {
        match err {
            ParseError::SchemaViolation { detail } => detail,
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn generation_exact_shape() {
        let qs = parse_generation(r#"{"questions": ["a","b","c"]}"#).unwrap();
        assert_eq!(qs.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn generation_wrong_arity() {
        let err = parse_generation(r#"{"questions": ["a","b"]}"#).unwrap_err();
        assert!(schema_detail(err).contains("exactly 3 items, got 2"));

        let err = parse_generation(r#"{"questions": ["a","b","c","d"]}"#).unwrap_err();
        assert!(schema_detail(err).contains("got 4"));
    }

    #[test]
    fn generation_missing_key_and_bad_types() {
        let err = parse_generation(r#"{"prompts": ["a","b","c"]}"#).unwrap_err();
        assert!(schema_detail(err).contains("'questions' key not found"));

        let err = parse_generation(r#"{"questions": "a,b,c"}"#).unwrap_err();
        assert!(schema_detail(err).contains("must be an array, got string"));

        let err = parse_generation(r#"{"questions": ["a", 2, "c"]}"#).unwrap_err();
        assert!(schema_detail(err).contains("'questions[1]' must be a string, got number"));

        let err = parse_generation(r#"["a","b","c"]"#).unwrap_err();
        assert!(schema_detail(err).contains("expected a JSON object, got array"));
    }

    #[test]
    fn generation_rejects_blank_entries() {
        let err = parse_generation(r#"{"questions": ["a", "  ", "c"]}"#).unwrap_err();
        assert!(schema_detail(err).contains("'questions[1]' is empty"));
    }

    #[test]
    fn generation_ignores_extra_keys() {
        let qs = parse_generation(r#"{"questions": ["a","b","c"], "note": "x"}"#).unwrap();
        assert_eq!(qs.iter().count(), 3);
    }

    #[test]
    fn evaluation_in_fenced_block() {
        let raw = "```json\n{\"score\": 4, \"comment\": \"面白い\"}\n```";
        let eval = parse_evaluation(raw).unwrap();
        assert_eq!(eval.score, 4);
        assert_eq!(eval.comment, "面白い");
    }

    #[test]
    fn evaluation_missing_keys() {
        let err = parse_evaluation(r#"{"score": 4}"#).unwrap_err();
        assert!(schema_detail(err).contains("'score' or 'comment'"));
        let err = parse_evaluation(r#"{"comment": "x"}"#).unwrap_err();
        assert!(matches!(err, ParseError::SchemaViolation { .. }));
    }

    #[test]
    fn evaluation_score_types() {
        assert_eq!(
            parse_evaluation(r#"{"score": 3.0, "comment": "ok"}"#).unwrap().score,
            3
        );
        let err = parse_evaluation(r#"{"score": 3.5, "comment": "ok"}"#).unwrap_err();
        assert!(schema_detail(err).contains("'score' must be an integer"));
        let err = parse_evaluation(r#"{"score": "4", "comment": "ok"}"#).unwrap_err();
        assert!(matches!(err, ParseError::SchemaViolation { .. }));
        let err = parse_evaluation(r#"{"score": 4, "comment": 7}"#).unwrap_err();
        assert!(schema_detail(err).contains("'comment' must be a string"));
    }

    #[test]
    fn evaluation_out_of_range_scores_are_clamped() {
        assert_eq!(
            parse_evaluation(r#"{"score": 9, "comment": "x"}"#).unwrap().score,
            5
        );
        assert_eq!(
            parse_evaluation(r#"{"score": 0, "comment": "x"}"#).unwrap().score,
            1
        );
        assert_eq!(
            parse_evaluation(r#"{"score": -3, "comment": "x"}"#).unwrap().score,
            1
        );
    }

    #[test]
    fn evaluation_scores_beyond_i64_are_clamped() {
        let eval = parse_evaluation(r#"{"score": 18446744073709551615, "comment": "x"}"#).unwrap();
        assert_eq!(eval.score, MAX_SCORE);
        let eval = parse_evaluation(r#"{"score": 1e30, "comment": "x"}"#).unwrap();
        assert_eq!(eval.score, MAX_SCORE);
        let eval = parse_evaluation(r#"{"score": -1e30, "comment": "x"}"#).unwrap();
        assert_eq!(eval.score, MIN_SCORE);
    }

    #[test]
    fn malformed_json() {
        for raw in ["not json at all", "", "```json\n{\"score\": 4", "{\"questions\": [\"a\""] {
            let err = parse(raw, Schema::Generation).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedJson { .. }),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn parse_dispatches_by_schema() {
        let p = parse(r#"{"score": 2, "comment": "まあまあ"}"#, Schema::Evaluation).unwrap();
        assert_eq!(
            p,
            Parsed::Evaluation(Evaluation {
                score: 2,
                comment: "まあまあ".into()
            })
        );
        let p = parse(r#"{"questions": ["x","y","z"]}"#, Schema::Generation).unwrap();
        assert!(matches!(p, Parsed::Questions(_)));
    }

    fn fenced(body: &str) -> String {
        format!("```json\n{}\n```", body)
    }

    proptest! {
        #[test]
        fn unfenced_text_is_only_trimmed(raw in "[^`]*") {
            prop_assert_eq!(strip_fence(&raw), raw.trim());
            prop_assert_eq!(strip_fence(strip_fence(&raw)), raw.trim());
        }

        #[test]
        fn questions_round_trip(
            qs in prop::array::uniform3("\\PC*[^\\s]\\PC*"),
            wrap in any::<bool>(),
        ) {
            let body = serde_json::json!({ "questions": qs }).to_string();
            let raw = if wrap { fenced(&body) } else { body };
            let parsed = parse_generation(&raw).unwrap();
            prop_assert_eq!(parsed.as_slice(), &qs[..]);
        }

        #[test]
        fn accepted_question_sets_hold_three_non_blank_entries(
            items in prop::collection::vec("\\s*|\\PC*", 0..6),
        ) {
            let raw = serde_json::json!({ "questions": items }).to_string();
            let valid = items.len() == QUESTION_COUNT && items.iter().all(|q| !q.trim().is_empty());
            match parse_generation(&raw) {
                Ok(qs) => {
                    prop_assert!(valid);
                    prop_assert_eq!(qs.as_slice().len(), QUESTION_COUNT);
                    prop_assert!(qs.iter().all(|q| !q.trim().is_empty()));
                }
                Err(err) => {
                    prop_assert!(!valid);
                    prop_assert!(matches!(err, ParseError::SchemaViolation { .. }), "{:?}", err);
                }
            }
        }

        #[test]
        fn any_integer_score_lands_in_range(score in any::<i64>(), comment in "\\PC*") {
            let raw = serde_json::json!({ "score": score, "comment": comment }).to_string();
            let eval = parse_evaluation(&raw).unwrap();
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&eval.score));
            prop_assert_eq!(eval.comment, comment);
            if (1..=5).contains(&score) {
                prop_assert_eq!(i64::from(eval.score), score);
            }
        }
    }
}

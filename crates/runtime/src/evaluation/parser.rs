use serde_json::{Map, Value};

use super::result::{Evaluation, EvaluationFailure, EvaluationResult};

/// Turns model output into an [`EvaluationResult`]. Pure, and never panics.
pub fn parse_evaluation(raw: &str) -> EvaluationResult {
    let cleaned = strip_code_fences(raw);

    let parsed = first_json_object(&cleaned)
        .and_then(|candidate| serde_json::from_str::<Map<String, Value>>(candidate).ok())
        .and_then(into_evaluation);

    match parsed {
        Some(evaluation) => EvaluationResult::Success(evaluation),
        None => {
            tracing::warn!("[parse_evaluation] Model output is not a valid evaluation ({} bytes)", raw.len());
            EvaluationResult::Failure(EvaluationFailure::unparseable(raw))
        }
    }
}

/// Removes every ```` ```json ```` and ```` ``` ```` marker.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// The first balanced `{ ... }` span. Braces inside string literals are ignored.
pub fn first_json_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if depth > 0 && in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|start| &text[start..=idx]);
                }
            }
            '"' if depth > 0 => in_string = true,
            _ => {}
        }
    }

    None
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn into_evaluation(mut object: Map<String, Value>) -> Option<Evaluation> {
    let score = object.remove("score")?;
    let strengths = match object.remove("strengths")? {
        Value::Array(items) => items,
        _ => return None,
    };
    let improvements = match object.remove("improvements")? {
        Value::Array(items) => items,
        _ => return None,
    };
    let final_comment = object.remove("final_comment").filter(is_truthy)?;

    Some(Evaluation { score, strengths, improvements, final_comment, extra: object })
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use coach_runtime::{BatchReport, QaPair};

/// Either a bare list of pairs or `{ "role": ..., "pairs": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchInput {
    Pairs(Vec<QaPair>),
    WithRole {
        #[serde(default)]
        role: Option<String>,
        pairs: Vec<QaPair>,
    },
}

pub fn parse_batch_input(content: &str) -> Result<(Option<String>, Vec<QaPair>)> {
    let input: BatchInput = serde_json::from_str(content)
        .context("Expected a JSON list of {question, answer} objects, or {role, pairs}")?;

    Ok(match input {
        BatchInput::Pairs(pairs) => (None, pairs),
        BatchInput::WithRole { role, pairs } => (role, pairs),
    })
}

pub fn load_batch_file(path: &Path) -> Result<(Option<String>, Vec<QaPair>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_batch_input(&content)
}

/// `answers.json` -> `answers_evaluated.json`, next to the input.
pub fn report_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|stem| stem.to_str()).unwrap_or("batch");
    input.with_file_name(format!("{}_evaluated.json", stem))
}

pub fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("Failed to serialize the batch report")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("[write_report] Wrote {} entries to {}", report.entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_shapes() {
        let (role, pairs) = parse_batch_input(r#"[{"question": "q1", "answer": "a1"}]"#).unwrap();
        assert_eq!(role, None);
        assert_eq!(pairs[0].question_type, "general");

        let (role, pairs) = parse_batch_input(
            r#"{"role": "ML Engineer", "pairs": [{"question": "q", "answer": "a", "question_type": "coding"}]}"#,
        ).unwrap();
        assert_eq!(role.as_deref(), Some("ML Engineer"));
        assert_eq!(pairs[0].question_type, "coding");

        assert!(parse_batch_input(r#"{"questions": []}"#).is_err());
    }

    #[test]
    fn test_report_path() {
        assert_eq!(report_path(Path::new("data/answers.json")), PathBuf::from("data/answers_evaluated.json"));
    }
}

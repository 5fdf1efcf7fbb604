use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::bank::question::Question;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not a question file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the file contains no questions")]
    Empty,
    #[error("question {id} needs at least two options")]
    TooFewOptions { id: u64 },
    #[error("question {id}: answer index {index} is outside its {count} options")]
    AnswerOutOfRange { id: u64, index: usize, count: usize },
    #[error("question id {id} appears more than once")]
    DuplicateId { id: u64 },
}

/// Accepted layouts: a bare array of questions, or a named set.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    Bare(Vec<Question>),
    Named {
        #[serde(default)]
        name: Option<String>,
        questions: Vec<Question>,
    },
}

#[derive(Clone, Debug)]
pub struct ImportedSet {
    pub suggested_name: String,
    pub questions: Vec<Question>,
}

pub fn load_question_file(path: &Path) -> Result<ImportedSet, ImportError> {
    let content = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Imported questions".to_string());
    parse_question_set(&content, &stem)
}

pub fn parse_question_set(content: &str, fallback_name: &str) -> Result<ImportedSet, ImportError> {
    let (name, questions) = match serde_json::from_str::<QuestionFile>(content)? {
        QuestionFile::Named { name, questions } => (name, questions),
        QuestionFile::Bare(questions) => (None, questions),
    };
    validate(&questions)?;
    let suggested_name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());
    Ok(ImportedSet {
        suggested_name,
        questions,
    })
}

pub fn validate(questions: &[Question]) -> Result<(), ImportError> {
    if questions.is_empty() {
        return Err(ImportError::Empty);
    }
    let mut ids = HashSet::new();
    for q in questions {
        if q.options.len() < 2 {
            return Err(ImportError::TooFewOptions { id: q.id });
        }
        if q.correct_answer_index >= q.options.len() {
            return Err(ImportError::AnswerOutOfRange {
                id: q.id,
                index: q.correct_answer_index,
                count: q.options.len(),
            });
        }
        if !ids.insert(q.id) {
            return Err(ImportError::DuplicateId { id: q.id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ONE_QUESTION: &str = r#"[{"id":1,"question":"q","options":["a","b"],"correctAnswerIndex":0,"source":"s","category":"c"}]"#;

    #[test]
    fn test_bare_array_uses_fallback_name() {
        let set = parse_question_set(ONE_QUESTION, "chapter-1").unwrap();
        assert_eq!(set.suggested_name, "chapter-1");
        assert_eq!(set.questions.len(), 1);
    }

    #[test]
    fn test_named_set_uses_its_name() {
        let json = format!(r#"{{"name":"  Networks  ","questions":{ONE_QUESTION}}}"#);
        let set = parse_question_set(&json, "ignored").unwrap();
        assert_eq!(set.suggested_name, "Networks");
    }

    #[test]
    fn test_rejects_empty_set() {
        assert!(matches!(
            parse_question_set("[]", "x"),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn test_rejects_answer_outside_options() {
        let json = r#"[{"id":3,"question":"q","options":["a","b"],"correctAnswerIndex":2}]"#;
        let err = parse_question_set(json, "x").unwrap_err();
        assert!(matches!(
            err,
            ImportError::AnswerOutOfRange {
                id: 3,
                index: 2,
                count: 2
            }
        ));
        assert!(err.to_string().contains("outside its 2 options"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"[
            {"id":1,"question":"q","options":["a","b"],"correctAnswerIndex":0},
            {"id":1,"question":"r","options":["a","b"],"correctAnswerIndex":1}
        ]"#;
        assert!(matches!(
            parse_question_set(json, "x"),
            Err(ImportError::DuplicateId { id: 1 })
        ));
    }

    #[test]
    fn test_rejects_single_option_question() {
        let json = r#"[{"id":5,"question":"q","options":["only"],"correctAnswerIndex":0}]"#;
        assert!(matches!(
            parse_question_set(json, "x"),
            Err(ImportError::TooFewOptions { id: 5 })
        ));
    }

    #[test]
    fn test_load_from_file_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("biology.json");
        fs::write(&path, ONE_QUESTION).unwrap();
        let set = load_question_file(&path).unwrap();
        assert_eq!(set.suggested_name, "biology");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_question_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }
}

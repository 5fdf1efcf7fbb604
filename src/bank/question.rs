use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: String,
}

impl Question {
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl KnowledgeBase {
    pub fn new(name: &str, questions: Vec<Question>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            questions,
            created_at: Utc::now(),
        }
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for q in &self.questions {
            if !seen.iter().any(|c| c == &q.category) {
                seen.push(q.category.clone());
            }
        }
        seen
    }

    pub fn question(&self, id: u64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Letter label shown next to an option ("A", "B", ...).
pub fn option_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_keep_first_appearance_order() {
        let mut questions = fixtures::pool(2, 2);
        questions.push(fixtures::question(9, "A"));
        questions.insert(0, fixtures::question(10, "C"));
        let base = KnowledgeBase::new("mixed", questions);
        assert_eq!(base.categories(), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_deserializes_original_field_names() {
        let json = r#"{
            "id": 7,
            "question": "2 + 2?",
            "options": ["3", "4", "5", "22"],
            "correctAnswerIndex": 1,
            "source": "Arithmetic, p. 1",
            "category": "Math"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, 7);
        assert_eq!(q.correct_option(), Some("4"));
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
    }

    #[test]
    fn test_new_bases_get_distinct_ids() {
        let a = KnowledgeBase::new("a", Vec::new());
        let b = KnowledgeBase::new("b", Vec::new());
        assert_ne!(a.id, b.id);
    }
}

use std::rc::Rc;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::session::answer::UserAnswer;
use crate::session::attempt::QuizAttempt;
use crate::store::kv::KeyValueStore;
use crate::store::persist::{self, STORAGE_VERSION};

pub fn attempts_key(identity: &str) -> String {
    format!(
        "quizmaster_v{STORAGE_VERSION}_attempts_{}",
        identity.trim().to_lowercase()
    )
}

pub struct AttemptStore {
    kv: Rc<dyn KeyValueStore>,
    key: Option<String>,
    attempts: Vec<QuizAttempt>,
}

impl AttemptStore {
    pub fn new(kv: Rc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: None,
            attempts: Vec::new(),
        }
    }

    pub fn hydrate(&mut self, identity: Option<&str>) {
        self.key = identity.map(attempts_key);
        self.attempts = match &self.key {
            Some(key) => persist::load(self.kv.as_ref(), key, Vec::new()),
            None => Vec::new(),
        };
        debug!(count = self.attempts.len(), "attempts hydrated");
    }

    pub fn attempts(&self) -> &[QuizAttempt] {
        &self.attempts
    }

    pub fn get(&self, id: &str) -> Option<&QuizAttempt> {
        self.attempts.iter().find(|a| a.id == id)
    }

    /// Newest first.
    pub fn history(&self) -> Vec<&QuizAttempt> {
        let mut sorted: Vec<&QuizAttempt> = self.attempts.iter().collect();
        sorted.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sorted
    }

    pub fn append(&mut self, attempt: QuizAttempt) -> Result<()> {
        info!(id = %attempt.id, base = %attempt.knowledge_base_id, mode = attempt.mode.as_str(), "attempt started");
        self.attempts.push(attempt);
        self.persist()
    }

    /// Replace the live ledger of an in-progress attempt. Completed or
    /// unknown attempts are left alone.
    pub fn update_answers(&mut self, id: &str, answers: &[UserAnswer]) -> Result<bool> {
        let Some(attempt) = self
            .attempts
            .iter_mut()
            .find(|a| a.id == id && !a.is_complete())
        else {
            return Ok(false);
        };
        attempt.user_answers = answers.to_vec();
        self.persist()?;
        Ok(true)
    }

    /// Seal the attempt with its final ledger and score. Returns the sealed
    /// attempt, or `None` if it is unknown or was already complete.
    pub fn complete(&mut self, id: &str, answers: Vec<UserAnswer>) -> Result<Option<&QuizAttempt>> {
        let Some(idx) = self.attempts.iter().position(|a| a.id == id) else {
            return Ok(None);
        };
        if !self.attempts[idx].finalize(answers, Utc::now()) {
            return Ok(None);
        }
        info!(id, score = ?self.attempts[idx].score, "attempt completed");
        self.persist()?;
        Ok(self.attempts.get(idx))
    }

    pub fn delete_by_knowledge_base(&mut self, base_id: &str) -> Result<usize> {
        let before = self.attempts.len();
        self.attempts.retain(|a| a.knowledge_base_id != base_id);
        let removed = before - self.attempts.len();
        if removed > 0 {
            info!(base = base_id, removed, "attempts removed with their knowledge base");
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        match &self.key {
            Some(key) => persist::save(self.kv.as_ref(), key, &self.attempts),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::bank::question::{KnowledgeBase, fixtures};
    use crate::session::settings::{QuizMode, QuizSettings};
    use crate::store::kv::MemoryKvStore;

    fn store_for(kv: &Rc<MemoryKvStore>) -> AttemptStore {
        let mut store = AttemptStore::new(kv.clone());
        store.hydrate(Some("a@x.io"));
        store
    }

    fn attempt_for(base: &KnowledgeBase) -> QuizAttempt {
        let answers = base.questions.iter().map(UserAnswer::unanswered).collect();
        QuizAttempt::start(
            base,
            QuizMode::Exam,
            QuizSettings::all_categories(base.questions.len(), 600),
            answers,
        )
    }

    #[test]
    fn test_update_answers_persists_partial_progress() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut store = store_for(&kv);
        let base = KnowledgeBase::new("B", fixtures::pool(3, 0));
        let attempt = attempt_for(&base);
        let id = attempt.id.clone();
        store.append(attempt).unwrap();

        let mut answers = store.get(&id).unwrap().user_answers.clone();
        answers[1].record(&base.questions[1], 0);
        assert!(store.update_answers(&id, &answers).unwrap());

        let reloaded = store_for(&kv);
        let restored = reloaded.get(&id).unwrap();
        assert!(!restored.is_complete());
        assert_eq!(restored.user_answers[1].selected_option_index, Some(0));
    }

    #[test]
    fn test_complete_scores_and_seals() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut store = store_for(&kv);
        let base = KnowledgeBase::new("B", fixtures::pool(10, 0));
        let attempt = attempt_for(&base);
        let id = attempt.id.clone();
        store.append(attempt).unwrap();

        let mut answers: Vec<UserAnswer> = base.questions.iter().map(UserAnswer::unanswered).collect();
        for (a, q) in answers.iter_mut().zip(&base.questions).take(7) {
            a.record(q, q.correct_answer_index);
        }
        let done = store.complete(&id, answers.clone()).unwrap().unwrap();
        assert_eq!(done.score, Some(70.0));
        assert!(done.completed_at.is_some());

        assert!(store.complete(&id, Vec::new()).unwrap().is_none());
        assert!(!store.update_answers(&id, &[]).unwrap());
        assert_eq!(store.get(&id).unwrap().score, Some(70.0));
        assert_eq!(store_for(&kv).get(&id).unwrap().score, Some(70.0));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut store = store_for(&kv);
        assert!(!store.update_answers("nope", &[]).unwrap());
        assert!(store.complete("nope", Vec::new()).unwrap().is_none());
    }

    #[test]
    fn test_delete_by_knowledge_base() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut store = store_for(&kv);
        let keep = KnowledgeBase::new("keep", fixtures::pool(1, 0));
        let drop = KnowledgeBase::new("drop", fixtures::pool(1, 0));
        store.append(attempt_for(&keep)).unwrap();
        store.append(attempt_for(&drop)).unwrap();
        store.append(attempt_for(&drop)).unwrap();

        assert_eq!(store.delete_by_knowledge_base(&drop.id).unwrap(), 2);
        let reloaded = store_for(&kv);
        assert_eq!(reloaded.attempts().len(), 1);
        assert!(
            reloaded
                .attempts()
                .iter()
                .all(|a| a.knowledge_base_id != drop.id)
        );
    }

    #[test]
    fn test_history_is_newest_first() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut store = store_for(&kv);
        let base = KnowledgeBase::new("B", fixtures::pool(1, 0));
        let mut older = attempt_for(&base);
        older.started_at = Utc::now() - Duration::hours(1);
        let older_id = older.id.clone();
        store.append(older).unwrap();
        let newer = attempt_for(&base);
        let newer_id = newer.id.clone();
        store.append(newer).unwrap();

        let history = store.history();
        assert_eq!(history[0].id, newer_id);
        assert_eq!(history[1].id, older_id);
    }
}

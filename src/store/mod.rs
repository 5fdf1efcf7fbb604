pub mod attempts;
pub mod knowledge_base;
pub mod kv;
pub mod persist;

use std::rc::Rc;

use anyhow::Result;

use crate::store::attempts::AttemptStore;
use crate::store::knowledge_base::KnowledgeBaseStore;
use crate::store::kv::KeyValueStore;

/// Both per-user collections, kept on the same identity.
pub struct UserLibrary {
    pub bases: KnowledgeBaseStore,
    pub attempts: AttemptStore,
}

impl UserLibrary {
    pub fn new(kv: Rc<dyn KeyValueStore>) -> Self {
        Self {
            bases: KnowledgeBaseStore::new(kv.clone()),
            attempts: AttemptStore::new(kv),
        }
    }

    pub fn hydrate(&mut self, identity: Option<&str>) {
        self.bases.hydrate(identity);
        self.attempts.hydrate(identity);
    }

    /// Remove a base and every attempt taken against it. Both collections
    /// change in memory even when a write fails; the first error is returned.
    pub fn delete_base(&mut self, id: &str) -> Result<bool> {
        let removed = self.bases.delete(id);
        let swept = self.attempts.delete_by_knowledge_base(id);
        let removed = removed?;
        swept?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::question::fixtures;
    use crate::store::attempts::attempts_key;
    use crate::store::knowledge_base::bases_key;
    use crate::session::answer::UserAnswer;
    use crate::session::attempt::QuizAttempt;
    use crate::session::settings::{QuizMode, QuizSettings};
    use crate::store::kv::{KeyValueStore, MemoryKvStore};

    /// Rejects writes to the bases collection.
    struct ReadOnlyBases(MemoryKvStore);

    impl KeyValueStore for ReadOnlyBases {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key.contains("_bases_") {
                anyhow::bail!("disk full");
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_delete_base_cascades_to_attempts() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut library = UserLibrary::new(kv.clone());
        library.hydrate(Some("a@x.io"));

        let doomed = library.bases.create("Doomed", fixtures::pool(2, 0)).unwrap();
        let kept = library.bases.create("Kept", fixtures::pool(2, 0)).unwrap();
        for base in [&doomed, &kept, &doomed] {
            let answers = base.questions.iter().map(UserAnswer::unanswered).collect();
            let attempt = QuizAttempt::start(
                base,
                QuizMode::Study,
                QuizSettings::all_categories(2, 60),
                answers,
            );
            library.attempts.append(attempt).unwrap();
        }

        assert!(library.delete_base(&doomed.id).unwrap());

        let mut reloaded = UserLibrary::new(kv);
        reloaded.hydrate(Some("a@x.io"));
        assert!(reloaded.bases.select(&doomed.id).is_none());
        assert_eq!(reloaded.attempts.attempts().len(), 1);
        assert!(
            reloaded
                .attempts
                .attempts()
                .iter()
                .all(|a| a.knowledge_base_id != doomed.id)
        );
    }

    #[test]
    fn test_delete_unknown_base_still_sweeps_orphans() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut library = UserLibrary::new(kv);
        library.hydrate(Some("a@x.io"));
        let base = library.bases.create("Gone", fixtures::pool(1, 0)).unwrap();
        let attempt = QuizAttempt::start(
            &base,
            QuizMode::Exam,
            QuizSettings::all_categories(1, 60),
            vec![UserAnswer::unanswered(&base.questions[0])],
        );
        library.attempts.append(attempt).unwrap();
        library.bases.delete(&base.id).unwrap();

        assert!(!library.delete_base(&base.id).unwrap());
        assert!(library.attempts.attempts().is_empty());
    }

    #[test]
    fn test_failed_base_write_still_drops_its_attempts() {
        let kv = Rc::new(MemoryKvStore::new());
        let mut library = UserLibrary::new(kv.clone());
        library.hydrate(Some("a@x.io"));
        let base = library.bases.create("Doomed", fixtures::pool(2, 0)).unwrap();
        let attempt = QuizAttempt::start(
            &base,
            QuizMode::Study,
            QuizSettings::all_categories(2, 60),
            base.questions.iter().map(UserAnswer::unanswered).collect(),
        );
        library.attempts.append(attempt).unwrap();

        let inner = MemoryKvStore::new();
        for key in [bases_key("a@x.io"), attempts_key("a@x.io")] {
            inner.set(&key, &kv.get(&key).unwrap().unwrap()).unwrap();
        }
        let mut flaky = UserLibrary::new(Rc::new(ReadOnlyBases(inner)));
        flaky.hydrate(Some("a@x.io"));

        assert!(flaky.delete_base(&base.id).is_err());
        assert!(flaky.bases.is_empty());
        assert!(
            flaky
                .attempts
                .attempts()
                .iter()
                .all(|a| a.knowledge_base_id != base.id)
        );
    }
}

use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, info};

use crate::bank::question::{KnowledgeBase, Question};
use crate::store::kv::KeyValueStore;
use crate::store::persist::{self, STORAGE_VERSION};

pub fn bases_key(identity: &str) -> String {
    format!(
        "quizmaster_v{STORAGE_VERSION}_bases_{}",
        identity.trim().to_lowercase()
    )
}

pub struct KnowledgeBaseStore {
    kv: Rc<dyn KeyValueStore>,
    key: Option<String>,
    bases: Vec<KnowledgeBase>,
}

impl KnowledgeBaseStore {
    pub fn new(kv: Rc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: None,
            bases: Vec::new(),
        }
    }

    /// Drop in-memory state and load the collection of `identity`.
    pub fn hydrate(&mut self, identity: Option<&str>) {
        self.key = identity.map(bases_key);
        self.bases = match &self.key {
            Some(key) => persist::load(self.kv.as_ref(), key, Vec::new()),
            None => Vec::new(),
        };
        debug!(count = self.bases.len(), "knowledge bases hydrated");
    }

    pub fn bases(&self) -> &[KnowledgeBase] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn create(&mut self, name: &str, questions: Vec<Question>) -> Result<KnowledgeBase> {
        let base = KnowledgeBase::new(name, questions);
        self.bases.push(base.clone());
        info!(id = %base.id, name, questions = base.questions.len(), "knowledge base created");
        self.persist()?;
        Ok(base)
    }

    pub fn select(&self, id: &str) -> Option<&KnowledgeBase> {
        self.bases.iter().find(|b| b.id == id)
    }

    /// Returns false, without writing, when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.bases.len();
        self.bases.retain(|b| b.id != id);
        if self.bases.len() == before {
            return Ok(false);
        }
        info!(id, "knowledge base deleted");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        match &self.key {
            Some(key) => persist::save(self.kv.as_ref(), key, &self.bases),
            None => Ok(()),
        }
    }
}

pub mod import;
pub mod question;

pub use question::{KnowledgeBase, Question};

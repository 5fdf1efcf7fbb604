use std::io;
use std::path::MAIN_SEPARATOR;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const MAX_SCANNED_ENTRIES: usize = 1000;
const MAX_COMPLETIONS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field. Path fields additionally cycle Tab completions
/// through directories and `.json` files.
pub struct LineInput {
    text: String,
    /// Char index; 0 is before the first char.
    cursor: usize,
    path_completion: bool,
    completions: Vec<String>,
    completion_index: Option<usize>,
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            path_completion: false,
            completions: Vec::new(),
            completion_index: None,
            completion_error: false,
        }
    }

    pub fn for_path(text: &str) -> Self {
        Self {
            path_completion: true,
            ..Self::new(text)
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// (before cursor, char under cursor, after cursor). The middle part is
    /// `None` when the cursor sits past the end.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let at = self.byte_at(self.cursor);
        match self.text[at..].chars().next() {
            Some(ch) => (&self.text[..at], Some(ch), &self.text[at + ch.len_utf8()..]),
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.reset_completion();
        }

        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove_at(self.cursor);
            }
            KeyCode::Delete => self.remove_at(self.cursor),
            KeyCode::Tab if self.path_completion => self.cycle_completion(true),
            KeyCode::BackTab if self.path_completion => self.cycle_completion(false),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => {
                let at = self.byte_at(self.cursor);
                self.text.insert(at, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(b, _)| b)
    }

    fn remove_at(&mut self, char_idx: usize) {
        let at = self.byte_at(char_idx);
        if let Some(ch) = self.text[at..].chars().next() {
            self.text.replace_range(at..at + ch.len_utf8(), "");
        }
    }

    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let (from, to) = (self.byte_at(start), self.byte_at(self.cursor));
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    fn reset_completion(&mut self) {
        self.completions.clear();
        self.completion_index = None;
        self.completion_error = false;
    }

    fn cycle_completion(&mut self, forward: bool) {
        if self.cursor < self.len() {
            return;
        }
        let next = match self.completion_index {
            None => {
                self.completions = self.scan_completions();
                if self.completions.is_empty() {
                    return;
                }
                0
            }
            Some(idx) => {
                let count = self.completions.len();
                if forward {
                    (idx + 1) % count
                } else {
                    (idx + count - 1) % count
                }
            }
        };
        self.completion_index = Some(next);
        self.text = self.completions[next].clone();
        self.cursor = self.len();
    }

    fn scan_completions(&mut self) -> Vec<String> {
        let seed = self.text.clone();
        let split = seed.rfind(['/', '\\']).map(|pos| pos + 1).unwrap_or(0);
        let (dir, partial) = seed.split_at(split);

        let lookup_dir = match dir.strip_prefix('~') {
            Some(rest) => dirs::home_dir()
                .map(|home| format!("{}{rest}", home.to_string_lossy()))
                .unwrap_or_else(|| dir.to_string()),
            None if dir.is_empty() => ".".to_string(),
            None => dir.to_string(),
        };

        match std::fs::read_dir(&lookup_dir) {
            Ok(entries) => {
                let entries = entries.map(|entry| {
                    entry.map(|e| {
                        let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
                        (e.file_name().to_string_lossy().to_string(), is_dir)
                    })
                });
                self.filter_completions(entries, dir, partial)
            }
            Err(_) => {
                self.completion_error = true;
                Vec::new()
            }
        }
    }

    /// Directories first, then `.json` files, each alphabetical. Hidden
    /// entries only match a partial that starts with a dot.
    fn filter_completions(
        &mut self,
        entries: impl Iterator<Item = io::Result<(String, bool)>>,
        dir: &str,
        partial: &str,
    ) -> Vec<String> {
        let show_hidden = partial.starts_with('.');
        let mut found: Vec<(bool, String)> = Vec::new();

        for entry in entries.take(MAX_SCANNED_ENTRIES) {
            let Ok((name, is_dir)) = entry else {
                self.completion_error = true;
                return Vec::new();
            };
            if (!show_hidden && name.starts_with('.')) || !name.starts_with(partial) {
                continue;
            }
            if is_dir {
                found.push((true, format!("{dir}{name}{MAIN_SEPARATOR}")));
            } else if name.to_ascii_lowercase().ends_with(".json") {
                found.push((false, format!("{dir}{name}")));
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        found.truncate(MAX_COMPLETIONS);
        found.into_iter().map(|(_, path)| path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, s: &str) {
        for ch in s.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_typing_and_cursor_movement() {
        let mut input = LineInput::new("");
        type_str(&mut input, "sam@x.io");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Delete));
        input.handle(key(KeyCode::Char('p')));
        assert_eq!(input.value(), "pam@x.io");
        assert_eq!(input.render_parts(), ("p", Some('a'), "m@x.io"));
    }

    #[test]
    fn test_backspace_handles_multibyte_chars() {
        let mut input = LineInput::new("café");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let mut input = LineInput::new("questions/physics set.json");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "questions/physics ");
        input.handle(ctrl('a'));
        assert_eq!(input.render_parts().0, "");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = LineInput::new("x");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.handle(key(KeyCode::Char('y'))), InputResult::Continue);
    }

    #[test]
    fn test_tab_ignored_outside_path_fields() {
        let mut input = LineInput::new("abc");
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn test_completion_lists_dirs_then_json_files() {
        let mut input = LineInput::for_path("");
        let entries = vec![
            Ok(("notes.txt".to_string(), false)),
            Ok(("physics.json".to_string(), false)),
            Ok(("banks".to_string(), true)),
            Ok((".hidden.json".to_string(), false)),
            Ok(("algebra.JSON".to_string(), false)),
        ];
        let found = input.filter_completions(entries.into_iter(), "q/", "");
        assert_eq!(
            found,
            vec![
                format!("q/banks{MAIN_SEPARATOR}"),
                "q/algebra.JSON".to_string(),
                "q/physics.json".to_string(),
            ]
        );
    }

    #[test]
    fn test_completion_read_error_sets_flag() {
        let mut input = LineInput::for_path("");
        let entries = vec![
            Ok(("a.json".to_string(), false)),
            Err(io::Error::other("denied")),
        ];
        assert!(input.filter_completions(entries.into_iter(), "", "").is_empty());
        assert!(input.completion_error);
    }

    #[test]
    fn test_tab_cycles_real_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("alpha.json"), "[]").unwrap();
        std::fs::write(dir.path().join("beta.json"), "[]").unwrap();
        let base = format!("{}{MAIN_SEPARATOR}", dir.path().display());

        let mut input = LineInput::for_path(&base);
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), format!("{base}alpha.json"));
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), format!("{base}beta.json"));
        input.handle(key(KeyCode::BackTab));
        assert_eq!(input.value(), format!("{base}alpha.json"));
    }
}

//! Single-line text input state with cursor handling.

use crossterm::event::KeyCode;

/// A text input field with encapsulated state.
///
/// Wraps the text and cursor position (in characters) behind a small API so
/// screens never index into the string directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
    }

    /// Delete the character at the cursor position.
    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let char_count = self.text.chars().count();
        if self.cursor < char_count {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Handle a key code event.
    ///
    /// Returns true if the text itself changed (cursor-only movement
    /// returns false).
    pub fn handle_key(&mut self, key_code: KeyCode) -> bool {
        match key_code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                let had_text = self.cursor > 0;
                self.backspace();
                had_text
            }
            KeyCode::Delete => {
                let had_text = self.cursor < self.text.chars().count();
                self.delete();
                had_text
            }
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.move_home();
                false
            }
            KeyCode::End => {
                self.move_end();
                false
            }
            _ => false,
        }
    }

    /// Byte offset of the given character position.
    fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut input = TextInput::new();
        input.insert_char('h');
        input.insert_char('i');
        assert_eq!(input.text(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_insert_mid_string() {
        let mut input = TextInput::new();
        input.insert_char('a');
        input.insert_char('c');
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = TextInput::new();
        input.insert_char('x');
        input.move_home();
        input.backspace();
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_handle_key_reports_text_changes() {
        let mut input = TextInput::new();
        assert!(input.handle_key(KeyCode::Char('a')));
        assert!(!input.handle_key(KeyCode::Left));
        assert!(input.handle_key(KeyCode::Delete)); // cursor sits on 'a'
        assert!(!input.handle_key(KeyCode::Backspace)); // nothing left to delete
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = TextInput::new();
        input.insert_char('é');
        input.insert_char('ß');
        input.backspace();
        assert_eq!(input.text(), "é");
        assert_eq!(input.cursor(), 1);
    }
}

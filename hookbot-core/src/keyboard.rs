//! Inline keyboard builder.
//!
//! Buttons go into the current row; [`KeyboardBuilder::commit_row`] moves the current row onto
//! the committed rows. Only committed rows are sent. No width or size limits are enforced;
//! the Bot API rejects oversized keyboards itself.

use serde::{Deserialize, Serialize};

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// `reply_markup` payload: rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboardMarkup {
    pub fn is_empty(&self) -> bool {
        self.inline_keyboard.is_empty()
    }
}

/// In-progress keyboard: the current (uncommitted) row plus committed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardBuilder {
    current_row: Vec<InlineButton>,
    rows: Vec<Vec<InlineButton>>,
}

impl KeyboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a button to the current row.
    pub fn add_button(&mut self, text: impl Into<String>, callback_data: impl Into<String>) {
        self.current_row.push(InlineButton::new(text, callback_data));
    }

    /// Pushes the current row onto the committed rows and starts a new one.
    /// An empty current row is committed as an empty row.
    pub fn commit_row(&mut self) {
        self.rows.push(std::mem::take(&mut self.current_row));
    }

    /// Discards committed rows and the current row.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.current_row.clear();
    }

    /// Committed rows, in commit order.
    pub fn rows(&self) -> &[Vec<InlineButton>] {
        &self.rows
    }

    /// Buttons added since the last commit.
    pub fn current_row(&self) -> &[InlineButton] {
        &self.current_row
    }

    /// True when no row has been committed. Uncommitted buttons do not count.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot of the committed rows as wire markup; `None` when nothing is committed.
    pub fn markup(&self) -> Option<InlineKeyboardMarkup> {
        if self.rows.is_empty() {
            return None;
        }
        Some(InlineKeyboardMarkup {
            inline_keyboard: self.rows.clone(),
        })
    }

    /// Chaining form of [`add_button`](Self::add_button) for building markup per call.
    pub fn button(mut self, text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        self.add_button(text, callback_data);
        self
    }

    /// Chaining form of [`commit_row`](Self::commit_row).
    pub fn row(mut self) -> Self {
        self.commit_row();
        self
    }

    /// Commits a pending non-empty row and returns the markup.
    pub fn build(mut self) -> InlineKeyboardMarkup {
        if !self.current_row.is_empty() {
            self.commit_row();
        }
        InlineKeyboardMarkup {
            inline_keyboard: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_preserve_call_order() {
        let mut kb = KeyboardBuilder::new();
        kb.add_button("A", "a");
        kb.add_button("B", "b");
        kb.commit_row();
        kb.add_button("C", "c");
        kb.commit_row();

        let labels: Vec<Vec<&str>> = kb
            .rows()
            .iter()
            .map(|row| row.iter().map(|b| b.text.as_str()).collect())
            .collect();
        assert_eq!(labels, vec![vec!["A", "B"], vec!["C"]]);
        assert!(kb.current_row().is_empty());
    }

    #[test]
    fn test_uncommitted_buttons_are_not_in_markup() {
        let mut kb = KeyboardBuilder::new();
        kb.add_button("A", "a");
        assert!(kb.is_empty());
        assert!(kb.markup().is_none());
        assert_eq!(kb.current_row().len(), 1);
    }

    #[test]
    fn test_empty_row_commit_is_kept() {
        let mut kb = KeyboardBuilder::new();
        kb.commit_row();
        assert_eq!(kb.rows().len(), 1);
        assert!(kb.rows()[0].is_empty());
        assert_eq!(kb.markup().unwrap().inline_keyboard, vec![Vec::<InlineButton>::new()]);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut kb = KeyboardBuilder::new();
        kb.add_button("A", "a");
        kb.commit_row();
        kb.add_button("B", "b");
        kb.clear();
        assert!(kb.is_empty());
        assert!(kb.current_row().is_empty());
        assert!(kb.markup().is_none());
    }

    #[test]
    fn test_markup_json_shape() {
        let markup = KeyboardBuilder::new().button("Yes", "y").button("No", "n").build();
        let json = serde_json::to_string(&markup).unwrap();
        assert_eq!(
            json,
            r#"{"inline_keyboard":[[{"text":"Yes","callback_data":"y"},{"text":"No","callback_data":"n"}]]}"#
        );
    }

    #[test]
    fn test_chained_rows() {
        let markup = KeyboardBuilder::new()
            .button("1", "one")
            .row()
            .button("2", "two")
            .button("3", "three")
            .build();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[1][1], InlineButton::new("3", "three"));
    }
}

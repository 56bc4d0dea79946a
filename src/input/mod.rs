use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::AppState;

/// Actions that can result from key input.
#[derive(Debug, PartialEq)]
pub enum InputAction {
    None,
    /// Enter without Shift/Alt. The input is left in place for the caller.
    Submit,
    Quit,
    ScrollUp,
    ScrollDown,
    ScrollToBottom,
    Clear,
    ToggleTheme,
    Upload,
}

/// Process a key event and return the resulting action.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> InputAction {
    match (key.modifiers, key.code) {
        // Ctrl+C → quit
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => InputAction::Quit,
        // Ctrl+L → clear log
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => InputAction::Clear,
        // Ctrl+T → toggle theme
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => InputAction::ToggleTheme,
        // Ctrl+O → upload selected files
        (KeyModifiers::CONTROL, KeyCode::Char('o')) => InputAction::Upload,

        // Shift+Enter / Alt+Enter → literal newline
        (m, KeyCode::Enter) if m.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            insert_char(state, '\n');
            InputAction::None
        }

        // Enter → submit
        (_, KeyCode::Enter) => {
            if state.input.trim().is_empty() {
                return InputAction::None;
            }
            InputAction::Submit
        }

        // Backspace
        (_, KeyCode::Backspace) => {
            if state.cursor_pos > 0 {
                let start = byte_idx(&state.input, state.cursor_pos - 1);
                let end = byte_idx(&state.input, state.cursor_pos);
                state.input.replace_range(start..end, "");
                state.cursor_pos -= 1;
            }
            InputAction::None
        }

        // Delete
        (_, KeyCode::Delete) => {
            let char_count = state.input.chars().count();
            if state.cursor_pos < char_count {
                let start = byte_idx(&state.input, state.cursor_pos);
                let end = byte_idx(&state.input, state.cursor_pos + 1);
                state.input.replace_range(start..end, "");
            }
            InputAction::None
        }

        // Left arrow
        (_, KeyCode::Left) => {
            if state.cursor_pos > 0 {
                state.cursor_pos -= 1;
            }
            InputAction::None
        }

        // Right arrow
        (_, KeyCode::Right) => {
            let char_count = state.input.chars().count();
            if state.cursor_pos < char_count {
                state.cursor_pos += 1;
            }
            InputAction::None
        }

        // Home / Ctrl+A → start of current line
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            state.cursor_pos = line_start(&state.input, state.cursor_pos);
            InputAction::None
        }

        // Ctrl+End → jump to newest message
        (KeyModifiers::CONTROL, KeyCode::End) => InputAction::ScrollToBottom,

        // End / Ctrl+E → end of current line
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            state.cursor_pos = line_end(&state.input, state.cursor_pos);
            InputAction::None
        }

        // Up arrow → previous line, or history on a single line
        (_, KeyCode::Up) => {
            if !move_vertical(state, -1) {
                state.history_up();
            }
            InputAction::None
        }

        // Down arrow → next line, or history on a single line
        (_, KeyCode::Down) => {
            if !move_vertical(state, 1) {
                state.history_down();
            }
            InputAction::None
        }

        // PageUp → scroll
        (_, KeyCode::PageUp) => InputAction::ScrollUp,

        // PageDown → scroll
        (_, KeyCode::PageDown) => InputAction::ScrollDown,

        // Ctrl+U → clear input
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            state.clear_input();
            InputAction::None
        }

        // Ctrl+W → delete word backwards
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            if state.cursor_pos > 0 {
                let before: String = state.input.chars().take(state.cursor_pos).collect();
                let trimmed = before.trim_end();
                let new_end = trimmed
                    .rfind(|c: char| c == ' ' || c == '\n')
                    .map(|i| trimmed[..i].chars().count() + 1)
                    .unwrap_or(0);
                let after: String = state.input.chars().skip(state.cursor_pos).collect();
                let new_before: String = state.input.chars().take(new_end).collect();
                state.input = format!("{}{}", new_before, after);
                state.cursor_pos = new_end;
            }
            InputAction::None
        }

        // Regular character
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            insert_char(state, c);
            // Typing jumps to bottom
            state.log.scroll_to_bottom();
            InputAction::None
        }

        _ => InputAction::None,
    }
}

fn byte_idx(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn insert_char(state: &mut AppState, c: char) {
    let idx = byte_idx(&state.input, state.cursor_pos);
    state.input.insert(idx, c);
    state.cursor_pos += 1;
}

/// Char position of the first char on the cursor's line.
fn line_start(input: &str, cursor: usize) -> usize {
    input
        .chars()
        .take(cursor)
        .collect::<Vec<_>>()
        .iter()
        .rposition(|&c| c == '\n')
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Char position of the newline (or end of input) ending the cursor's line.
fn line_end(input: &str, cursor: usize) -> usize {
    input
        .chars()
        .skip(cursor)
        .position(|c| c == '\n')
        .map(|i| cursor + i)
        .unwrap_or_else(|| input.chars().count())
}

/// Move the cursor one line up (`-1`) or down (`1`), keeping the column.
/// Returns false when there is no line in that direction.
fn move_vertical(state: &mut AppState, dir: i32) -> bool {
    let start = line_start(&state.input, state.cursor_pos);
    let col = state.cursor_pos - start;

    let target_start = if dir < 0 {
        if start == 0 {
            return false;
        }
        line_start(&state.input, start - 1)
    } else {
        let end = line_end(&state.input, state.cursor_pos);
        if end >= state.input.chars().count() {
            return false;
        }
        end + 1
    };

    let target_end = line_end(&state.input, target_start);
    state.cursor_pos = (target_start + col).min(target_end);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::test_state;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_mod(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_str(state: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(key(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn test_enter_submits_without_clearing() {
        let mut state = test_state();
        type_str(&mut state, "hi");
        assert_eq!(handle_key(key(KeyCode::Enter), &mut state), InputAction::Submit);
        assert_eq!(state.input, "hi");
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let mut state = test_state();
        type_str(&mut state, "   ");
        assert_eq!(handle_key(key(KeyCode::Enter), &mut state), InputAction::None);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut state = test_state();
        type_str(&mut state, "a");
        let action = handle_key(key_mod(KeyCode::Enter, KeyModifiers::SHIFT), &mut state);
        assert_eq!(action, InputAction::None);
        type_str(&mut state, "b");
        assert_eq!(state.input, "a\nb");
        assert_eq!(state.input_lines(), 2);
    }

    #[test]
    fn test_control_shortcuts() {
        let mut state = test_state();
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(handle_key(key_mod(KeyCode::Char('t'), ctrl), &mut state), InputAction::ToggleTheme);
        assert_eq!(handle_key(key_mod(KeyCode::Char('o'), ctrl), &mut state), InputAction::Upload);
        assert_eq!(handle_key(key_mod(KeyCode::Char('c'), ctrl), &mut state), InputAction::Quit);
        assert_eq!(handle_key(key_mod(KeyCode::Char('x'), ctrl), &mut state), InputAction::None);
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut state = test_state();
        type_str(&mut state, "chào");
        handle_key(key(KeyCode::Left), &mut state);
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.input, "cho");
        assert_eq!(state.cursor_pos, 2);
    }

    #[test]
    fn test_ctrl_w_deletes_word() {
        let mut state = test_state();
        type_str(&mut state, "hello big world");
        handle_key(key_mod(KeyCode::Char('w'), KeyModifiers::CONTROL), &mut state);
        assert_eq!(state.input, "hello big ");
        assert_eq!(state.cursor_pos, 10);
    }

    #[test]
    fn test_vertical_movement_between_lines() {
        let mut state = test_state();
        state.input = "abcd\nxy".into();
        state.cursor_pos = 7;

        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.cursor_pos, 2);
        handle_key(key(KeyCode::End), &mut state);
        assert_eq!(state.cursor_pos, 4);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.cursor_pos, 7);
        handle_key(key(KeyCode::Home), &mut state);
        assert_eq!(state.cursor_pos, 5);
    }

    #[test]
    fn test_up_on_single_line_recalls_history() {
        let mut state = test_state();
        state.push_history("earlier".into());
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.input, "earlier");
    }
}

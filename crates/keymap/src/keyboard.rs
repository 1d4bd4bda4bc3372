//! The keyboard invoker: key-combo bindings plus undo/redo history.
//!
//! The keyboard owns the binding table and both history stacks
//! exclusively; the editor is borrowed per call, never stored. Commands
//! are plain `Copy` values, so the table and the stacks hold independent
//! copies: rebinding a key never rewrites history entries that were
//! pushed while the old binding was active.

use crate::command::Command;
use crate::store::KeyboardState;
use editor::Editor;
use indexmap::IndexMap;

/// Maps key combos to bound commands and tracks undo/redo history.
#[derive(Default)]
pub struct Keyboard {
    bindings: IndexMap<String, Command>,
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `combo` to `command`, replacing any previous binding for the
    /// same combo. History is not touched.
    pub fn bind(&mut self, combo: impl Into<String>, command: Command) {
        self.bindings.insert(combo.into(), command);
    }

    /// Dispatch a key press.
    ///
    /// A bound combo applies its command, pushes it onto the undo stack,
    /// and clears the redo stack (history never branches). An unbound
    /// combo is a no-op: nothing mutates, nothing is pushed, and the miss
    /// is only reported. Returns whether a command was dispatched.
    pub fn press(&mut self, combo: &str, editor: &mut Editor) -> bool {
        let Some(&command) = self.bindings.get(combo) else {
            tracing::warn!("no command bound to {combo:?}");
            return false;
        };

        command.apply(editor);
        self.undo_stack.push(command);
        self.redo_stack.clear();
        true
    }

    /// Invert the most recently executed command, moving it onto the redo
    /// stack. Returns false (and does nothing) when there is nothing to
    /// undo.
    pub fn undo(&mut self, editor: &mut Editor) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        command.invert(editor);
        self.redo_stack.push(command);
        true
    }

    /// Re-apply the most recently undone command, moving it back onto the
    /// undo stack. Returns false (and does nothing) when there is nothing
    /// to redo.
    pub fn redo(&mut self, editor: &mut Editor) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        command.apply(editor);
        self.undo_stack.push(command);
        true
    }

    /// Snapshot the binding table as persisted descriptors. History is
    /// never exported.
    pub fn export_state(&self) -> KeyboardState {
        self.bindings
            .iter()
            .map(|(combo, command)| (combo.clone(), command.describe()))
            .collect()
    }

    /// Replace the entire binding table from a persisted snapshot.
    ///
    /// Every entry goes through the command factory; entries the factory
    /// rejects (unknown tag, malformed params) are skipped with a warning
    /// rather than failing the whole import. Both history stacks are
    /// cleared; history does not survive a full rebind. Returns the
    /// number of bindings imported.
    pub fn import_state(&mut self, state: &KeyboardState) -> usize {
        self.bindings.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();

        for (combo, descriptor) in state.iter() {
            match Command::from_descriptor(descriptor) {
                Ok(command) => {
                    self.bindings.insert(combo.clone(), command);
                }
                Err(err) => {
                    tracing::warn!("skipping persisted binding for {combo:?}: {err}");
                }
            }
        }
        self.bindings.len()
    }

    pub fn is_bound(&self, combo: &str) -> bool {
        self.bindings.contains_key(combo)
    }

    /// Iterate over the current bindings in insertion order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.bindings.iter().map(|(combo, command)| (combo.as_str(), command))
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandDescriptor;
    use editor::MemoryTranscript;
    use serde_json::json;

    fn test_editor() -> Editor {
        Editor::new(Box::new(MemoryTranscript::new()))
    }

    #[test]
    fn press_undo_redo_scenario() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));

        keyboard.press("a", &mut editor);
        keyboard.press("a", &mut editor);
        keyboard.press("a", &mut editor);
        assert_eq!(editor.text(), "aaa");

        assert!(keyboard.undo(&mut editor));
        assert!(keyboard.undo(&mut editor));
        assert_eq!(editor.text(), "a");

        assert!(keyboard.redo(&mut editor));
        assert_eq!(editor.text(), "aa");
    }

    #[test]
    fn volume_clamp_scenario() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("ctrl++", Command::VolumeUp { step: 20 });

        keyboard.press("ctrl++", &mut editor);
        keyboard.press("ctrl++", &mut editor);
        keyboard.press("ctrl++", &mut editor);
        // 50 + 20 + 20 + 20 clamps at 100, not 110.
        assert_eq!(editor.volume(), 100);

        // The inverse of the last apply uses the fixed step, so this is
        // 100 - 20, not a reversal of the clamped delta back to 90.
        keyboard.undo(&mut editor);
        assert_eq!(editor.volume(), 80);
    }

    #[test]
    fn undo_everything_restores_initial_state_away_from_clamp() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));
        keyboard.bind("up", Command::VolumeUp { step: 10 });
        keyboard.bind("play", Command::MediaToggle);

        for combo in ["a", "up", "play", "a", "up"] {
            keyboard.press(combo, &mut editor);
        }
        while keyboard.undo(&mut editor) {}

        assert_eq!(editor.text(), "");
        assert_eq!(editor.volume(), 50);
        assert!(!editor.is_media_playing());
    }

    #[test]
    fn press_clears_the_redo_stack() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));
        keyboard.bind("b", Command::PrintChar('b'));

        keyboard.press("a", &mut editor);
        keyboard.press("b", &mut editor);
        keyboard.undo(&mut editor);
        assert_eq!(keyboard.redo_depth(), 1);

        keyboard.press("a", &mut editor);
        assert_eq!(keyboard.redo_depth(), 0);
        assert!(!keyboard.redo(&mut editor));
        assert_eq!(editor.text(), "aa");
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_noops() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();

        assert!(!keyboard.undo(&mut editor));
        assert!(!keyboard.redo(&mut editor));
        assert_eq!(editor.text(), "");
        assert_eq!(editor.volume(), 50);
    }

    #[test]
    fn unbound_press_changes_nothing() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));
        keyboard.press("a", &mut editor);

        assert!(!keyboard.press("q", &mut editor));
        assert_eq!(editor.text(), "a");
        assert_eq!(keyboard.undo_depth(), 1);
        assert_eq!(keyboard.redo_depth(), 0);
    }

    #[test]
    fn rebinding_replaces_the_binding_but_not_history() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));
        keyboard.press("a", &mut editor);

        keyboard.bind("a", Command::PrintChar('z'));
        keyboard.press("a", &mut editor);
        assert_eq!(editor.text(), "az");

        // The first history entry still inverts the 'a' press even though
        // the key now means something else.
        keyboard.undo(&mut editor);
        keyboard.undo(&mut editor);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn export_then_import_preserves_bindings_and_clears_history() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));
        keyboard.bind("ctrl+p", Command::MediaToggle);
        keyboard.press("a", &mut editor);

        let state = keyboard.export_state();
        let imported = keyboard.import_state(&state);

        assert_eq!(imported, 2);
        assert_eq!(keyboard.export_state(), state);
        assert_eq!(keyboard.undo_depth(), 0);
        assert_eq!(keyboard.redo_depth(), 0);
    }

    #[test]
    fn import_skips_unrecognized_entries_and_keeps_the_rest() {
        let state: KeyboardState = [
            (
                "ctrl+x".to_string(),
                CommandDescriptor {
                    tag: "Teleport".to_string(),
                    params: json!({}),
                },
            ),
            (
                "ctrl+p".to_string(),
                CommandDescriptor {
                    tag: "MediaToggle".to_string(),
                    params: json!({}),
                },
            ),
        ]
        .into_iter()
        .collect();

        let mut keyboard = Keyboard::new();
        let imported = keyboard.import_state(&state);

        assert_eq!(imported, 1);
        assert!(keyboard.is_bound("ctrl+p"));
        assert!(!keyboard.is_bound("ctrl+x"));
    }

    #[test]
    fn history_is_never_exported() {
        let mut editor = test_editor();
        let mut keyboard = Keyboard::new();
        keyboard.bind("a", Command::PrintChar('a'));
        keyboard.press("a", &mut editor);

        let state = keyboard.export_state();
        assert_eq!(state.len(), 1);
        assert!(state.get("a").is_some());
    }
}

//! Keybinding command dispatch with undo/redo history and persisted state.
//!
//! The crate is built around three pieces: reversible [`Command`] values
//! that mutate an [`editor::Editor`] and describe themselves for
//! persistence, the [`Keyboard`] invoker that maps key combos to bound
//! commands and owns the undo/redo stacks, and the [`StateStore`] that
//! moves the binding table to and from a JSON snapshot on disk.
//!
//! # Example
//!
//! ```
//! use editor::{Editor, MemoryTranscript};
//! use keymap::{Command, Keyboard};
//!
//! let mut editor = Editor::new(Box::new(MemoryTranscript::new()));
//! let mut keyboard = Keyboard::new();
//!
//! keyboard.bind("a", Command::PrintChar('a'));
//! keyboard.press("a", &mut editor);
//! assert_eq!(editor.text(), "a");
//!
//! keyboard.undo(&mut editor);
//! assert_eq!(editor.text(), "");
//! ```

pub mod command;
pub mod keyboard;
pub mod store;

pub use command::{Command, CommandDescriptor, CommandError, DEFAULT_VOLUME_STEP};
pub use keyboard::Keyboard;
pub use store::{KeyboardState, StateError, StateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

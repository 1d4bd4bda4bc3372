//! Line-oriented console around the keyboard invoker.
//!
//! Reads key combos from stdin and dispatches them; `undo`, `redo`, and
//! `exit` are reserved tokens intercepted before dispatch. Bindings are
//! restored from the snapshot file on startup and saved back on exit, so
//! the bound-key table survives restarts. History does not.

use anyhow::{Context as _, Result};
use clap::Parser;
use editor::{Editor, FileTranscript};
use keymap::{Command, Keyboard, StateStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path of the persisted keybinding snapshot.
    #[arg(long, default_value = "keyboard_state.json")]
    state: PathBuf,

    /// Path of the append-only editor transcript.
    #[arg(long, default_value = "output.txt")]
    transcript: PathBuf,

    /// Do not install the default bindings when the snapshot is empty.
    #[arg(long)]
    no_defaults: bool,
}

fn main() -> Result<()> {
    // Log to stderr so the prompt on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let transcript = FileTranscript::open(&args.transcript).with_context(|| {
        format!("failed to open transcript at {}", args.transcript.display())
    })?;
    let mut editor = Editor::new(Box::new(transcript));
    let mut keyboard = Keyboard::new();

    let store = StateStore::new(&args.state);
    match store.load() {
        Ok(state) => {
            let imported = keyboard.import_state(&state);
            if imported > 0 {
                tracing::info!("restored {imported} bindings from {}", store.path().display());
            }
        }
        // A corrupt snapshot must not take the session down; start fresh
        // and leave the file untouched until the next save.
        Err(err) => tracing::error!("ignoring persisted state: {err}"),
    }

    if keyboard.bindings().next().is_none() && !args.no_defaults {
        install_default_bindings(&mut keyboard);
    }

    run_loop(&mut keyboard, &mut editor)?;

    store
        .save(&keyboard.export_state())
        .with_context(|| format!("failed to save bindings to {}", store.path().display()))?;
    Ok(())
}

/// The stock layout: a handful of letters, volume steps of 20, and two
/// combos for the media player.
fn install_default_bindings(keyboard: &mut Keyboard) {
    for c in ['a', 'b', 'c', 'd', 'e'] {
        keyboard.bind(c.to_string(), Command::PrintChar(c));
    }
    keyboard.bind("ctrl++", Command::VolumeUp { step: 20 });
    keyboard.bind("ctrl+-", Command::VolumeDown { step: 20 });
    keyboard.bind("ctrl+p", Command::MediaToggle);
    keyboard.bind("ctrl+alt+p", Command::MediaToggle);
}

/// Read tokens until `exit` or end of input. Returns on read errors.
fn run_loop(keyboard: &mut Keyboard, editor: &mut Editor) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            // EOF behaves like `exit`: the caller still saves.
            break;
        };
        let line = line.context("failed to read from stdin")?;
        let token = line.trim();

        match token {
            "" => {}
            "exit" => break,
            "undo" => {
                if !keyboard.undo(editor) {
                    writeln!(stdout, "nothing to undo")?;
                }
            }
            "redo" => {
                if !keyboard.redo(editor) {
                    writeln!(stdout, "nothing to redo")?;
                }
            }
            combo => {
                if keyboard.press(combo, editor) {
                    writeln!(stdout, "{}", status_line(editor))?;
                } else {
                    writeln!(stdout, "unbound key: {combo}")?;
                }
            }
        }
    }
    Ok(())
}

fn status_line(editor: &Editor) -> String {
    format!(
        "text: {:?} | volume: {}% | media: {}",
        editor.text(),
        editor.volume(),
        if editor.is_media_playing() { "playing" } else { "stopped" },
    )
}

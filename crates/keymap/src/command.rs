//! Reversible commands over the editor, self-describing for persistence.
//!
//! A [`Command`] is a closed sum type: every variant carries exactly the
//! parameters it needs to both apply and invert itself. Identity is
//! structural, so two commands with the same tag and params are
//! interchangeable for persistence. The descriptor/factory pair is the
//! serialization seam: `describe` turns a command into a `(type, params)`
//! pair and [`Command::from_descriptor`] reconstructs it, with unknown
//! tags surfacing as an error the caller must handle instead of a crash.

use editor::Editor;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Volume step to assume when a persisted `VolumeUp`/`VolumeDown` entry
/// omits its `step` parameter.
pub const DEFAULT_VOLUME_STEP: i32 = 10;

/// A reversible unit of work against the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Append one character to the text buffer.
    PrintChar(char),
    /// Raise the volume by a fixed positive step.
    VolumeUp { step: i32 },
    /// Lower the volume by a fixed positive step.
    VolumeDown { step: i32 },
    /// Flip the media-player flag (its own inverse).
    MediaToggle,
}

/// Errors from reconstructing a command out of a persisted descriptor.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command type: {0}")]
    UnknownTag(String),

    #[error("invalid params for {tag}: {reason}")]
    InvalidParams { tag: String, reason: String },
}

/// The persisted `(type, params)` self-description of a command.
///
/// `params` stays a raw JSON value so that a snapshot containing an
/// unrecognized tag still deserializes as a whole; resolution against the
/// known variants happens in [`Command::from_descriptor`], one entry at a
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    json!({})
}

impl Command {
    /// Apply this command's effect to the editor.
    pub fn apply(&self, editor: &mut Editor) {
        match *self {
            Command::PrintChar(c) => editor.insert_char(c),
            Command::VolumeUp { step } => editor.raise_volume(step),
            Command::VolumeDown { step } => editor.lower_volume(step),
            Command::MediaToggle => editor.toggle_media(),
        }
    }

    /// Reverse this command's effect on the editor.
    ///
    /// The inverse uses the fixed step the command was created with, not
    /// the delta actually applied. Inverting across a volume clamp
    /// boundary therefore restores a value that may differ from the
    /// pre-apply one; see the crate docs for why this is accepted.
    pub fn invert(&self, editor: &mut Editor) {
        match *self {
            Command::PrintChar(_) => editor.delete_last_char(),
            Command::VolumeUp { step } => editor.lower_volume(step),
            Command::VolumeDown { step } => editor.raise_volume(step),
            Command::MediaToggle => editor.toggle_media(),
        }
    }

    /// The persisted tag string for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::PrintChar(_) => "PrintChar",
            Command::VolumeUp { .. } => "VolumeUp",
            Command::VolumeDown { .. } => "VolumeDown",
            Command::MediaToggle => "MediaToggle",
        }
    }

    /// Produce the `(type, params)` descriptor for persistence.
    pub fn describe(&self) -> CommandDescriptor {
        let params = match *self {
            Command::PrintChar(c) => json!({ "char": c.to_string() }),
            Command::VolumeUp { step } | Command::VolumeDown { step } => {
                json!({ "step": step })
            }
            Command::MediaToggle => json!({}),
        };
        CommandDescriptor {
            tag: self.tag().to_string(),
            params,
        }
    }

    /// Reconstruct a command from a persisted descriptor.
    ///
    /// The inverse of [`Command::describe`]: for every command `cmd`,
    /// `Command::from_descriptor(&cmd.describe())` yields `cmd` back.
    pub fn from_descriptor(descriptor: &CommandDescriptor) -> Result<Self, CommandError> {
        match descriptor.tag.as_str() {
            "PrintChar" => {
                let c = single_char_param(descriptor)?;
                Ok(Command::PrintChar(c))
            }
            "VolumeUp" => {
                let step = step_param(descriptor)?;
                Ok(Command::VolumeUp { step })
            }
            "VolumeDown" => {
                let step = step_param(descriptor)?;
                Ok(Command::VolumeDown { step })
            }
            "MediaToggle" => Ok(Command::MediaToggle),
            other => Err(CommandError::UnknownTag(other.to_string())),
        }
    }
}

fn invalid(descriptor: &CommandDescriptor, reason: impl Into<String>) -> CommandError {
    CommandError::InvalidParams {
        tag: descriptor.tag.clone(),
        reason: reason.into(),
    }
}

/// Extract the `char` param: a string containing exactly one character.
fn single_char_param(descriptor: &CommandDescriptor) -> Result<char, CommandError> {
    let value = descriptor
        .params
        .get("char")
        .ok_or_else(|| invalid(descriptor, "missing \"char\""))?;
    let text = value
        .as_str()
        .ok_or_else(|| invalid(descriptor, "\"char\" is not a string"))?;

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(invalid(
            descriptor,
            format!("\"char\" must be exactly one character, got {text:?}"),
        )),
    }
}

/// Extract the `step` param: a positive integer, defaulting to
/// [`DEFAULT_VOLUME_STEP`] when absent.
fn step_param(descriptor: &CommandDescriptor) -> Result<i32, CommandError> {
    let Some(value) = descriptor.params.get("step") else {
        return Ok(DEFAULT_VOLUME_STEP);
    };
    let step = value
        .as_i64()
        .and_then(|step| i32::try_from(step).ok())
        .ok_or_else(|| invalid(descriptor, "\"step\" is not an integer"))?;
    if step <= 0 {
        return Err(invalid(descriptor, format!("\"step\" must be positive, got {step}")));
    }
    Ok(step)
}

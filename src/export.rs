//! Plain-text transcript export.
//!
//! The format is a fixed header, a blank line, then one `Label: content` paragraph per message:
//!
//! ```text
//! MentorAI Chat History
//!
//! User: How can I prepare for internships?
//!
//! MentorAI: Start with ...
//!
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{Message, MessageRole};

/// First line of every export.
pub const HEADER: &str = "MentorAI Chat History";
/// Label for user messages.
pub const USER_LABEL: &str = "User";
/// Label for assistant messages.
pub const ASSISTANT_LABEL: &str = "MentorAI";

fn label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => USER_LABEL,
        MessageRole::Assistant | MessageRole::System => ASSISTANT_LABEL,
    }
}

/// Renders the transcript as UTF-8 text.
///
/// Returns `None` for an empty transcript; there is nothing to download.
pub fn export(transcript: &[Message]) -> Option<Vec<u8>> {
    if transcript.is_empty() {
        return None;
    }
    let mut text = format!("{HEADER}\n\n");
    for message in transcript {
        text.push_str(label(message.role()));
        text.push_str(": ");
        text.push_str(message.content());
        text.push_str("\n\n");
    }
    Some(text.into_bytes())
}

/// Reads an export back into messages.
///
/// A message runs until the next blank line that is immediately followed by `User: ` or
/// `MentorAI: `, so content may hold blank lines and leading or trailing newlines.  Content that
/// itself contains a blank line followed by one of those labels is indistinguishable from a new
/// message.
pub fn parse(text: &str) -> Result<Vec<Message>> {
    let Some(body) = text.strip_prefix(HEADER) else {
        return Err(Error::validation("missing transcript header", None));
    };
    let Some(body) = body.strip_prefix("\n\n") else {
        return Err(Error::validation("missing blank line after header", None));
    };
    let body = body.strip_suffix("\n\n").unwrap_or(body);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let user_prefix = format!("{USER_LABEL}: ");
    let assistant_prefix = format!("{ASSISTANT_LABEL}: ");
    let boundaries = [format!("\n\n{user_prefix}"), format!("\n\n{assistant_prefix}")];

    let mut parsed = Vec::new();
    let mut rest = body;
    loop {
        let (role, after) = if let Some(after) = rest.strip_prefix(&user_prefix) {
            (MessageRole::User, after)
        } else if let Some(after) = rest.strip_prefix(&assistant_prefix) {
            (MessageRole::Assistant, after)
        } else {
            return Err(Error::validation(
                "transcript paragraph has no role label",
                None,
            ));
        };
        match boundaries.iter().filter_map(|b| after.find(b.as_str())).min() {
            Some(end) => {
                parsed.push(Message::new(role, &after[..end]));
                rest = &after[end + 2..];
            }
            None => {
                parsed.push(Message::new(role, after));
                return Ok(parsed);
            }
        }
    }
}

/// Writes the export to `path`.
///
/// Returns `false` without touching the filesystem when the transcript is empty.
pub fn write_to<P: AsRef<Path>>(path: P, transcript: &[Message]) -> Result<bool> {
    let Some(bytes) = export(transcript) else {
        return Ok(false);
    };
    let file = File::create(path.as_ref())
        .map_err(|err| Error::io("failed to create transcript file", err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|()| writer.flush())
        .map_err(|err| Error::io("failed to write transcript", err))?;
    Ok(true)
}

/// Writes the export to a new `.txt` file in the system temp directory and returns its path.
///
/// The file outlives the call so it can be handed to the user.  Returns `None` for an empty
/// transcript.  If writing fails the partial file is removed.
pub fn write_temp_file(transcript: &[Message]) -> Result<Option<PathBuf>> {
    let Some(bytes) = export(transcript) else {
        return Ok(None);
    };
    let mut file = tempfile::Builder::new()
        .prefix("mentorai-chat-")
        .suffix(".txt")
        .tempfile()
        .map_err(|err| Error::io("failed to create temporary transcript file", err))?;
    file.write_all(&bytes)
        .and_then(|()| file.flush())
        .map_err(|err| Error::io("failed to write transcript", err))?;
    let (_, path) = file
        .keep()
        .map_err(|err| Error::io("failed to keep transcript file", err.error))?;
    Ok(Some(path))
}

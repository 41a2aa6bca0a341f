//! Command execution against document text.
//!
//! [`dispatch`] is the one place a [`Command`] becomes a text edit. Toolbar
//! clicks and keyboard shortcuts both end up here with the same
//! `(text, selection)` pair, so they cannot drift apart.

use tracing::debug;

use crate::actions::Command;
use crate::request::{IMAGE_PROMPT, LINK_PROMPT, TextRequester};
use crate::text::{
    DEFAULT_IMAGE_ALT, apply_bold, apply_heading, apply_italic, insert_code_block, insert_image,
    insert_link, insert_list,
};
use crate::types::SelectionRange;

/// Outcome of dispatching a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The text changed. The selection collapses to just after the inserted
    /// markup.
    Edited {
        text: String,
        selection: SelectionRange,
    },
    /// Nothing to do (e.g. the user cancelled the URL prompt).
    Unchanged,
    /// The caller should commit the document.
    Save,
}

impl Dispatch {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edited { .. })
    }
}

/// Execute `command` against `text`, asking `requester` for a URL when the
/// command needs one.
pub async fn dispatch<R: TextRequester>(
    command: &Command,
    text: &str,
    selection: SelectionRange,
    requester: &R,
) -> Dispatch {
    let input = match command {
        Command::Link => request_url(requester, LINK_PROMPT).await,
        Command::Image => request_url(requester, IMAGE_PROMPT).await,
        _ => None,
    };
    apply_command(command, text, selection, input.as_deref())
}

/// Synchronous core of [`dispatch`] for callers that already hold the URL.
///
/// `url` is ignored by commands that don't take one; commands that need one
/// are a no-op without it.
pub fn apply_command(
    command: &Command,
    text: &str,
    selection: SelectionRange,
    url: Option<&str>,
) -> Dispatch {
    let range = selection.clamp_to(text.chars().count());
    let (start, end) = (range.start, range.end);

    // (new text, offset the inserted markup is counted from)
    let (edited, anchor) = match command {
        Command::Save => return Dispatch::Save,
        Command::Bold => (apply_bold(text, start, end), end),
        Command::Italic => (apply_italic(text, start, end), end),
        Command::Heading(level) => (apply_heading(text, start, end, *level), end),
        Command::List { ordered } => (insert_list(text, start, end, *ordered), end),
        Command::CodeBlock => (insert_code_block(text, start, end, ""), end),
        Command::Link => {
            let Some(url) = url else {
                debug!("link command without url, ignoring");
                return Dispatch::Unchanged;
            };
            (insert_link(text, start, end, url), end)
        }
        Command::Image => {
            let Some(url) = url else {
                debug!("image command without url, ignoring");
                return Dispatch::Unchanged;
            };
            (insert_image(text, start, url, DEFAULT_IMAGE_ALT), start)
        }
    };

    let inserted = edited.chars().count() - text.chars().count();
    debug!(
        command = command.name(),
        start, end, inserted, "applied formatting command"
    );
    Dispatch::Edited {
        text: edited,
        selection: SelectionRange::caret(anchor + inserted),
    }
}

/// Ask for a URL; blank answers count as cancellation.
async fn request_url<R: TextRequester>(requester: &R, prompt: &str) -> Option<String> {
    let answer = requester.request_text(prompt).await?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

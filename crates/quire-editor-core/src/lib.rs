//! quire-editor-core: framework-free editing logic for the quire note editor.
//!
//! This crate provides:
//! - [`text`] - pure, selection-indexed markdown transformations
//! - [`SelectionRange`] - a `{start, end}` pair of character offsets
//! - [`Command`] and the two input surfaces that produce it
//!   ([`ToolbarButton`], [`KeybindingConfig`])
//! - [`dispatch`] - the single entry point both surfaces funnel into
//! - [`TextRequester`] - injected "ask the user for a string" capability

pub mod actions;
pub mod execute;
pub mod request;
pub mod text;
pub mod types;

pub use actions::{
    Command, Key, KeyCombo, KeybindingConfig, KeydownResult, Modifiers, ToolbarButton, Trigger,
};
pub use execute::{Dispatch, apply_command, dispatch};
pub use request::{FixedRequester, NoRequester, TextRequester};
pub use smol_str::SmolStr;
pub use types::SelectionRange;

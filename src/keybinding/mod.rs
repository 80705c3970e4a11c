//! Keyboard shortcuts: accelerator parsing, the shortcut catalog, binding
//! persistence and chord matching.

mod accelerator;
mod catalog;
mod matcher;
mod store;

pub use accelerator::{Binding, parse_accelerator};
pub use catalog::{SHORTCUTS, Shortcut, ShortcutGroup, ShortcutType};
pub use matcher::ShortcutMatcher;
pub use store::{BindingStore, FileStore, MemoryStore};

/// Accelerator text that cannot be turned into a [`Binding`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcceleratorError {
    #[error("empty accelerator")]
    Empty,
    #[error("unclosed modifier in accelerator {0:?}")]
    Unclosed(String),
    #[error("unknown modifier <{0}>")]
    UnknownModifier(String),
    #[error("accelerator {0:?} has no key")]
    MissingKey(String),
    #[error("unknown key name {0:?}")]
    UnknownKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutError {
    #[error("unknown shortcut type: {0}")]
    UnknownType(String),
    #[error("binding for {0} has no accelerator name")]
    Unrepresentable(ShortcutType),
}

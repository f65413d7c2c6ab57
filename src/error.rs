use thiserror::Error;

/// Errors raised while attaching a [`Dropdown`](crate::Dropdown) to the
/// document. Both variants are fatal at construction; nothing after a
/// successful attach reports errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No trigger element matched the configured selector inside the
    /// container.
    #[error("dropdown trigger not found: no element matches `{0}`")]
    TriggerNotFound(String),

    /// No panel element matched the configured selector inside the
    /// container.
    #[error("dropdown panel not found: no element matches `{0}`")]
    PanelNotFound(String),
}

use error_stack::ResultExt;

use kernel::KernelError;

pub mod config;
pub mod database;
pub mod error;
pub mod token;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to read environment variable {key}"))
}

/// Like [`env`], but an unset variable is `None` rather than an error.
pub(crate) fn env_opt(key: &str) -> Option<String> {
    dotenvy::var(key).ok().filter(|value| !value.trim().is_empty())
}

use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    Validation,
    NotFound,
    InsufficientStock { title: String, available: i32 },
    EmptyCart,
    InvalidTransition { from: String, to: String },
    Unauthorized,
    Forbidden,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Invalid request"),
            KernelError::NotFound => write!(f, "Resource not found"),
            KernelError::InsufficientStock { title, available } => write!(
                f,
                "Insufficient stock for \"{title}\". Only {available} available"
            ),
            KernelError::EmptyCart => write!(f, "Cart is empty"),
            KernelError::InvalidTransition { from, to } => {
                write!(f, "Order status cannot change from {from} to {to}")
            }
            KernelError::Unauthorized => write!(f, "Authentication required"),
            KernelError::Forbidden => write!(f, "Permission denied"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

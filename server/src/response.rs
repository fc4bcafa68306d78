use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

mod book;
mod cart;
mod health;
mod order;

pub use self::{book::*, cart::*, health::*, order::*};

/// Body shared by every endpoint: `{ success, message?, data? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// A successful (or not found) envelope together with its status code.
#[derive(Debug)]
pub struct Reply<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope {
                success: true,
                message: None,
                data: Some(data),
            },
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Envelope {
                success: true,
                message: Some(message.into()),
                data: Some(data),
            },
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Envelope {
                success: true,
                message: Some(message.into()),
                data: None,
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: Envelope::failure(message),
        }
    }

    pub fn found(data: Option<T>, missing: &str) -> Self {
        data.map(Self::ok)
            .unwrap_or_else(|| Self::not_found(missing))
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

use crate::response::Envelope;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::{AttachmentKind, FrameKind, Report};
use kernel::KernelError;
use std::process::{ExitCode, Termination};

const INTERNAL_MESSAGE: &str = "Something went wrong on our side, please try again later";

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::Validation
            | KernelError::InsufficientStock { .. }
            | KernelError::EmptyCart => StatusCode::BAD_REQUEST,
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::InvalidTransition { .. } | KernelError::Concurrency => {
                StatusCode::CONFLICT
            }
            KernelError::Unauthorized => StatusCode::UNAUTHORIZED,
            KernelError::Forbidden => StatusCode::FORBIDDEN,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self.0.current_context() {
            KernelError::Validation | KernelError::NotFound => self
                .first_attachment()
                .unwrap_or_else(|| self.0.current_context().to_string()),
            KernelError::Internal => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// The most recently attached printable message, if any.
    fn first_attachment(&self) -> Option<String> {
        self.0.frames().find_map(|frame| match frame.kind() {
            FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                Some(printable.to_string())
            }
            _ => None,
        })
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!(%status, "{:?}", self.0);
        }
        (status, axum::Json(Envelope::<()>::failure(self.message()))).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::ErrorStatus;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::{Report, ResultExt};
    use kernel::KernelError;
    use serde_json::Value;

    async fn render(report: Report<KernelError>) -> (StatusCode, Value) {
        let response = ErrorStatus::from(report).into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn validation_shows_its_reason() {
        let (status, body) = render(
            Report::new(KernelError::Validation).attach_printable("quantity must be at least 1"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "quantity must be at least 1");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn stock_errors_name_the_book() {
        let (status, body) = render(Report::new(KernelError::InsufficientStock {
            title: "Rayuela".to_string(),
            available: 2,
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Insufficient stock for \"Rayuela\". Only 2 available"
        );
    }

    #[tokio::test]
    async fn internal_details_stay_in_the_log() {
        let failure: Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let report = failure
            .change_context(KernelError::Internal)
            .attach_printable("connection reset by peer")
            .unwrap_err();
        let (status, body) = render(report).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], super::INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn statuses_follow_the_error_kind() {
        let cases = [
            (KernelError::NotFound, StatusCode::NOT_FOUND),
            (KernelError::EmptyCart, StatusCode::BAD_REQUEST),
            (
                KernelError::InvalidTransition {
                    from: "delivered".to_string(),
                    to: "pending".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (KernelError::Unauthorized, StatusCode::UNAUTHORIZED),
            (KernelError::Forbidden, StatusCode::FORBIDDEN),
            (KernelError::Concurrency, StatusCode::CONFLICT),
            (KernelError::Timeout, StatusCode::REQUEST_TIMEOUT),
        ];
        for (error, expected) in cases {
            let (status, _) = render(Report::new(error)).await;
            assert_eq!(status, expected);
        }
    }
}

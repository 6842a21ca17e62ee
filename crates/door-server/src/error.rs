use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use door_bridge::BridgeError;
use door_core::DoorError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(DoorError::MissingField(msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(DoorError::WarstackNotFound(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<DoorError>() {
            match e {
                DoorError::WarstackNotFound(_) => StatusCode::NOT_FOUND,
                DoorError::HotlistEmpty
                | DoorError::NoDoorCandidate
                | DoorError::MissingField(_)
                | DoorError::InvalidStep(_) => StatusCode::BAD_REQUEST,
                DoorError::HomeNotFound
                | DoorError::Io(_)
                | DoorError::Yaml(_)
                | DoorError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if self.0.downcast_ref::<BridgeError>().is_some() {
            // Everything upstream-shaped is a gateway problem from the
            // caller's point of view, including a missing configuration.
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn warstack_not_found_maps_to_404() {
        let err = AppError(DoorError::WarstackNotFound("abc123".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn hotlist_empty_maps_to_400() {
        let err = AppError(DoorError::HotlistEmpty.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_door_candidate_maps_to_400() {
        let err = AppError(DoorError::NoDoorCandidate.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_field_maps_to_400() {
        let err = AppError::bad_request("missing answer");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn bridge_errors_map_to_502() {
        for err in [
            BridgeError::NotConfigured,
            BridgeError::Status {
                status: 500,
                body: "boom".into(),
            },
            BridgeError::InvalidResponse("empty".into()),
        ] {
            let response = AppError(err.into()).into_response();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(DoorError::Io(io_err).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_door_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json_with_error_field() {
        let err = AppError(DoorError::HotlistEmpty.into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use roost_core::Error as CoreError;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        let status = self.status_code();
        (status, self.to_string()).into_response()
    }
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        let err = &self.0;
        for cause in err.chain() {
            if let Some(err) = cause.downcast_ref::<CoreError>() {
                match err {
                    CoreError::ObjectNotFound(_) => return StatusCode::NOT_FOUND,
                    CoreError::ObjectForbidden(_) => return StatusCode::FORBIDDEN,
                    CoreError::Config(_) => return StatusCode::BAD_REQUEST,
                    CoreError::StoreUnavailable(_) => return StatusCode::SERVICE_UNAVAILABLE,
                    // Keep walking: the upstream error is further down.
                    CoreError::Other(_) => {}
                    _ => return StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
            if let Some(err) = cause.downcast_ref::<roost_client::Error>() {
                return match err {
                    roost_client::Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    roost_client::Error::ServiceUnavailable
                    | roost_client::Error::Http(_)
                    | roost_client::Error::Api(_)
                    | roost_client::Error::NetworkError(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

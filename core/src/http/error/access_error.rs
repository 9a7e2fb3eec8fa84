use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};

/// Failures of the access control layer itself.
///
/// Denied requests are not errors: they are answered by the configured
/// unauthenticated/unauthorized responders.
#[derive(Debug, Display, Error)]
pub enum AccessError {
    /// A principal was built without one of its required context fields.
    #[display("invalid principal context: missing {_0}")]
    InvalidContext(#[error(not(source))] &'static str),
    /// A gate needed a principal but none was attached to the request.
    #[display("no principal attached to the request")]
    PrincipalMissing,
    /// The credential store could not read or write the session.
    #[display("credential storage error: {_0}")]
    Storage(#[error(not(source))] String),
}

impl error::ResponseError for AccessError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AccessError::InvalidContext(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AccessError::PrincipalMissing => StatusCode::INTERNAL_SERVER_ERROR,
            AccessError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code()).body(self.to_string())
    }
}

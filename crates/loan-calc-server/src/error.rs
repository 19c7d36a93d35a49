use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::io::Error as IoError;
use std::num::ParseIntError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

use loan_calc_core::LoanCalcError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IoError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ParseIntError),

    #[error("Tracing error: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),

    #[error("{0}")]
    Engine(#[from] LoanCalcError),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Engine(engine) if engine.is_validation() => StatusCode::BAD_REQUEST,
            Error::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Every failure renders as `{ "error": "<message>" }` and nothing else.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

use actix_web::error::JsonPayloadError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::debug;

use loan_calc_core::request::LoanRequest;
use loan_calc_core::schedule::calculate_loan;

use crate::error::Error;

#[post("/calculate")]
pub async fn calculate(request: web::Json<LoanRequest>) -> Result<HttpResponse, Error> {
    let start_date = request
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let output = calculate_loan(&request, start_date)?;
    for warning in &output.warnings {
        debug!("{warning}");
    }

    // The wire contract is the bare result, not the computation envelope.
    Ok(HttpResponse::Ok().json(&output.result))
}

#[get("/version")]
pub async fn version() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// Malformed request bodies get the same `{ "error": ... }` shape as every
/// other failure instead of actix's plain-text default.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    actix_web::error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(json!({ "error": message })),
    )
    .into()
}

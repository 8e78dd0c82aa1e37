use actix_web::error::ErrorInternalServerError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};
use crate::device::device_name;
use crate::error::Error;
use crate::service::ClassificationRequest;
use serde_json::json;
use tracing::warn;

use super::page::Outcome;
use super::AppState;

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Inference(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn html(
    state: &AppState,
    status: StatusCode,
    text: &str,
    outcome: Outcome<'_>,
) -> Result<HttpResponse> {
    let body = state
        .page
        .render(&state.title, text, outcome)
        .map_err(ErrorInternalServerError)?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}

pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    html(&state, StatusCode::OK, "", Outcome::Empty)
}

pub async fn predict(
    state: web::Data<AppState>,
    form: web::Form<ClassificationRequest>,
) -> Result<HttpResponse> {
    let ClassificationRequest { text } = form.into_inner();
    let service = state.service.clone();
    let input = text.clone();
    let outcome = web::block(move || service.classify(&input)).await?;

    match outcome {
        Ok(result) => html(&state, StatusCode::OK, &text, Outcome::Prediction(&result)),
        Err(err) => {
            warn!(error = %err, "prediction failed");
            let message = err.to_string();
            html(&state, status_for(&err), &text, Outcome::Failure(&message))
        }
    }
}

pub async fn classify(
    state: web::Data<AppState>,
    request: web::Json<ClassificationRequest>,
) -> Result<HttpResponse> {
    let service = state.service.clone();
    let outcome = web::block(move || service.classify(&request.text)).await?;

    Ok(match outcome {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => {
            warn!(error = %err, "classification failed");
            HttpResponse::build(status_for(&err)).json(json!({ "error": err.to_string() }))
        }
    })
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "device": device_name(state.service.device()),
    }))
}

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::application::use_cases::analyst::AnalystSession;
use crate::domain::error::AppError;
use crate::infrastructure::agent::OpenAiAgentClient;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::staging::StagingWriter;

pub struct HttpState {
    pub session: Mutex<AnalystSession>,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub content_base64: String,
}

#[derive(Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// Map the error taxonomy onto HTTP statuses: caller mistakes are 400,
/// agent transport failures are gateway errors, the rest is 500.
fn error_status(e: &AppError) -> StatusCode {
    match e {
        AppError::UnsupportedFormat(_) | AppError::ParseError(_) | AppError::ValidationError(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::AgentUnreachable(_) => StatusCode::BAD_GATEWAY,
        AppError::AgentTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        AppError::AgentError(_) | AppError::IoError(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

const AGENT_FAILURE_HINT: &str =
    "Please try rephrasing your query or check if the data format is correct.";

/// Agent failures carry a retry suggestion; the staged upload is still
/// valid, so the user can just ask again.
fn error_body(e: &AppError) -> String {
    match e {
        AppError::AgentUnreachable(_) | AppError::AgentTimeout(_) | AppError::AgentError(_) => {
            format!("{}. {}", e, AGENT_FAILURE_HINT)
        }
        _ => e.to_string(),
    }
}

fn error_response(e: &AppError) -> HttpResponse {
    HttpResponse::build(error_status(e)).body(error_body(e))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[post("/upload")]
async fn upload(data: web::Data<HttpState>, req: web::Json<UploadRequest>) -> impl Responder {
    info!(filename = %req.filename, "Received upload");

    let bytes = match BASE64.decode(&req.content_base64) {
        Ok(bytes) => bytes,
        Err(e) => {
            return HttpResponse::BadRequest().body(format!("Invalid base64 payload: {}", e));
        }
    };

    let mut session = data.session.lock().await;
    match session.upload(&bytes, &req.filename) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            error!(filename = %req.filename, error = %e, "Upload failed");
            error_response(&e)
        }
    }
}

#[post("/query")]
async fn query(data: web::Data<HttpState>, req: web::Json<QueryRequest>) -> impl Responder {
    // One question at a time: the lock is held for the whole agent call
    let session = data.session.lock().await;

    if !session.has_upload() {
        return HttpResponse::Conflict().body("No data uploaded yet. Upload a file first.");
    }

    match session.ask(&req.question).await {
        Ok(answer) => HttpResponse::Ok().json(QueryResponse { answer }),
        Err(e) => {
            error!(error = %e, "Query failed");
            error_response(&e)
        }
    }
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let session = AnalystSession::new(
        config.agent.clone(),
        StagingWriter::new(config.staging_dir.clone()),
        Arc::new(OpenAiAgentClient::new()),
    );
    let state = web::Data::new(HttpState {
        session: Mutex::new(session),
    });

    info!(addr = %config.bind_addr, "Starting analyst agent server");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .service(health)
            .service(upload)
            .service(query)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&AppError::UnsupportedFormat("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&AppError::ParseError("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&AppError::AgentUnreachable("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&AppError::AgentTimeout("x".into())),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            error_status(&AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_agent_failures_suggest_rephrasing() {
        for err in [
            AppError::AgentUnreachable("down".into()),
            AppError::AgentTimeout("slow".into()),
            AppError::AgentError("boom".into()),
        ] {
            let body = error_body(&err);
            assert!(body.contains(&err.to_string()));
            assert!(body.contains("rephrasing your query"));
            assert!(body.contains("data format"));
        }
    }

    #[test]
    fn test_ingestion_errors_carry_no_retry_hint() {
        let body = error_body(&AppError::ParseError("bad row".into()));
        assert_eq!(body, "Parse error: bad row");
    }
}

use std::io::Write;
use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::feedback::FeedbackSink;
use crate::pages;
use crate::pipeline;
use crate::pipeline::decode::allowed_file;

/// Read-only collaborators each request needs; built once at startup.
pub struct PipelineContext {
    pub classifier: Arc<dyn Classifier>,
    pub feedback: Arc<dyn FeedbackSink>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/feedback").route(web::get().to(feedback)))
        .service(web::resource("/health").route(web::get().to(health)));
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Buffers the `file` multipart field fully in memory. Returns `None` when
/// the form carries no such field.
async fn read_upload(payload: &mut Multipart) -> Result<Option<Upload>, Error> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        let filename = match field.content_disposition() {
            Some(disposition) if disposition.get_name() == Some("file") => {
                disposition.get_filename().unwrap_or_default().to_string()
            }
            _ => continue,
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            bytes.write_all(&data)?;
        }
        return Ok(Some(Upload { filename, bytes }));
    }
    Ok(None)
}

fn redirect_to_index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

async fn index() -> HttpResponse {
    html(pages::upload_page())
}

async fn predict(
    context: web::Data<PipelineContext>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();

    let Some(upload) = read_upload(&mut payload).await? else {
        info!("[{}] Upload rejected: no file field in form", request_id);
        return Ok(redirect_to_index());
    };
    if upload.filename.is_empty() {
        info!("[{}] Upload rejected: empty filename", request_id);
        return Ok(redirect_to_index());
    }
    if !allowed_file(&upload.filename) {
        info!(
            "[{}] Upload rejected: disallowed extension on {:?}",
            request_id, upload.filename
        );
        return Ok(redirect_to_index());
    }

    match pipeline::run(context.classifier.as_ref(), &upload.bytes) {
        Ok(prediction) => {
            info!(
                "[{}] Predicted {} with confidence {:.4}",
                request_id, prediction.label, prediction.confidence
            );
            Ok(html(pages::result_page(&prediction)))
        }
        Err(e) => {
            warn!("[{}] Pipeline failed: {}", request_id, e);
            Ok(HttpResponse::UnprocessableEntity()
                .content_type("text/html; charset=utf-8")
                .body(pages::error_page(&e.to_string())))
        }
    }
}

#[derive(Deserialize)]
struct FeedbackQuery {
    label: Option<String>,
}

async fn feedback(
    context: web::Data<PipelineContext>,
    query: web::Query<FeedbackQuery>,
) -> HttpResponse {
    context.feedback.record(query.label.as_deref());
    html(pages::feedback_page())
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

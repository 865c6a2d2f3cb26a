use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use serde_json::json;
use shared::{EMOTION_FIELD, IMAGE_FIELD, UPLOAD_PATH};
use std::time::Instant;
use uuid::Uuid;

use crate::error::RelayError;
use crate::upstream::{FormField, UpstreamClient};

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(UPLOAD_PATH)
            .route(web::post().to(relay_upload))
            .route(web::method(Method::OPTIONS).to(upload_preflight)),
    )
    .service(web::resource("/health").route(web::get().to(health)));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn relay_upload(
    upstream: web::Data<UpstreamClient>,
    payload: Multipart,
) -> Result<HttpResponse, RelayError> {
    let request_id = Uuid::new_v4();
    let result = forward_upload(&upstream, payload, request_id).await;
    if let Err(e) = &result {
        error!("[{}] Upload relay failed: {}", request_id, e);
    }
    result
}

async fn forward_upload(
    upstream: &UpstreamClient,
    payload: Multipart,
    request_id: Uuid,
) -> Result<HttpResponse, RelayError> {
    // Fail before touching the body when there is nowhere to send it.
    upstream.upload_url()?;

    let fields = read_form(payload).await?;
    let emotion = fields
        .iter()
        .find(|f| f.name == EMOTION_FIELD)
        .map(|f| String::from_utf8_lossy(&f.data).into_owned())
        .unwrap_or_default();
    let image_size = fields
        .iter()
        .find(|f| f.name == IMAGE_FIELD)
        .map(|f| f.data.len())
        .unwrap_or(0);
    info!(
        "[{}] Forwarding {} field(s): emotion={:?}, image={} bytes",
        request_id,
        fields.len(),
        emotion,
        image_size
    );

    let started = Instant::now();
    let (status, body) = upstream.forward(fields).await?;
    info!(
        "[{}] Upstream answered {} in {:?}",
        request_id,
        status,
        started.elapsed()
    );

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    Ok(HttpResponse::build(status).json(body))
}

async fn read_form(mut payload: Multipart) -> Result<Vec<FormField>, RelayError> {
    let mut fields = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| RelayError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| RelayError::Multipart(e.to_string()))?;
            data.extend_from_slice(&chunk);
        }

        fields.push(FormField {
            name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(fields)
}

async fn upload_preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .finish()
}

async fn health(upstream: web::Data<UpstreamClient>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "upstream_configured": upstream.is_configured(),
    }))
}

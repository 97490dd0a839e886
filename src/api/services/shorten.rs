use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use crate::errors::ShortenerError;
use crate::services::{ShortenRequest, ShortenerService};

const JSON_MEDIA_TYPE: &str = "application/json";

pub struct ShortenService;

impl ShortenService {
    /// `POST /short`
    ///
    /// The body is taken as raw bytes rather than through `web::Json` so a
    /// request without any `Content-Type` is still accepted.
    pub async fn handle_shorten(
        req: HttpRequest,
        body: web::Bytes,
        service: web::Data<Arc<ShortenerService>>,
    ) -> Result<HttpResponse, ShortenerError> {
        check_content_type(&req)?;
        let request = parse_body(&body)?;
        let created = service.shorten(request).await?;
        Ok(HttpResponse::Ok().json(created))
    }
}

/// A present, non-empty `Content-Type` must name `application/json`; parameters are ignored.
fn check_content_type(req: &HttpRequest) -> Result<(), ShortenerError> {
    let Some(value) = req.headers().get(header::CONTENT_TYPE) else {
        return Ok(());
    };

    let media_type = value
        .to_str()
        .ok()
        .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase());

    match media_type.as_deref() {
        Some("") | Some(JSON_MEDIA_TYPE) => Ok(()),
        _ => Err(ShortenerError::unsupported_media_type(
            "Content-Type header is not application/json",
        )),
    }
}

fn parse_body(body: &[u8]) -> Result<ShortenRequest, ShortenerError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Malformed shorten body: {}", e);
        ShortenerError::invalid_request("invalid request body")
    })
}

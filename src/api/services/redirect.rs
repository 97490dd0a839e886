use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::errors::ShortenerError;
use crate::services::ShortenerService;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{short_url}`: 308 to the stored target, refreshing its TTL.
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<Arc<ShortenerService>>,
    ) -> Result<HttpResponse, ShortenerError> {
        let code = path.into_inner();
        let target = service.resolve(&code).await?;

        debug!("Redirecting '{}' -> '{}'", code, target);
        Ok(HttpResponse::PermanentRedirect()
            .insert_header((header::LOCATION, target))
            .finish())
    }
}

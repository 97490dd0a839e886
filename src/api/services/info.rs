use std::sync::Arc;

use actix_web::{HttpResponse, web};

use crate::errors::ShortenerError;
use crate::services::ShortenerService;

pub struct InfoService;

impl InfoService {
    /// `GET /info/{short_url}`: target and remaining lifetime, without touching the TTL.
    pub async fn handle_info(
        path: web::Path<String>,
        service: web::Data<Arc<ShortenerService>>,
    ) -> Result<HttpResponse, ShortenerError> {
        let info = service.info(&path.into_inner()).await?;
        Ok(HttpResponse::Ok().json(info))
    }
}

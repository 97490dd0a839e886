use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use rust_embed::Embed;
use tracing::{debug, trace};

use crate::api::ErrorBody;
use crate::services::ShortenerService;

// 使用 RustEmbed 自动嵌入静态文件
#[derive(Embed)]
#[folder = "assets/"]
struct FrontendAssets;

/// Images change only with a new release.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=7776000";

pub struct FrontendService;

impl FrontendService {
    /// `GET /`: landing page with usage instructions
    pub async fn handle_index(service: web::Data<Arc<ShortenerService>>) -> HttpResponse {
        trace!("Serving landing page");

        let Some(content) = FrontendAssets::get("index.html") else {
            return HttpResponse::NotFound().json(ErrorBody::new("404 page not found"));
        };

        let html = String::from_utf8_lossy(&content.data)
            .replace("%PUBLIC_ADDRESS%", service.public_address())
            .replace("%EXPIRY_SECONDS%", &service.expiry().as_secs().to_string())
            .replace("%VERSION%", env!("CARGO_PKG_VERSION"));

        HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html)
    }

    /// `GET /images/{name}`: images referenced by the landing page
    pub async fn handle_image(path: web::Path<String>) -> HttpResponse {
        let name = path.into_inner();

        match FrontendAssets::get(&format!("images/{}", name)) {
            Some(content) => HttpResponse::Ok()
                .content_type(Self::get_content_type(&name))
                .insert_header((header::CACHE_CONTROL, IMAGE_CACHE_CONTROL))
                .body(content.data.into_owned()),
            None => {
                debug!("Image not found: {}", name);
                HttpResponse::NotFound().json(ErrorBody::new("image not found"))
            }
        }
    }

    fn get_content_type(name: &str) -> &'static str {
        let extension = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        match extension.as_str() {
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        }
    }
}

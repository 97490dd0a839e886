pub mod frontend;
pub mod info;
pub mod redirect;
pub mod shorten;

use actix_web::{HttpResponse, web};

pub use frontend::FrontendService;
pub use info::InfoService;
pub use redirect::RedirectService;
pub use shorten::ShortenService;

use crate::api::ErrorBody;

/// Upper bound for `POST /short` bodies.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Route table shared by the server and the HTTP tests.
///
/// `GET /{short_url}` only matches a single path segment, so it never
/// shadows `/info/{short_url}` or `/images/{name}`. `/short` has no GET
/// route, so `GET /short` is looked up as the code `short`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/", web::get().to(FrontendService::handle_index))
        .route("/images/{name}", web::get().to(FrontendService::handle_image))
        .route("/info/{short_url}", web::get().to(InfoService::handle_info))
        .route("/short", web::post().to(ShortenService::handle_shorten))
        .route("/{short_url}", web::get().to(RedirectService::handle_redirect));
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("404 page not found"))
}

//! Single-page form and JSON endpoint over an [`InferenceService`].
//!
//! | Route               | Purpose                                   |
//! |---------------------|-------------------------------------------|
//! | `GET /`             | form page                                 |
//! | `POST /predict`     | form submit, page with label and score    |
//! | `POST /api/classify`| `{"text"}` -> `{"label", "score"}`        |
//! | `GET /health`       | liveness and bound device                 |

mod handlers;
pub mod page;

use actix_web::{middleware, web, App, HttpServer};
use crate::service::InferenceService;
use page::Page;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_TITLE: &str =
    "Fine Tuning BERT for Twitter Multi Class Sentiment Classification";

pub struct AppState {
    pub service: Arc<InferenceService>,
    pub title: String,
    page: Page,
}

impl AppState {
    pub fn new(service: Arc<InferenceService>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            service,
            title: DEFAULT_TITLE.to_string(),
            page: Page::new()?,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(web::resource("/predict").route(web::post().to(handlers::predict)))
        .service(web::resource("/api/classify").route(web::post().to(handlers::classify)))
        .service(web::resource("/health").route(web::get().to(handlers::health)));
}

pub async fn serve(state: AppState, bind: &str) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!(%bind, "server running");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}

pub mod errors;
pub mod handlers;

use crate::{
    config::Config,
    generators::{ImageGenerator, PostGenerator},
    models::GenerationParams,
    providers::ProviderClients,
};
use actix_web::{http::Method, web, App, HttpServer};
use std::sync::Arc;

pub struct AppState {
    pub posts: PostGenerator,
    pub images: ImageGenerator,
}

impl AppState {
    pub fn new(posts: PostGenerator, images: ImageGenerator) -> Self {
        Self { posts, images }
    }

    pub fn from_clients(config: &Config, clients: &ProviderClients) -> Self {
        let posts = PostGenerator::new(
            Arc::new(clients.chat().clone()),
            GenerationParams::from(&config.chat),
        );
        let images = ImageGenerator::new(Arc::new(clients.image().clone()))
            .with_max_attempts(config.image.max_attempts)
            .with_selector(config.image.strategy.build());

        Self::new(posts, images)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(handlers::json_error_handler),
    )
        .service(
            web::resource("/api/posts").route(web::post().to(handlers::generate_posts)),
        )
        .service(
            web::resource("/images")
                .route(web::get().to(handlers::generate_image))
                .route(web::post().to(handlers::generate_image))
                .route(web::method(Method::OPTIONS).to(handlers::images_preflight)),
        );
}

pub async fn run(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(state);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}

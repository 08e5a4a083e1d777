use crate::{
    error::GenerationError,
    logger,
    models::{ErrorBody, GenerationRequest, ImageQuery, ImageResult},
    prompts::DEFAULT_THEME,
    server::AppState,
};
use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    },
    web, HttpRequest, HttpResponse, HttpResponseBuilder, ResponseError,
};

fn with_cors(builder: &mut HttpResponseBuilder) -> &mut HttpResponseBuilder {
    builder
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .insert_header((ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

fn log_failure(context: &str, err: &GenerationError) {
    if matches!(err, GenerationError::InvalidInput) {
        log::warn!("⚠️  {} rejected: {}", context, err);
    } else {
        log::error!("❌ {} failed: {}", context, err);
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️  Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorBody::new("Invalid request body"));
    InternalError::from_response(err, response).into()
}

/// `POST /api/posts`
pub async fn generate_posts(
    state: web::Data<AppState>,
    body: web::Json<GenerationRequest>,
) -> Result<HttpResponse, GenerationError> {
    let input = body.into_inner().input.unwrap_or_default();

    logger::with_request_id(logger::new_request_id(), async move {
        log::info!("📨 Post generation requested ({} characters)", input.len());

        let posts = state.posts.generate(&input).await.map_err(|e| {
            log_failure("Post generation", &e);
            e
        })?;

        Ok::<_, GenerationError>(HttpResponse::Ok().json(posts))
    })
    .await
}

/// Reads the query leniently: repeated or undecodable pairs never reject
/// the request.
fn image_query(req: &HttpRequest) -> ImageQuery {
    match web::Query::<Vec<(String, String)>>::from_query(req.query_string()) {
        Ok(pairs) => ImageQuery::from_pairs(pairs.into_inner()),
        Err(e) => {
            log::warn!("⚠️  Ignoring unreadable query string: {}", e);
            ImageQuery::default()
        }
    }
}

/// `GET|POST /images?name=<theme>`
pub async fn generate_image(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let theme = image_query(&req).theme_or(DEFAULT_THEME);

    logger::with_request_id(logger::new_request_id(), async move {
        log::info!("🎨 Image requested for theme: {}", theme);

        match state.images.generate_image(&theme).await {
            Ok(data_uri) => with_cors(&mut HttpResponse::Ok()).json(ImageResult { data_uri }),
            Err(e) => {
                log_failure("Image generation", &e);
                with_cors(&mut HttpResponse::build(e.status_code()))
                    .json(ErrorBody::new(e.public_message()))
            }
        }
    })
    .await
}

/// `OPTIONS /images`
pub async fn images_preflight() -> HttpResponse {
    with_cors(&mut HttpResponse::Ok()).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ChatConfig,
        generators::{ImageGenerator, PostGenerator},
        models::GenerationParams,
        server::configure,
        test_support::{FakeChat, Outcome, ScriptedModel},
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn state(chat: Arc<FakeChat>, images: Arc<ScriptedModel>) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            PostGenerator::new(chat, GenerationParams::from(&ChatConfig::default())),
            ImageGenerator::new(images),
        ))
    }

    fn assert_cors(headers: &actix_web::http::header::HeaderMap) {
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "Content-Type");
    }

    #[actix_web::test]
    async fn test_empty_input_is_rejected_without_upstream_call() {
        let chat = FakeChat::streaming(&["[]"]);
        let app = test::init_service(
            App::new()
                .app_data(state(chat.clone(), ScriptedModel::always_failing()))
                .configure(configure),
        )
        .await;

        for body in [json!({"input": ""}), json!({"input": "   "}), json!({})] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({"error": "Input is required"}));
        }
        assert_eq!(chat.calls(), 0);
    }

    #[actix_web::test]
    async fn test_posts_are_returned_as_parsed_json() {
        let chat = FakeChat::streaming(&["```json\n[{\"id\": \"1\"}]\n```"]);
        let app = test::init_service(
            App::new()
                .app_data(state(chat, ScriptedModel::always_failing()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"input": "one ethereum post"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([{"id": "1"}]));
    }

    #[actix_web::test]
    async fn test_malformed_generation_is_a_structured_error() {
        let chat = FakeChat::streaming(&["I cannot help with that."]);
        let app = test::init_service(
            App::new()
                .app_data(state(chat, ScriptedModel::always_failing()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"input": "posts"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Generated output was not valid JSON"}));
    }

    #[actix_web::test]
    async fn test_unparseable_body_is_a_structured_error() {
        let app = test::init_service(
            App::new()
                .app_data(state(FakeChat::streaming(&[]), ScriptedModel::always_failing()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid request body"}));
    }

    #[actix_web::test]
    async fn test_image_exhaustion_returns_fixed_error() {
        let images = ScriptedModel::always_failing();
        let app = test::init_service(
            App::new()
                .app_data(state(FakeChat::streaming(&[]), images.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/images?name=pirate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(resp.headers());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"error": "Failed to generate an image after multiple attempts."})
        );
        assert_eq!(images.attempts(), 3);
        assert!(images.prompts().iter().all(|prompt| prompt.contains("pirate")));
    }

    #[actix_web::test]
    async fn test_image_success_on_second_attempt() {
        let images = ScriptedModel::new(vec![Outcome::Fail, Outcome::Image("abc123")]);
        let app = test::init_service(
            App::new()
                .app_data(state(FakeChat::streaming(&[]), images.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/images").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(resp.headers());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({"dataURI": "data:image/jpeg;charset=utf-8;base64,abc123"})
        );
        assert_eq!(images.attempts(), 2);
        assert!(images.prompts()[0].contains(DEFAULT_THEME));
    }

    #[actix_web::test]
    async fn test_empty_theme_falls_back_to_default() {
        let images = ScriptedModel::new(vec![Outcome::Image("x")]);
        let app = test::init_service(
            App::new()
                .app_data(state(FakeChat::streaming(&[]), images.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/images?name=").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(images.prompts()[0].contains(DEFAULT_THEME));
    }

    #[actix_web::test]
    async fn test_repeated_and_odd_query_pairs_still_generate() {
        let images = ScriptedModel::new(vec![Outcome::Image("a"), Outcome::Image("b")]);
        let app = test::init_service(
            App::new()
                .app_data(state(FakeChat::streaming(&[]), images.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/images?name=pirate&name=ninja")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(resp.headers());

        let req = test::TestRequest::get()
            .uri("/images?&=x&size&name=robot")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(resp.headers());

        let prompts = images.prompts();
        assert!(prompts[0].contains("pirate"));
        assert!(!prompts[0].contains("ninja"));
        assert!(prompts[1].contains("robot"));
    }

    #[actix_web::test]
    async fn test_posts_accept_json_without_json_content_type() {
        let chat = FakeChat::streaming(&["[{\"id\": \"7\"}]"]);
        let app = test::init_service(
            App::new()
                .app_data(state(chat.clone(), ScriptedModel::always_failing()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("content-type", "text/plain;charset=UTF-8"))
            .set_payload(r#"{"input":"posts"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(chat.calls(), 1);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([{"id": "7"}]));
    }

    #[actix_web::test]
    async fn test_preflight() {
        let images = ScriptedModel::always_failing();
        let app = test::init_service(
            App::new()
                .app_data(state(FakeChat::streaming(&[]), images.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/images")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(resp.headers());
        assert_eq!(images.attempts(), 0);
    }
}

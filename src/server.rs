use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{Next, from_fn};
use axum::response::{Html, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::animeworld::{AnimeWorld, EpisodeRequest, Settings};
use crate::config::Config;
use crate::error::ExtractError;

const VIDEO_PATH: &str = "/api/get-anime-video";

const MISSING_PARAMS: &str =
    "Missing required parameters: animeTitle, season, and episode are required.";
const INVALID_NUMBERS: &str = "Season and episode must be positive integers.";
const INVALID_QUERY: &str = "Query string is malformed.";
const INVALID_LANGUAGE: &str = "Language must be a non-negative integer.";
const NOT_FOUND: &str = "Video not found for the specified episode.";
const LOOKUP_FAILED: &str = "Failed to fetch video URL. Please try again later.";
const METHOD_NOT_ALLOWED: &str = "Method not allowed. Use GET.";

#[derive(Clone)]
pub struct AppState {
    pub animeworld: AnimeWorld,
    pub default_language_option: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to build http client: {0}")]
    Client(#[from] ExtractError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoQuery {
    anime_title: Option<String>,
    season: Option<String>,
    episode: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct VideoResponse {
    success: bool,
    video_url: String,
    data: VideoData,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct VideoData {
    anime: String,
    season: u32,
    episode: u32,
    language: Option<String>,
    video_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
struct ErrorResponse {
    success: bool,
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        }),
    )
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "animeworld-link",
        version = "0.1.0",
        license(
            name = "MIT",
            identifier = "MIT"
        )
    ),
    paths(get_anime_video, healthcheck),
    components(schemas(VideoResponse, VideoData, ErrorResponse)),
    tags(
        (name = "animeworld", description = "Episode video link lookup")
    )
)]
struct ApiDoc;

pub fn router(state: AppState) -> Router {
    let video_router = Router::new()
        .route(
            VIDEO_PATH,
            get(get_anime_video)
                .head(method_not_allowed)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route_layer(from_fn(cors_middleware))
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/healthcheck", get(healthcheck).head(healthcheck))
        .route("/watch", get(watch))
        .merge(video_router)
        .layer(from_fn(request_logging_middleware))
}

pub async fn serve(config: Config) -> Result<(), ServeError> {
    let mut settings = Settings::server(config.base_url);
    settings.timeout = config.request_timeout;
    let state = AppState {
        animeworld: AnimeWorld::new(settings)?,
        default_language_option: config.api_language_option,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

#[utoipa::path(
    get,
    path = "/api/get-anime-video",
    params(
        ("animeTitle" = String, Query, description = "Anime title, spaces allowed"),
        ("season" = u32, Query, description = "Season number, starting at 1"),
        ("episode" = u32, Query, description = "Episode number, starting at 1"),
        ("language" = Option<u32>, Query, description = "Index into the episode's language list")
    ),
    responses(
        (status = 200, description = "Video link found", body = VideoResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Lookup failed", body = ErrorResponse)
    ),
    tag = "animeworld"
)]
async fn get_anime_video(
    State(state): State<AppState>,
    query: Result<Query<VideoQuery>, QueryRejection>,
) -> Result<Json<VideoResponse>, ApiError> {
    let Query(params) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected query string");
        api_error(StatusCode::BAD_REQUEST, INVALID_QUERY)
    })?;

    let (Some(title), Some(season), Some(episode)) = (
        non_blank(params.anime_title),
        non_blank(params.season),
        non_blank(params.episode),
    ) else {
        return Err(api_error(StatusCode::BAD_REQUEST, MISSING_PARAMS));
    };

    let (Some(season), Some(episode)) = (parse_positive(&season), parse_positive(&episode))
    else {
        return Err(api_error(StatusCode::BAD_REQUEST, INVALID_NUMBERS));
    };

    let language_option = match non_blank(params.language) {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| api_error(StatusCode::BAD_REQUEST, INVALID_LANGUAGE))?,
        None => state.default_language_option,
    };

    let request =
        EpisodeRequest::new(title.clone(), season, episode).with_language_option(language_option);
    let animeworld = state.animeworld;
    let link = tokio::spawn(async move { animeworld.video_link(&request).await })
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "video lookup task failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, LOOKUP_FAILED)
        })?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, NOT_FOUND))?;

    Ok(Json(VideoResponse {
        success: true,
        video_url: link.url.clone(),
        data: VideoData {
            anime: title,
            season,
            episode,
            language: link.language,
            video_url: link.url,
        },
    }))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    api_error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}

#[utoipa::path(
    get,
    path = "/healthcheck",
    responses(
        (status = 200, description = "OK")
    ),
    tag = "animeworld"
)]
async fn healthcheck() -> StatusCode {
    StatusCode::OK
}

async fn watch() -> Html<&'static str> {
    Html(include_str!("watch.html"))
}

async fn cors_middleware(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

async fn request_logging_middleware(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path();
    if path == "/healthcheck" {
        return next.run(req).await;
    }

    let start = std::time::Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis(),
        "request"
    );
    response
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

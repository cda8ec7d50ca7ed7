//! API Server Entry Point
//!
//! Reads configuration from the environment, runs migrations and serves
//! the users, tours and reviews routers under `/api/v1`. Startup errors
//! use `anyhow`; request errors render through `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthAppState, AuthConfig, PgUserRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::crypto::from_base64;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tours::{PgTourRepository, TourAppState, TourConfig, reviews_router, tours_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:8080,http://127.0.0.1:8080";

/// Read `key`, falling back to `default` when unset.
fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value")),
        Err(_) => Ok(default),
    }
}

const SECONDS_PER_DAY: u64 = 86_400;

/// Token lifetime in whole days.
fn token_ttl(days: u64) -> anyhow::Result<Duration> {
    days.checked_mul(SECONDS_PER_DAY)
        .map(Duration::from_secs)
        .with_context(|| format!("JWT_EXPIRES_IN_DAYS={days} is too large"))
}

/// Token, cookie and pepper settings from the environment.
///
/// `JWT_SECRET` is required in release builds; debug builds fall back to
/// a random secret so tokens die with the process.
fn auth_config() -> anyhow::Result<AuthConfig> {
    let base = match env::var("JWT_SECRET") {
        Ok(secret_b64) => AuthConfig {
            token_secret: from_base64(&secret_b64).context("JWT_SECRET must be base64")?,
            ..AuthConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET not set, using a random development secret");
            AuthConfig::development()
        }
        Err(_) => anyhow::bail!("JWT_SECRET must be set in production"),
    };

    let token_ttl = token_ttl(env_parse("JWT_EXPIRES_IN_DAYS", 90)?)?;
    let cookie_secure = env_parse("COOKIE_SECURE", !cfg!(debug_assertions))?;
    let password_pepper = env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|p| !p.is_empty())
        .map(String::into_bytes);

    Ok(AuthConfig {
        token_ttl,
        cookie_secure,
        password_pepper,
        ..base
    })
}

fn cors_layer() -> CorsLayer {
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "natours_api=info,auth=info,tours=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections: u32 = env_parse("DATABASE_MAX_CONNECTIONS", 5)?;

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Application state
    let auth_state = AuthAppState::new(PgUserRepository::new(pool.clone()), auth_config()?)?;
    let tour_state = TourAppState::new(PgTourRepository::new(pool.clone()), TourConfig::default());

    // Build router
    let app = Router::new()
        .nest("/api/v1/users", auth_router(auth_state.clone()))
        .nest(
            "/api/v1/tours",
            tours_router(tour_state.clone(), auth_state.clone()),
        )
        .nest("/api/v1/reviews", reviews_router(tour_state, auth_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        );

    // Start server
    let addr: SocketAddr = env_parse("BIND_ADDR", DEFAULT_BIND_ADDR.parse()?)?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod hal;
pub mod middleware;
pub mod observability;
pub mod routes;

pub use routes::AppState;

/// Create the app router for testing
///
/// Builds the full Axum router against the given pool with a fixed test
/// configuration, so integration tests can drive it without starting the
/// server.
pub fn create_app(db_pool: sqlx::SqlitePool) -> axum::Router {
    let state = AppState {
        config: config::Config {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: config::DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: config::JwtConfig {
                secret: "test_secret_key_minimum_32_characters_long".to_string(),
                expiration_days: 7,
            },
        },
        pool: db_pool,
    };

    routes::router(state)
}

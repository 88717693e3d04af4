use shareit::{
    adapters::postgres::{
        PostgresBookingStore, PostgresCommentStore, PostgresItemStore, PostgresRequestStore,
        PostgresUserStore,
    },
    api::{handlers::AppState, router::create_router},
    application::Stores,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shareit=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection URL
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/shareit".into());

    tracing::info!("Database URL: {}", database_url);

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Apply pending migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    let stores = Stores {
        users: Arc::new(PostgresUserStore::new(pool.clone())),
        items: Arc::new(PostgresItemStore::new(pool.clone())),
        bookings: Arc::new(PostgresBookingStore::new(pool.clone())),
        comments: Arc::new(PostgresCommentStore::new(pool.clone())),
        requests: Arc::new(PostgresRequestStore::new(pool.clone())),
    };

    // Create application state
    let app_state = Arc::new(AppState { stores });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod models;
mod routes;
mod service;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use crate::db::MarketStore;

// Import the services
use service::{
    escrow_service::{EscrowGateway, TrustlessEscrowService},
    job_service::JobService,
    notification_service::NotificationService,
    review_service::ReviewService,
    stellar::{PaymentGateway, StellarPaymentService},
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub job_service: Arc<JobService>,
    pub review_service: Arc<ReviewService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);
        let store: Arc<dyn MarketStore> = db_client.clone();

        let payments: Arc<dyn PaymentGateway> = Arc::new(StellarPaymentService::new(&config));
        let escrow: Option<Arc<dyn EscrowGateway>> = config.escrow_api_key.clone().map(|key| {
            Arc::new(TrustlessEscrowService::new(config.escrow_api_url.clone(), key))
                as Arc<dyn EscrowGateway>
        });

        let notification_service = Arc::new(NotificationService::new(store.clone()));
        let job_service = Arc::new(JobService::new(
            store.clone(),
            payments,
            escrow,
            notification_service.clone(),
            config.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(store, config.clone()));

        Self {
            env: config,
            db_client,
            job_service,
            review_service,
            notification_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        config.app_url.parse::<HeaderValue>().unwrap(),
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:3000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    println!("🚀 Server is running on http://localhost:{}", config.port);
    if app_state.env.escrow_api_key.is_none() {
        println!("ℹ️  ESCROW_API_KEY not set - claims will skip escrow creation");
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}

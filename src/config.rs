#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub port: u16,
    // Stellar network configuration
    pub horizon_url: String,
    pub network_passphrase: String,
    pub network_name: String,
    pub token_contract: String,
    // Escrow service configuration (escrow is skipped when no key is set)
    pub escrow_api_url: String,
    pub escrow_api_key: Option<String>,
    pub escrow_dispute_resolver: Option<String>,
    pub escrow_deadline_days: i64,
    // Reviews contract configuration
    pub reviews_contract_id: Option<String>,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(8000);

        // Stellar network configuration (testnet defaults)
        let horizon_url = std::env::var("HORIZON_URL")
            .unwrap_or_else(|_| "https://horizon-testnet.stellar.org".to_string());
        let network_passphrase = std::env::var("NETWORK_PASSPHRASE")
            .unwrap_or_else(|_| "Test SDF Network ; September 2015".to_string());
        let network_name = std::env::var("NETWORK_NAME")
            .unwrap_or_else(|_| "TESTNET".to_string());
        let token_contract = std::env::var("TOKEN_CONTRACT")
            .unwrap_or_else(|_| "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC".to_string());

        // Escrow service configuration
        let escrow_api_url = std::env::var("ESCROW_API_URL")
            .unwrap_or_else(|_| "https://api.trustlesswork.com".to_string());
        let escrow_api_key = std::env::var("ESCROW_API_KEY").ok();
        let escrow_dispute_resolver = std::env::var("ESCROW_DISPUTE_RESOLVER").ok();
        let escrow_deadline_days = std::env::var("ESCROW_DEADLINE_DAYS")
            .ok()
            .and_then(|days| days.parse::<i64>().ok())
            .unwrap_or(30);

        let reviews_contract_id = std::env::var("REVIEWS_CONTRACT_ID").ok();

        Config {
            database_url,
            app_url,
            port,
            horizon_url,
            network_passphrase,
            network_name,
            token_contract,
            escrow_api_url,
            escrow_api_key,
            escrow_dispute_resolver,
            escrow_deadline_days,
            reviews_contract_id,
        }
    }
}

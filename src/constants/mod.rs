pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct Env {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_attempts: u32,
    pub db_connect_retry_secs: u64,
    pub page_size: u32,
    pub request_timeout_ms: u64,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub workers: usize,
}

fn var_or<T: std::str::FromStr>(key: &str, default: &str) -> T {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .unwrap_or_else(|_| panic!("{key} must be a valid number"))
}

impl Env {
    fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let db_max_connections = var_or::<u32>("DB_MAX_CONNECTIONS", "5");
        let db_connect_attempts = var_or::<u32>("DB_CONNECT_ATTEMPTS", "10").max(1);
        let db_connect_retry_secs = var_or::<u64>("DB_CONNECT_RETRY_SECS", "3");

        let page_size = var_or::<u32>("PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string());
        assert!(page_size >= 1, "PAGE_SIZE must be at least 1");
        let request_timeout_ms = var_or::<u64>("REQUEST_TIMEOUT_MS", "5000");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = var_or::<u16>("PORT", "8080");
        let workers = var_or::<usize>("WORKERS", "2");

        Env {
            database_url,
            db_max_connections,
            db_connect_attempts,
            db_connect_retry_secs,
            page_size,
            request_timeout_ms,
            frontend_url,
            ip,
            port,
            workers,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

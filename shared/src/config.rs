use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub notifier: NotifierConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        // The webhook is optional; without it transitions are only logged.
        let notifier = NotifierConfig {
            webhook_url: std::env::var("NOTIFICATION_WEBHOOK_URL").ok(),
        };
        Ok(Self { database, notifier })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone)]
pub struct NotifierConfig {
    pub webhook_url: Option<String>,
}

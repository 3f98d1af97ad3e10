use envconfig::Envconfig;

#[derive(Debug, Envconfig)]
pub struct Config {
    #[envconfig(from = "DATABASE_URL")]
    pub db_url: String,
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
    #[envconfig(from = "DB_POOL_SIZE", default = "16")]
    pub pool_size: usize,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();
        Ok(Config::init_from_env()?)
    }
}

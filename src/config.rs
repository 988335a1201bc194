use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Public origin of the storefront, used to build order/delivery URLs.
    pub base_url: String,
    /// Shared secret for `/api/admin/*`. Admin routes reject everything
    /// while this is unset.
    pub admin_secret: Option<String>,
    /// Shared secret for `/api/webhook/payment`. Same rule: unset means
    /// the webhook is closed.
    pub webhook_secret: Option<String>,
    /// Prefix for newly minted license keys (e.g. "VG" -> VG-XXXX-XXXX-XXXX).
    pub license_key_prefix: String,
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8787);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "valegate.db".to_string()),
            base_url,
            admin_secret: non_empty("ADMIN_SECRET"),
            webhook_secret: non_empty("WEBHOOK_SECRET"),
            license_key_prefix: env::var("LICENSE_KEY_PREFIX")
                .unwrap_or_else(|_| "VG".to_string()),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application configuration module
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub listen_addr: String,
    pub http: HttpSettings,
}

#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |primary: &str, fallback: &str| {
            lookup(primary)
                .or_else(|| lookup(fallback))
                .filter(|v| !v.trim().is_empty())
        };

        let api_url = pick("API_URL", "NEXT_PUBLIC_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            anyhow::bail!("API_URL must be an http(s) URL, got {:?}", api_url);
        }

        let app_name = pick("APP_NAME", "NEXT_PUBLIC_APP_NAME")
            .unwrap_or_else(|| "Space Debris Risk Model".to_string());
        let app_version =
            pick("APP_VERSION", "NEXT_PUBLIC_APP_VERSION").unwrap_or_else(|| "1.0.0".to_string());
        let environment = pick("APP_ENV", "NODE_ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or(Environment::Development);

        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let http = HttpSettings {
            timeout_seconds: lookup_u64(&lookup, "REQUEST_TIMEOUT_SECONDS", 30),
            connect_timeout_seconds: lookup_u64(&lookup, "CONNECT_TIMEOUT_SECONDS", 10),
        };

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            app_name,
            app_version,
            environment,
            listen_addr,
            http,
        })
    }

    /// Configuration pointing at a specific API, everything else default
    pub fn for_api(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            app_name: "Space Debris Risk Model".to_string(),
            app_version: "1.0.0".to_string(),
            environment: Environment::Test,
            listen_addr: "127.0.0.1:0".to_string(),
            http: HttpSettings {
                timeout_seconds: 5,
                connect_timeout_seconds: 2,
            },
        }
    }
}

fn lookup_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

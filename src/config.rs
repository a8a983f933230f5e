use anyhow::{bail, Context, Result};

pub const DEFAULT_KHIPU_TARGET_API_URL: &str = "https://payment-api.khipu.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Sandbox,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    // Khipu credentials
    pub khipu_api_key: Option<String>,
    pub khipu_target_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::parse_environment(&lookup)?;

        let config = Self {
            environment,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            // An empty key counts as missing
            khipu_api_key: lookup("KHIPU_MERCHANT_API_KEY").filter(|key| !key.is_empty()),
            khipu_target_api_url: lookup("KHIPU_TARGET_API_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_KHIPU_TARGET_API_URL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_environment<F>(lookup: &F) -> Result<Environment>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        match env.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "sandbox" | "test" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", env),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.khipu_target_api_url.starts_with("http") {
            bail!("KHIPU_TARGET_API_URL must be HTTP(S) URL");
        }

        if self.khipu_api_key.is_none() {
            tracing::warn!(
                "KHIPU_MERCHANT_API_KEY is not set, payment creation will fail with 500"
            );
        }

        tracing::info!(
            "Configuration validated for {:?} environment",
            self.environment
        );

        Ok(())
    }
}

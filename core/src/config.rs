//! Dashboard configuration.
//!
//! Tunables live in a JSON file (see `data/dashboard.json`); secrets are
//! read from the environment, optionally seeded from a `.env` file.
//! In tests, use DashConfig::default_test().

use crate::{
    error::{DashError, DashResult},
    generator::MAX_DAY_COUNT,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub default_seed: u64,
    pub default_day_count: i64,
    /// Mean orders per ordinary day.
    pub orders_per_day_mean: f64,
    /// Multiplier applied on Friday and Saturday.
    pub peak_day_factor: f64,
    pub customer_count: u32,
    pub first_order_number: u64,
    pub max_packs_per_order: u32,
    pub tax_rate: f64,
    /// Orders never total less than this, in cents.
    pub min_order_total_cents: i64,
    /// Fulfilment strictly slower than this many days is late.
    pub late_threshold_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    pub default_seed: u64,
    pub default_day_count: i64,
    pub min_conversion_rate: f64,
    pub max_conversion_rate: f64,
    pub conversion_noise_std: f64,
    pub min_avg_ticket: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When false every page is served without a signed-in session.
    pub require_login: bool,
    pub oauth_provider: String,
    #[serde(default)]
    pub oauth_redirect_to: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    pub generator: GeneratorConfig,
    pub traffic: TrafficConfig,
    pub advisor: AdvisorConfig,
    pub auth: AuthConfig,
    /// Rows shown in the recent-orders table.
    pub recent_rows: usize,
    /// Rows shown in top-N rankings.
    pub top_n: usize,
}

impl DashConfig {
    /// Load from a JSON config file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded dashboard config from {path}");
        Ok(config)
    }

    /// Reject tunables the generators cannot honour: windows beyond
    /// `MAX_DAY_COUNT`, empty customer or pack ranges, and order means that
    /// are negative, non-finite or above `MAX_ORDERS_PER_DAY_MEAN` on a
    /// peak day.
    pub fn validate(&self) -> DashResult<()> {
        let g = &self.generator;
        for (name, days) in [
            ("generator.default_day_count", g.default_day_count),
            ("traffic.default_day_count", self.traffic.default_day_count),
        ] {
            if days > MAX_DAY_COUNT {
                return Err(invalid(format!(
                    "{name} must be at most {MAX_DAY_COUNT}, got {days}"
                )));
            }
        }
        if g.customer_count == 0 || g.max_packs_per_order == 0 {
            return Err(invalid(
                "generator.customer_count and generator.max_packs_per_order must be positive".into(),
            ));
        }
        let mean_ok = g.orders_per_day_mean.is_finite() && g.orders_per_day_mean >= 0.0;
        let factor_ok = g.peak_day_factor.is_finite() && g.peak_day_factor >= 0.0;
        let peak_mean = g.orders_per_day_mean * g.peak_day_factor.max(1.0);
        if !mean_ok || !factor_ok || peak_mean > MAX_ORDERS_PER_DAY_MEAN {
            return Err(invalid(format!(
                "generator.orders_per_day_mean x peak_day_factor must lie in 0..={MAX_ORDERS_PER_DAY_MEAN}, \
                 got {} x {}",
                g.orders_per_day_mean, g.peak_day_factor
            )));
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            generator: GeneratorConfig {
                default_seed: 123,
                default_day_count: 90,
                orders_per_day_mean: 35.0,
                peak_day_factor: 1.3,
                customer_count: 200,
                first_order_number: 10_000,
                max_packs_per_order: 5,
                tax_rate: 0.09,
                min_order_total_cents: 100,
                late_threshold_days: 3,
            },
            traffic: TrafficConfig {
                default_seed: 42,
                default_day_count: 365,
                min_conversion_rate: 0.006,
                max_conversion_rate: 0.13,
                conversion_noise_std: 0.004,
                min_avg_ticket: 8.0,
            },
            advisor: AdvisorConfig {
                model: "gemini-2.5-flash".into(),
                api_base: "https://generativelanguage.googleapis.com".into(),
                timeout_secs: 60,
            },
            auth: AuthConfig {
                require_login: false,
                oauth_provider: "google".into(),
                oauth_redirect_to: None,
                timeout_secs: 30,
            },
            recent_rows: 300,
            top_n: 10,
        }
    }
}

/// Highest mean daily order count the generator accepts on a peak day.
pub const MAX_ORDERS_PER_DAY_MEAN: f64 = 1_000.0;

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Secrets resolved from the environment. Each is optional here;
/// accessors turn an absent value into `DashError::MissingConfig`.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub google_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment after loading `.env`
    /// from the working directory (if present).
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            google_api_key: get(GOOGLE_API_KEY),
            supabase_url: get(SUPABASE_URL),
            supabase_anon_key: get(SUPABASE_ANON_KEY),
        }
    }

    pub fn google_api_key(&self) -> DashResult<&str> {
        require(&self.google_api_key, GOOGLE_API_KEY)
    }

    pub fn supabase_url(&self) -> DashResult<&str> {
        require(&self.supabase_url, SUPABASE_URL)
    }

    pub fn supabase_anon_key(&self) -> DashResult<&str> {
        require(&self.supabase_anon_key, SUPABASE_ANON_KEY)
    }
}

fn invalid(message: String) -> DashError {
    DashError::InvalidInput(message)
}

fn require<'a>(value: &'a Option<String>, key: &str) -> DashResult<&'a str> {
    value.as_deref().ok_or_else(|| DashError::MissingConfig { key: key.to_string() })
}

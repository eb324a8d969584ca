//! Application configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cache::CacheConfig;
use crate::fetcher::{
    ClientError, FixtureError, FixtureRouteFetcher, HttpRouteClient, RouteBackend,
    RouteServiceConfig, StubConfig, StubRouteFetcher,
};
use crate::presentation::{MapProvider, UnknownMapProvider};

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
/// Upper bound for any configured duration; the cache builder panics well above this.
const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    MapProvider(#[from] UnknownMapProvider),

    #[error("failed to load route fixture: {0}")]
    Fixture(#[from] FixtureError),

    #[error("failed to create route service client: {0}")]
    Client(#[from] ClientError),
}

/// Which route backend to run against.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Stub(StubConfig),
    Fixture(PathBuf),
    Http(RouteServiceConfig),
}

impl BackendConfig {
    /// Construct the backend this configuration describes.
    pub fn build(&self) -> Result<RouteBackend, ConfigError> {
        Ok(match self {
            BackendConfig::Stub(config) => RouteBackend::Stub(StubRouteFetcher::new(config.clone())),
            BackendConfig::Fixture(path) => RouteBackend::Fixture(FixtureRouteFetcher::new(path)?),
            BackendConfig::Http(config) => RouteBackend::Http(HttpRouteClient::new(config.clone())?),
        })
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub backend: BackendConfig,
    pub fetch_timeout: Duration,
    pub cache: CacheConfig,
    pub session_idle: Duration,
    pub map_provider: MapProvider,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            backend: BackendConfig::Stub(StubConfig::default()),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            cache: CacheConfig::default(),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            map_provider: MapProvider::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value if set.
    ///
    /// ```
    /// use transit_server::config::{AppConfig, BackendConfig};
    ///
    /// let config = AppConfig::from_lookup(|var| match var {
    ///     "ROUTE_SERVICE_URL" => Some("https://routes.example.com".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert!(matches!(config.backend, BackendConfig::Http(_)));
    /// ```
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_raw = get("TRANSIT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                var: "TRANSIT_BIND",
                value: bind_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let fetch_timeout_secs = parse_secs(&get, "FETCH_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        let backend = if let Some(url) = get("ROUTE_SERVICE_URL") {
            let mut service = RouteServiceConfig::new(url.trim()).with_timeout(fetch_timeout_secs);
            if let Some(key) = get("ROUTE_SERVICE_API_KEY") {
                service = service.with_api_key(key);
            }
            BackendConfig::Http(service)
        } else if let Some(path) = get("ROUTE_FIXTURE_PATH") {
            BackendConfig::Fixture(PathBuf::from(path))
        } else {
            let mut stub = StubConfig::default();
            if let Some(ms) = parse_u64(&get, "STUB_LATENCY_MS")? {
                stub = stub.with_latency(Duration::from_millis(ms));
            }
            if let Some(seed) = parse_u64(&get, "STUB_SEED")? {
                stub = stub.with_seed(seed);
            }
            BackendConfig::Stub(stub)
        };

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_secs(&get, "ROUTE_CACHE_TTL_SECS")? {
            cache.ttl = Duration::from_secs(secs);
        }

        let session_idle = Duration::from_secs(
            parse_secs(&get, "SESSION_IDLE_SECS")?.unwrap_or(DEFAULT_SESSION_IDLE_SECS),
        );

        let map_provider = match get("MAP_PROVIDER") {
            Some(name) => name.parse()?,
            None => MapProvider::default(),
        };

        let static_dir = get("TRANSIT_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            bind,
            backend,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            cache,
            session_idle,
            map_provider,
            static_dir,
        })
    }
}

fn parse_u64<G>(get: &G, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    get(var)
        .map(|value| {
            value.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_secs<G>(get: &G, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match parse_u64(get, var)? {
        Some(secs) if secs > MAX_DURATION_SECS => Err(ConfigError::Invalid {
            var,
            value: secs.to_string(),
            reason: format!("must be at most {MAX_DURATION_SECS} seconds"),
        }),
        secs => Ok(secs),
    }
}

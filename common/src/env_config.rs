use std::{env, sync::Arc, time::Duration};

/// Minimum accepted length of `JWT_SECRET`.
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to start the HTTP server and its collaborators:
/// database connection, session signing, blob storage, outbound mail and the
/// gym metadata printed on reports and messages.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) sessions.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Whole-server request budget per second.
    pub global_rps: u32,
    /// Upper bound on distinct clients tracked by the fixed-window limiter.
    pub rate_limit_max_keys: usize,
    /// Timeout applied to outbound HTTP calls (storage, image fetches).
    pub http_timeout: Duration,
    /// Blob storage backend.
    pub storage: StorageConfig,
    /// Outbound mail relay.
    pub mail: MailConfig,
    /// Gym display metadata.
    pub gym: GymConfig,
    /// Optional first admin account, created when no staff user exists.
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign session tokens and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Base URL of the storage REST API.
    pub url: String,
    /// Service key sent as `apikey` and bearer token.
    pub service_key: String,
    /// Bucket holding marketing images.
    pub bucket: String,
}

#[derive(Clone, Debug, Default)]
/// SMTP relay settings. Every field is optional at startup; sending mail
/// requires [`MailConfig::missing`] to be empty.
pub struct MailConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Sender address.
    pub from: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GymConfig {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub map_url: String,
    pub logo_path: String,
}

#[derive(Clone, Debug)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl MailConfig {
    /// Names of the variables required for sending mail that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push("SMTP_HOST");
        }
        if self.user.is_none() {
            missing.push("SMTP_USER");
        }
        if self.pass.is_none() {
            missing.push("SMTP_PASS");
        }
        if self.from.is_none() {
            missing.push("GYM_EMAIL");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// - `JWT_SECRET`: Required, at least [`MIN_JWT_SECRET_LEN`] characters.
    /// - `JWT_EXPIRATION_HOURS`: Optional. Defaults to 8 hours if not provided.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or too short, or if
    /// `JWT_EXPIRATION_HOURS` is set but not a number.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key| env::var(key).ok())
    }

    fn from_lookup(var: &dyn Fn(&str) -> Option<String>) -> Self {
        let secret = var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(
            secret.len() >= MIN_JWT_SECRET_LEN,
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LEN
        );

        JwtConfig {
            secret,
            expiration_hours: var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|| "8".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Session signing key (via `JwtConfig`)
    /// - `STORAGE_URL`, `STORAGE_SERVICE_KEY`: Blob storage backend
    ///
    /// Optional (with defaults):
    /// - `IP` (127.0.0.1), `PORT` (8080), `WORKERS` (4)
    /// - `CORS_ALLOWED_ORIGIN` (http://localhost:3000)
    /// - `ENABLE_CONSOLE_LOGGING` (true)
    /// - `GLOBAL_RPS` (50), `RATE_LIMIT_MAX_KEYS` (10000), `HTTP_TIMEOUT_SECS` (30)
    /// - `STORAGE_BUCKET` (marketing-images)
    /// - `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_USER`, `SMTP_PASS`, `GYM_EMAIL`
    /// - `GYM_NAME`, `GYM_CONTACT`, `GYM_ADDRESS`, `GYM_MAP_URL`, `GYM_LOGO_PATH`
    /// - `SEED_ADMIN_USERNAME`, `SEED_ADMIN_PASSWORD`
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing or if
    /// numeric values cannot be parsed correctly.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();
        Arc::new(Self::from_lookup(&|key| env::var(key).ok()))
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(var: &dyn Fn(&str) -> Option<String>) -> Self {
        // empty values count as unset
        let opt = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| opt(key).unwrap_or_else(|| default.to_string());

        let seed_admin = match (opt("SEED_ADMIN_USERNAME"), opt("SEED_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(SeedAdmin { username, password }),
            _ => None,
        };

        Config {
            environment: opt("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: opt("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_lookup(var),
            server_host: or("IP", "127.0.0.1"),
            server_port: or("PORT", "8080").parse().unwrap_or(8080),
            num_workers: or("WORKERS", "4").parse().unwrap_or(4),
            cors_allowed_origin: or("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            console_logging_enabled: or("ENABLE_CONSOLE_LOGGING", "true").to_lowercase()
                == "true",
            global_rps: or("GLOBAL_RPS", "50").parse().unwrap_or(50),
            rate_limit_max_keys: or("RATE_LIMIT_MAX_KEYS", "10000").parse().unwrap_or(10_000),
            http_timeout: Duration::from_secs(
                or("HTTP_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            ),
            storage: StorageConfig {
                url: opt("STORAGE_URL").expect("STORAGE_URL must be set"),
                service_key: opt("STORAGE_SERVICE_KEY").expect("STORAGE_SERVICE_KEY must be set"),
                bucket: or("STORAGE_BUCKET", "marketing-images"),
            },
            mail: MailConfig {
                host: opt("SMTP_HOST"),
                port: or("SMTP_PORT", "587")
                    .parse()
                    .expect("SMTP_PORT must be a valid port number"),
                user: opt("SMTP_USER"),
                pass: opt("SMTP_PASS"),
                from: opt("GYM_EMAIL"),
            },
            gym: GymConfig {
                name: or("GYM_NAME", "Your Gym Name"),
                contact: or("GYM_CONTACT", ""),
                address: or("GYM_ADDRESS", ""),
                map_url: or("GYM_MAP_URL", "https://g.co/kgs/mQtKEQ"),
                logo_path: or("GYM_LOGO_PATH", "public/logo.png"),
            },
            seed_admin,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

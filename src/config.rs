/// Configuration management for blog-service
///
/// All settings come from environment variables with development
/// defaults; production refuses the unsafe ones (wildcard CORS,
/// missing JWT secret).
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Token issuing / validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("BLOG_SERVICE_PORT", 8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/blog".to_string()),
                max_connections: parse_env_with_default("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parse_env_with_default("DATABASE_MIN_CONNECTIONS", 1),
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) if !value.trim().is_empty() => value,
                    _ if is_production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => "development-secret-do-not-use".to_string(),
                };

                AuthConfig {
                    jwt_secret,
                    token_ttl_secs: parse_env_with_default("JWT_TTL_SECS", 86_400),
                }
            },
        })
    }
}

/// Parse an environment variable with a default fallback
fn parse_env_with_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests share process state, keep each key distinct.

    #[test]
    fn parse_env_with_default_falls_back() {
        let result: u16 = parse_env_with_default("BLOG_TEST_MISSING_PORT", 8080);
        assert_eq!(result, 8080);

        std::env::set_var("BLOG_TEST_SET_PORT", "9000");
        let result: u16 = parse_env_with_default("BLOG_TEST_SET_PORT", 8080);
        assert_eq!(result, 9000);
        std::env::remove_var("BLOG_TEST_SET_PORT");
    }

    #[test]
    fn development_defaults_load_without_env() {
        std::env::remove_var("APP_ENV");
        let config = Config::from_env().expect("development config loads");
        assert_eq!(config.app.env, "development");
        assert!(!config.auth.jwt_secret.is_empty());
    }
}

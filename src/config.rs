use serde::Deserialize;

/// Upper bound for `JWT_TTL_MINUTES`: one year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 366;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        // argon2 crate defaults: ~tens of milliseconds per hash
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub hash: HashConfig,
    pub seed_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "userdir".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "userdir-users".into()),
            ttl_minutes: check_ttl_minutes(env_or("JWT_TTL_MINUTES", 60))?,
        };
        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: env_or("HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: env_or("HASH_ITERATIONS", defaults.iterations),
            parallelism: env_or("HASH_PARALLELISM", defaults.parallelism),
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            jwt,
            hash,
            seed_file: std::env::var("SEED_FILE").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn check_ttl_minutes(minutes: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("USERDIR_TEST_UNSET_VAR", 42u32), 42);
        std::env::set_var("USERDIR_TEST_GARBAGE_VAR", "not-a-number");
        assert_eq!(env_or("USERDIR_TEST_GARBAGE_VAR", 7i64), 7);
        std::env::set_var("USERDIR_TEST_PORT_VAR", "9090");
        assert_eq!(env_or("USERDIR_TEST_PORT_VAR", 8080u16), 9090);
    }

    #[test]
    fn ttl_minutes_must_be_in_range() {
        assert_eq!(check_ttl_minutes(60).unwrap(), 60);
        assert_eq!(check_ttl_minutes(MAX_TTL_MINUTES).unwrap(), MAX_TTL_MINUTES);
        assert!(check_ttl_minutes(0).is_err());
        assert!(check_ttl_minutes(-5).is_err());
        let err = check_ttl_minutes(i64::MAX).unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));
    }
}

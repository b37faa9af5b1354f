use std::env;

/// Which remote data service implementation the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBackend {
    /// Hosted PostgREST endpoint (Supabase).
    Postgrest,
    /// Empty in-process store, for local demos.
    Memory,
}

impl DataBackend {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Postgrest
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_backend: DataBackend,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub admin_api_token: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let data_backend = DataBackend::parse(
            &env::var("DATA_BACKEND").unwrap_or_else(|_| "postgrest".to_string()),
        );

        // The remote credentials are only mandatory when we actually talk to it.
        let (supabase_url, supabase_anon_key) = match data_backend {
            DataBackend::Postgrest => (env::var("SUPABASE_URL")?, env::var("SUPABASE_ANON_KEY")?),
            DataBackend::Memory => (
                env::var("SUPABASE_URL").unwrap_or_default(),
                env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            ),
        };

        Ok(Self {
            data_backend,
            supabase_url,
            supabase_anon_key,
            admin_api_token: env::var("ADMIN_API_TOKEN")?,
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_backend_parse() {
        assert_eq!(DataBackend::parse("memory"), DataBackend::Memory);
        assert_eq!(DataBackend::parse("MEMORY"), DataBackend::Memory);
        assert_eq!(DataBackend::parse("postgrest"), DataBackend::Postgrest);
        assert_eq!(DataBackend::parse("anything"), DataBackend::Postgrest);
    }
}

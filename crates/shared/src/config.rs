use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub todos_table: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            supabase_url: env::var("SUPABASE_URL")
                .map_err(|_| "SUPABASE_URL is not set")?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map_err(|_| "SUPABASE_ANON_KEY is not set")?,
            todos_table: env::var("TODOS_TABLE")
                .unwrap_or_else(|_| "todos".to_string()),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "dev".to_string()),
        })
    }
}

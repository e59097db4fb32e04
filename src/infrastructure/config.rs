use anyhow::{Context, Result};
use std::env;

const DEFAULT_PORT: u16 = 8080;

// Read once at startup and passed by reference from there on; nothing else
// touches the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub auth_token: String,
    pub login_email: String,
    pub login_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let auth_token = env::var("AUTH_TOKEN").context("AUTH_TOKEN must be set")?;
        let login_email = env::var("LOGIN_EMAIL").context("LOGIN_EMAIL must be set")?;
        let login_password = env::var("LOGIN_PASSWORD").context("LOGIN_PASSWORD must be set")?;

        Ok(Self {
            database_url,
            port,
            auth_token,
            login_email,
            login_password,
        })
    }
}

use crate::domain::book::LoginData;
use crate::domain::error::DomainError;
use crate::infrastructure::config::Config;
use anyhow::Result;
use tracing::{info, warn};

// There is no user table: login is a comparison against the credentials the
// process was configured with, and the "session" is the process-wide token.
pub struct AuthService {
    login_email: String,
    login_password: String,
    auth_token: String,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            login_email: config.login_email.clone(),
            login_password: config.login_password.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    pub fn login(&self, req: LoginData) -> Result<String> {
        if req.email == self.login_email && req.password == self.login_password {
            info!(email = %req.email, "Login successful");
            Ok(self.auth_token.clone())
        } else {
            warn!(email = %req.email, "Rejected login attempt");
            Err(DomainError::InvalidCredentials.into())
        }
    }
}

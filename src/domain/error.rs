use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

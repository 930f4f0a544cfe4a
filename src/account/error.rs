use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AccountError {
    fn from(e: sqlx::Error) -> Self {
        match e.as_database_error() {
            Some(db) if db.is_unique_violation() => AccountError::EmailTaken,
            _ => AccountError::DatabaseError(e.to_string()),
        }
    }
}

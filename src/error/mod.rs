//! The unified error handling system for the application.

pub use types::BrokerError;

/// A unified `Result` type for the entire application.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, BrokerError>;

pub mod types;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            BrokerError::not_found("连接").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BrokerError::validation("provider 为空").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BrokerError::TokenExchange {
                status: 400,
                body: "invalid_grant".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(BrokerError::SessionExpired.status_code(), StatusCode::GONE);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(BrokerError::SessionExpired.error_code(), "SESSION_EXPIRED");
        assert_eq!(
            BrokerError::decryption("authentication tag mismatch").error_code(),
            "DECRYPTION_ERROR"
        );
        assert_eq!(
            BrokerError::provider_not_configured("github").error_code(),
            "PROVIDER_NOT_CONFIGURED"
        );
    }

    #[test]
    fn test_db_error_conversion() {
        let err: BrokerError = sea_orm::DbErr::Custom("connection lost".to_string()).into();
        assert!(matches!(err, BrokerError::Database { .. }));
    }
}

use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::ServiceError;

/// Standard error body returned by every endpoint.
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// HTTP status code
    pub status: u16,

    /// Status reason phrase
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Request path that produced the error
    pub path: String,
}

/// HTTP projection of `ServiceError`. The service layer never builds
/// these; endpoints convert at the boundary with `ApiError::from_service`.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorBody>),

    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    #[oai(status = 500)]
    InternalServerError(Json<ErrorBody>),
}

impl ApiError {
    fn body(status: u16, error: &str, message: String, path: &str) -> Json<ErrorBody> {
        Json(ErrorBody {
            status,
            error: error.to_string(),
            message,
            path: path.to_string(),
        })
    }

    pub fn bad_request(message: impl Into<String>, path: &str) -> Self {
        Self::BadRequest(Self::body(400, "Bad Request", message.into(), path))
    }

    pub fn unauthorized(message: impl Into<String>, path: &str) -> Self {
        Self::Unauthorized(Self::body(401, "Unauthorized", message.into(), path))
    }

    pub fn forbidden(path: &str) -> Self {
        Self::Forbidden(Self::body(403, "Forbidden", "Access Denied!".to_string(), path))
    }

    pub fn not_found(message: impl Into<String>, path: &str) -> Self {
        Self::NotFound(Self::body(404, "Not Found", message.into(), path))
    }

    pub fn internal(message: impl Into<String>, path: &str) -> Self {
        Self::InternalServerError(Self::body(
            500,
            "Internal Server Error",
            message.into(),
            path,
        ))
    }

    /// Maps an error kind (and its optional status override) to a
    /// transport status.
    pub fn from_service(err: ServiceError, path: &str) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::UserNotFound { .. } | ServiceError::RoleNotFound => {
                Self::not_found(message, path)
            }
            ServiceError::InvalidUserAction { not_found, .. } => {
                if not_found {
                    Self::not_found(message, path)
                } else {
                    Self::bad_request(message, path)
                }
            }
            ServiceError::UserExists
            | ServiceError::BreachedPassword
            | ServiceError::MatchingPassword
            | ServiceError::InvalidRole { .. }
            | ServiceError::InvalidPayment { .. }
            | ServiceError::PaymentDoesNotExist => Self::bad_request(message, path),
            ServiceError::LockedAccount | ServiceError::InvalidCredentials => {
                Self::unauthorized(message, path)
            }
            ServiceError::AccessDenied => Self::forbidden(path),
            ServiceError::Database { .. } | ServiceError::Hash { .. } => {
                tracing::error!("internal error on {}: {}", path, message);
                Self::internal("Internal server error", path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_violations_map_to_bad_request() {
        let err = ApiError::from_service(ServiceError::UserExists, "/api/auth/signup");
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn missing_user_maps_to_not_found() {
        let err = ApiError::from_service(ServiceError::user_not_found(), "/api/admin/user");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn invalid_action_honours_not_found_override() {
        let err = ApiError::from_service(
            ServiceError::invalid_user_action_not_found("User not found!"),
            "/api/admin/user/access",
        );
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = ApiError::from_service(
            ServiceError::invalid_user_action("Invalid user action!"),
            "/api/admin/user/access",
        );
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn access_denied_maps_to_forbidden() {
        let err = ApiError::from_service(ServiceError::AccessDenied, "/api/security/events/");
        match err {
            ApiError::Forbidden(body) => assert_eq!(body.0.message, "Access Denied!"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn locked_account_maps_to_unauthorized() {
        let err = ApiError::from_service(ServiceError::LockedAccount, "/api/empl/payment");
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ApiError::from_service(
            ServiceError::database("find_by_username", sea_orm::DbErr::Custom("boom".into())),
            "/api/admin/user",
        );
        match err {
            ApiError::InternalServerError(body) => {
                assert_eq!(body.0.message, "Internal server error");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Reason a catalog line was refused before any computation ran.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineRejection {
    #[error("Unit price must be non-negative, got: {0}")]
    NegativeUnitPrice(String),

    #[error("Quantity must be at least 1, got: {0}")]
    QuantityBelowOne(i32),

    #[error("Discount percent must be between 0 and 100, got: {0}")]
    DiscountOutOfRange(String),

    #[error("Unsupported GST rate: {0}% (supported: 0, 5, 12, 18, 28)")]
    UnsupportedTaxRate(String),

    #[error("Amount is too large to compute")]
    AmountOverflow,
}

impl LineRejection {
    /// Stable reason code returned to API callers
    pub fn code(&self) -> &'static str {
        match self {
            LineRejection::NegativeUnitPrice(_) => "NEGATIVE_UNIT_PRICE",
            LineRejection::QuantityBelowOne(_) => "QUANTITY_BELOW_ONE",
            LineRejection::DiscountOutOfRange(_) => "DISCOUNT_OUT_OF_RANGE",
            LineRejection::UnsupportedTaxRate(_) => "UNSUPPORTED_TAX_RATE",
            LineRejection::AmountOverflow => "AMOUNT_OVERFLOW",
        }
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed input outside of line computation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invoice line refused by the tax computation unit
    #[error("Invalid line: {0}")]
    LineRejected(#[from] LineRejection),

    /// Workflow rules (party selected, lines present, stock available, ...)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write refused because the stored state moved on
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        AppError::BusinessRule(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Machine-readable error code included in every error body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::LineRejected(rejection) => rejection.code(),
            AppError::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Migration(_) => "MIGRATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Json(_) => "INVALID_JSON",
            AppError::Csv(_) => "INVALID_CSV",
            AppError::Workbook(_) => "INVALID_WORKBOOK",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "status": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::LineRejected(_) => StatusCode::BAD_REQUEST,
            AppError::BusinessRule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) | AppError::Csv(_) | AppError::Workbook(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

//! Shared error type across tierpay crates.

use thiserror::Error;

use crate::protocol::{Address, ProjectId};

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Setup attempted on an instance that is already bound to a project.
    AlreadyInitialized,
    /// Operation requires a bound project.
    NotInitialized,
    /// Project id zero (or otherwise unusable) supplied at setup.
    InvalidProjectId,
    /// Payment notification failed the structural checks.
    InvalidPaymentEvent,
    /// Redemption notification failed the structural checks.
    InvalidRedemptionEvent,
    /// Payer is not on the allow-list.
    PayerNotAllowed,
    /// Redemption exceeds the safety bound.
    OverRedemption,
    /// Engine re-entered while an operation was in flight.
    Reentrant,
    /// Weight or amount arithmetic overflowed.
    ArithmeticOverflow,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AlreadyInitialized => "ALREADY_INITIALIZED",
            ClientCode::NotInitialized => "NOT_INITIALIZED",
            ClientCode::InvalidProjectId => "INVALID_PROJECT_ID",
            ClientCode::InvalidPaymentEvent => "INVALID_PAYMENT_EVENT",
            ClientCode::InvalidRedemptionEvent => "INVALID_REDEMPTION_EVENT",
            ClientCode::PayerNotAllowed => "PAYER_NOT_ALLOWED",
            ClientCode::OverRedemption => "OVER_REDEMPTION",
            ClientCode::Reentrant => "REENTRANT",
            ClientCode::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TierPayError>;

/// Unified error type used by core and engine.
///
/// Every variant aborts the requested operation; the engine never applies a
/// partial state change before returning one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierPayError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("policy already initialized for project {project_id}")]
    AlreadyInitialized { project_id: ProjectId },

    #[error("policy not initialized")]
    NotInitialized,

    #[error("invalid project id: {0}")]
    InvalidProjectId(ProjectId),

    #[error("invalid payment event: caller={caller} project={project_id} value={value}")]
    InvalidPaymentEvent {
        caller: Address,
        project_id: ProjectId,
        value: u128,
    },

    #[error("invalid redemption event: caller={caller} project={project_id} value={value}")]
    InvalidRedemptionEvent {
        caller: Address,
        project_id: ProjectId,
        value: u128,
    },

    #[error("payer not allowed: {payer}")]
    PayerNotAllowed { payer: Address },

    #[error(
        "redemption of {requested} needs issuance weight {required_weight}, only {recorded_weight} recorded"
    )]
    OverRedemption {
        required_weight: u128,
        recorded_weight: u128,
        requested: u128,
    },

    #[error("reentrant call rejected")]
    Reentrant,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("unsupported version")]
    UnsupportedVersion,

    #[error("internal: {0}")]
    Internal(String),
}

impl TierPayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TierPayError::BadRequest(_) => ClientCode::BadRequest,
            TierPayError::AlreadyInitialized { .. } => ClientCode::AlreadyInitialized,
            TierPayError::NotInitialized => ClientCode::NotInitialized,
            TierPayError::InvalidProjectId(_) => ClientCode::InvalidProjectId,
            TierPayError::InvalidPaymentEvent { .. } => ClientCode::InvalidPaymentEvent,
            TierPayError::InvalidRedemptionEvent { .. } => ClientCode::InvalidRedemptionEvent,
            TierPayError::PayerNotAllowed { .. } => ClientCode::PayerNotAllowed,
            TierPayError::OverRedemption { .. } => ClientCode::OverRedemption,
            TierPayError::Reentrant => ClientCode::Reentrant,
            TierPayError::ArithmeticOverflow => ClientCode::ArithmeticOverflow,
            TierPayError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TierPayError::Internal(_) => ClientCode::Internal,
        }
    }
}

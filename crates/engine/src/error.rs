use spinvault_core::error::ErrorClass;
use spinvault_core::guardrails::{ChargeWindow, SpinBlock};
use spinvault_core::selection::SelectionError;
use spinvault_core::types::{to_rfc3339, DbId, Timestamp};

/// PostgreSQL SQLSTATEs that mean "the same call may succeed if retried".
const LOCK_NOT_AVAILABLE: &str = "55P03";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Every failure the engine can report.
///
/// Variants map onto an [`ErrorClass`] via [`EngineError::class`] and carry a
/// stable machine-readable [`code`](EngineError::code).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),

    // -- Eligibility ---------------------------------------------------------
    #[error("Account is {status}")]
    AccountInactive { status: String },

    #[error("Self-excluded until {}", to_rfc3339(.0))]
    SelfExcluded(Timestamp),

    #[error("Cooldown active until {}", to_rfc3339(.0))]
    CooldownActive(Timestamp),

    #[error("{} charge limit exceeded", .0.label())]
    ChargeLimitExceeded(ChargeWindow),

    #[error("Machine is inactive")]
    MachineInactive,

    #[error("Machine has no published probability")]
    NoPublishedOdds,

    #[error("No ticket available")]
    NoTicketAvailable,

    #[error("Insufficient points: balance {balance}, cost {cost}")]
    InsufficientPoints { balance: i64, cost: i64 },

    #[error("Insufficient balance: balance {balance}, adjustment {delta}")]
    InsufficientBalance { balance: i64, delta: i64 },

    #[error("Reward {reward_id} is not owned")]
    NotOwned { reward_id: DbId },

    #[error("Reward {reward_id} cannot be equipped")]
    NotEquippable { reward_id: DbId },

    #[error("Reward belongs in slot {expected}")]
    SlotMismatch { expected: String },

    // -- Not found -----------------------------------------------------------
    #[error("Machine {0} not found")]
    MachineNotFound(DbId),

    #[error("Probability version {0} not found")]
    VersionNotFound(DbId),

    #[error("Payment {0} not found")]
    PaymentNotFound(String),

    #[error("Package {0} not found")]
    PackageNotFound(DbId),

    #[error("User {0} not found")]
    UserNotFound(DbId),

    #[error("Spin {0} not found")]
    SpinNotFound(DbId),

    // -- Integrity -----------------------------------------------------------
    #[error("Probability table {version_id} is not complete")]
    IncompleteProbabilityTable { version_id: DbId },

    #[error("Invalid probability weights")]
    InvalidWeights,

    #[error("Reward {reward_id} not found in catalog")]
    UnknownReward { reward_id: DbId },

    #[error("Reward {reward_id} has malformed metadata: {reason}")]
    CorruptRewardMetadata { reward_id: DbId, reason: String },

    // -- Infrastructure ------------------------------------------------------
    #[error("Temporarily unavailable, retry: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        use EngineError::*;
        match self {
            Validation(_) => ErrorClass::Validation,
            AccountInactive { .. }
            | SelfExcluded(_)
            | CooldownActive(_)
            | ChargeLimitExceeded(_)
            | MachineInactive
            | NoPublishedOdds
            | NoTicketAvailable
            | InsufficientPoints { .. }
            | InsufficientBalance { .. }
            | NotOwned { .. }
            | NotEquippable { .. }
            | SlotMismatch { .. } => ErrorClass::Eligibility,
            MachineNotFound(_)
            | VersionNotFound(_)
            | PaymentNotFound(_)
            | PackageNotFound(_)
            | UserNotFound(_)
            | SpinNotFound(_) => ErrorClass::NotFound,
            IncompleteProbabilityTable { .. }
            | InvalidWeights
            | UnknownReward { .. }
            | CorruptRewardMetadata { .. } => ErrorClass::Integrity,
            Transient(_) => ErrorClass::Transient,
            Database(_) => ErrorClass::Internal,
        }
    }

    /// Stable code for clients.
    pub fn code(&self) -> &'static str {
        use EngineError::*;
        match self {
            Validation(_) => "VALIDATION_ERROR",
            AccountInactive { .. } => "ACCOUNT_INACTIVE",
            SelfExcluded(_) => "SELF_EXCLUDED",
            CooldownActive(_) => "COOLDOWN_ACTIVE",
            ChargeLimitExceeded(ChargeWindow::Daily) => "DAILY_LIMIT_EXCEEDED",
            ChargeLimitExceeded(ChargeWindow::Weekly) => "WEEKLY_LIMIT_EXCEEDED",
            ChargeLimitExceeded(ChargeWindow::Monthly) => "MONTHLY_LIMIT_EXCEEDED",
            MachineInactive => "MACHINE_INACTIVE",
            NoPublishedOdds => "NO_PUBLISHED_ODDS",
            NoTicketAvailable => "NO_TICKET_AVAILABLE",
            InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            NotOwned { .. } => "NOT_OWNED",
            NotEquippable { .. } => "NOT_EQUIPPABLE",
            SlotMismatch { .. } => "SLOT_MISMATCH",
            MachineNotFound(_) => "MACHINE_NOT_FOUND",
            VersionNotFound(_) => "VERSION_NOT_FOUND",
            PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            PackageNotFound(_) => "PACKAGE_NOT_FOUND",
            UserNotFound(_) => "USER_NOT_FOUND",
            SpinNotFound(_) => "SPIN_NOT_FOUND",
            IncompleteProbabilityTable { .. } => "INCOMPLETE_PROBABILITY_TABLE",
            InvalidWeights => "INVALID_WEIGHTS",
            UnknownReward { .. } => "UNKNOWN_REWARD",
            CorruptRewardMetadata { .. } => "CORRUPT_REWARD_METADATA",
            Transient(_) => "TRANSIENT",
            Database(_) => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(LOCK_NOT_AVAILABLE) => Self::Transient("lock wait timed out".into()),
                Some(SERIALIZATION_FAILURE) => Self::Transient("serialization failure".into()),
                Some(DEADLOCK_DETECTED) => Self::Transient("deadlock detected".into()),
                _ => Self::Database(err),
            },
            sqlx::Error::PoolTimedOut => Self::Transient("connection pool exhausted".into()),
            _ => Self::Database(err),
        }
    }
}

impl From<SelectionError> for EngineError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::InvalidWeights => Self::InvalidWeights,
        }
    }
}

impl From<SpinBlock> for EngineError {
    fn from(block: SpinBlock) -> Self {
        match block {
            SpinBlock::SelfExcluded { until } => Self::SelfExcluded(until),
            SpinBlock::CooldownActive { until } => Self::CooldownActive(until),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn guardrail_errors_are_eligibility() {
        let until = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let err = EngineError::from(SpinBlock::SelfExcluded { until });
        assert_eq!(err.class(), ErrorClass::Eligibility);
        assert_eq!(err.code(), "SELF_EXCLUDED");
        assert_eq!(err.to_string(), "Self-excluded until 2026-06-01T00:00:00.000000Z");
    }

    #[test]
    fn charge_windows_have_distinct_codes() {
        let codes: Vec<_> = ChargeWindow::ALL
            .iter()
            .map(|w| EngineError::ChargeLimitExceeded(*w).code())
            .collect();
        assert_eq!(
            codes,
            ["DAILY_LIMIT_EXCEEDED", "WEEKLY_LIMIT_EXCEEDED", "MONTHLY_LIMIT_EXCEEDED"]
        );
        assert_eq!(
            EngineError::ChargeLimitExceeded(ChargeWindow::Weekly).to_string(),
            "Weekly charge limit exceeded"
        );
    }

    #[test]
    fn integrity_failures_are_not_user_errors() {
        assert_eq!(
            EngineError::IncompleteProbabilityTable { version_id: 1 }.class(),
            ErrorClass::Integrity
        );
        assert_eq!(EngineError::from(SelectionError::InvalidWeights).class(), ErrorClass::Integrity);
    }

    #[test]
    fn pool_timeout_is_transient() {
        let err = EngineError::from(sqlx::Error::PoolTimedOut);
        assert!(err.class().is_retryable());
    }

    #[test]
    fn row_not_found_is_internal() {
        let err = EngineError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.class(), ErrorClass::Internal);
    }
}

//! Status enums mapping to `TEXT` columns guarded by `CHECK` constraints.
//!
//! Each variant's string matches the literal stored in the database. Rows are
//! read as `String` and converted with [`parse`](UserStatus::parse) at the
//! boundary where the status drives behaviour.

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database literal.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse a database literal. Case-sensitive.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_enum! {
    /// Account standing. Only `Active` accounts may transact.
    UserStatus {
        Active = "active",
        Suspended = "suspended",
        Banned = "banned",
    }
}

define_text_enum! {
    /// Probability version lifecycle.
    VersionStatus {
        Draft = "DRAFT",
        Published = "PUBLISHED",
        Archived = "ARCHIVED",
    }
}

define_text_enum! {
    /// Payment lifecycle. `Created` is the only non-terminal state.
    PaymentStatus {
        Created = "CREATED",
        Paid = "PAID",
        Failed = "FAILED",
        Canceled = "CANCELED",
    }
}

define_text_enum! {
    /// Wallet ledger entry kind.
    TransactionType {
        Charge = "CHARGE",
        Spend = "SPEND",
        Adjust = "ADJUST",
    }
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Created)
    }

    /// Statuses a payment webhook may report.
    pub fn parse_webhook(value: &str) -> Option<Self> {
        Self::parse(&value.trim().to_ascii_uppercase()).filter(|s| s.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_literal() {
        for s in UserStatus::ALL {
            assert_eq!(UserStatus::parse(s.as_str()), Some(*s));
        }
        for s in VersionStatus::ALL {
            assert_eq!(VersionStatus::parse(s.as_str()), Some(*s));
        }
        for s in TransactionType::ALL {
            assert_eq!(TransactionType::parse(s.as_str()), Some(*s));
        }
    }

    #[test]
    fn unknown_literal_is_none() {
        assert_eq!(UserStatus::parse("Active"), None);
        assert_eq!(VersionStatus::parse("LIVE"), None);
    }

    #[test]
    fn only_created_is_non_terminal() {
        assert!(!PaymentStatus::Created.is_terminal());
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Canceled.is_terminal());
    }

    #[test]
    fn webhook_status_normalizes_case_and_rejects_created() {
        assert_eq!(PaymentStatus::parse_webhook(" paid "), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse_webhook("canceled"), Some(PaymentStatus::Canceled));
        assert_eq!(PaymentStatus::parse_webhook("CREATED"), None);
        assert_eq!(PaymentStatus::parse_webhook("refunded"), None);
    }

    #[test]
    fn serde_uses_database_literals() {
        let json = serde_json::to_string(&VersionStatus::Published).unwrap();
        assert_eq!(json, "\"PUBLISHED\"");
    }
}

//! Typed reward metadata.
//!
//! The catalog stores a `reward_type` column next to a JSON metadata blob.
//! [`RewardMetadata::parse`] turns the pair into a tagged union so code that
//! depends on a field (equip slot matching, ticket detection) works against
//! a checked shape. Fields outside the known shape are kept verbatim in
//! `extra` and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TYPE_CURRENCY: &str = "currency";
pub const TYPE_COSMETIC: &str = "cosmetic";
pub const TYPE_ACCESS: &str = "access";

/// Currency name of the stackable reward consumed by ticket spins.
pub const TICKET_CURRENCY: &str = "ticket";

/// Maximum length of a reward type or slot name.
const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum RewardKind {
    Currency { currency: String, value: i64 },
    Cosmetic { slot: String },
    Access { exp: i64 },
    /// A reward type this build has no shape for.
    Other { reward_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardMetadata {
    pub kind: RewardKind,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata must be a JSON object")]
    NotAnObject,
    #[error("reward type must be 1..=64 characters")]
    InvalidType,
    #[error("{reward_type} metadata is malformed: {reason}")]
    Malformed {
        reward_type: String,
        reason: String,
    },
}

#[derive(Deserialize)]
struct CurrencyFields {
    currency: String,
    value: i64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct CosmeticFields {
    slot: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct AccessFields {
    exp: i64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn malformed(reward_type: &str, err: impl std::fmt::Display) -> MetadataError {
    MetadataError::Malformed {
        reward_type: reward_type.to_string(),
        reason: err.to_string(),
    }
}

impl RewardMetadata {
    /// Interpret a catalog row's `(reward_type, metadata)` pair.
    pub fn parse(reward_type: &str, metadata: &Value) -> Result<Self, MetadataError> {
        if reward_type.is_empty() || reward_type.len() > MAX_NAME_LEN {
            return Err(MetadataError::InvalidType);
        }
        let object = metadata.as_object().ok_or(MetadataError::NotAnObject)?;
        let value = Value::Object(object.clone());

        let parsed = match reward_type {
            TYPE_CURRENCY => {
                let f: CurrencyFields =
                    serde_json::from_value(value).map_err(|e| malformed(reward_type, e))?;
                if f.currency.trim().is_empty() {
                    return Err(malformed(reward_type, "currency must not be empty"));
                }
                Self {
                    kind: RewardKind::Currency {
                        currency: f.currency,
                        value: f.value,
                    },
                    extra: f.extra,
                }
            }
            TYPE_COSMETIC => {
                let f: CosmeticFields =
                    serde_json::from_value(value).map_err(|e| malformed(reward_type, e))?;
                let slot = normalize_slot(&f.slot);
                if slot.is_empty() || slot.len() > MAX_NAME_LEN {
                    return Err(malformed(reward_type, "slot must be 1..=64 characters"));
                }
                Self {
                    kind: RewardKind::Cosmetic { slot },
                    extra: f.extra,
                }
            }
            TYPE_ACCESS => {
                let f: AccessFields =
                    serde_json::from_value(value).map_err(|e| malformed(reward_type, e))?;
                Self {
                    kind: RewardKind::Access { exp: f.exp },
                    extra: f.extra,
                }
            }
            other => Self {
                kind: RewardKind::Other {
                    reward_type: other.to_string(),
                },
                extra: object.clone(),
            },
        };
        Ok(parsed)
    }

    /// The `reward_type` column value for this metadata.
    pub fn reward_type(&self) -> &str {
        match &self.kind {
            RewardKind::Currency { .. } => TYPE_CURRENCY,
            RewardKind::Cosmetic { .. } => TYPE_COSMETIC,
            RewardKind::Access { .. } => TYPE_ACCESS,
            RewardKind::Other { reward_type } => reward_type,
        }
    }

    /// Render back to the JSON object stored in the catalog.
    pub fn to_json(&self) -> Value {
        let mut object = self.extra.clone();
        match &self.kind {
            RewardKind::Currency { currency, value } => {
                object.insert("currency".into(), Value::from(currency.clone()));
                object.insert("value".into(), Value::from(*value));
            }
            RewardKind::Cosmetic { slot } => {
                object.insert("slot".into(), Value::from(slot.clone()));
            }
            RewardKind::Access { exp } => {
                object.insert("exp".into(), Value::from(*exp));
            }
            RewardKind::Other { .. } => {}
        }
        Value::Object(object)
    }

    /// Equip slot, for cosmetics only.
    pub fn slot(&self) -> Option<&str> {
        match &self.kind {
            RewardKind::Cosmetic { slot } => Some(slot),
            _ => None,
        }
    }

    pub fn is_ticket(&self) -> bool {
        matches!(&self.kind, RewardKind::Currency { currency, .. } if currency == TICKET_CURRENCY)
    }
}

impl Serialize for RewardMetadata {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Slots compare case-insensitively and ignore surrounding whitespace.
pub fn normalize_slot(slot: &str) -> String {
    slot.trim().to_ascii_lowercase()
}

/// Why a reward cannot go into a requested slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipRejection {
    NotEquippable,
    SlotMismatch { expected: String },
}

/// Check that `metadata` may be equipped into `slot`.
pub fn check_equip(metadata: &RewardMetadata, slot: &str) -> Result<(), EquipRejection> {
    match metadata.slot() {
        None => Err(EquipRejection::NotEquippable),
        Some(expected) if expected != normalize_slot(slot) => Err(EquipRejection::SlotMismatch {
            expected: expected.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_currency_and_keeps_extra_fields() {
        let meta = RewardMetadata::parse(
            "currency",
            &json!({"currency": "dust", "value": 25, "icon": "dust.png"}),
        )
        .unwrap();
        assert_eq!(
            meta.kind,
            RewardKind::Currency {
                currency: "dust".into(),
                value: 25
            }
        );
        assert_eq!(meta.extra.get("icon"), Some(&json!("dust.png")));
        assert_eq!(meta.to_json()["icon"], "dust.png");
        assert_eq!(meta.to_json()["value"], 25);
    }

    #[test]
    fn cosmetic_slot_is_normalized() {
        let meta = RewardMetadata::parse("cosmetic", &json!({"slot": " Frame "})).unwrap();
        assert_eq!(meta.slot(), Some("frame"));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = RewardMetadata::parse("cosmetic", &json!({"value": 3})).unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { .. }));

        let err = RewardMetadata::parse("access", &json!({"exp": "lots"})).unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { .. }));
    }

    #[test]
    fn non_object_metadata_is_rejected() {
        assert_eq!(
            RewardMetadata::parse("currency", &json!([1, 2])),
            Err(MetadataError::NotAnObject)
        );
    }

    #[test]
    fn unknown_type_passes_through() {
        let meta = RewardMetadata::parse("badge", &json!({"tier": 2})).unwrap();
        assert_eq!(meta.reward_type(), "badge");
        assert_eq!(meta.to_json(), json!({"tier": 2}));
        assert_eq!(meta.slot(), None);
    }

    #[test]
    fn ticket_detection() {
        let ticket =
            RewardMetadata::parse("currency", &json!({"currency": "ticket", "value": 1})).unwrap();
        let dust =
            RewardMetadata::parse("currency", &json!({"currency": "dust", "value": 1})).unwrap();
        assert!(ticket.is_ticket());
        assert!(!dust.is_ticket());
    }

    #[test]
    fn equip_requires_cosmetic_with_matching_slot() {
        let frame = RewardMetadata::parse("cosmetic", &json!({"slot": "frame"})).unwrap();
        assert_eq!(check_equip(&frame, "FRAME"), Ok(()));
        assert_eq!(
            check_equip(&frame, "effect"),
            Err(EquipRejection::SlotMismatch {
                expected: "frame".into()
            })
        );

        let exp = RewardMetadata::parse("access", &json!({"exp": 100})).unwrap();
        assert_eq!(check_equip(&exp, "frame"), Err(EquipRejection::NotEquippable));
    }
}

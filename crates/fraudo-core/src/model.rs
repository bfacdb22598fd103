//! Transaction models
//!
//! Models are immutable snapshots built once per incoming event. Optional
//! attributes the caller did not supply are `None` and resolve to an empty
//! [`FieldModel`] value.

use serde::{Deserialize, Serialize};

/// Snapshot of a card payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentModel {
    pub party_id: String,
    pub shop_id: String,

    /// Amount in minor units
    pub amount: i64,
    pub currency: String,

    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,

    /// Masked card number
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub card_token: Option<String>,

    /// ISO country code of the issuing bank
    #[serde(default)]
    pub bin_country_code: Option<String>,

    #[serde(default)]
    pub mobile: bool,
    #[serde(default)]
    pub recurrent: bool,
}

/// Snapshot of a P2P transfer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct P2PModel {
    pub identity_id: String,

    /// Amount in minor units
    pub amount: i64,
    pub currency: String,

    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub card_token_from: Option<String>,
    #[serde(default)]
    pub card_token_to: Option<String>,
    #[serde(default)]
    pub bin_country_code: Option<String>,
}

/// A resolved `(storage name, value)` pair
///
/// Used both as the primary filter of an aggregate query and as an extra
/// equality constraint (group-by dimension).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldModel {
    pub name: String,
    pub value: String,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// True when the source attribute was absent on the model
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

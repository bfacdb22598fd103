//! Checked fields
//!
//! A checked field is a semantic transaction attribute a rule can reference
//! by name (`"email"`, `"card_token"`, ...). Each domain has its own enum;
//! both implement [`CheckedField`] so the compiler and runtime never need to
//! know which one they are working with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Logical geo dimension a field can stand for in `countryBy(...)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoDimension {
    /// Country derived from the transaction IP through the geo-IP service
    Ip,
    /// Country of the issuing bank, carried on the model
    Bank,
}

/// Common contract of the per-domain checked field enums
pub trait CheckedField:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Every field of the domain, in declaration order
    fn all() -> &'static [Self];

    /// Name used in rule text and as the serde representation
    fn name(&self) -> &'static str;

    /// Geo dimension this field denotes, if any
    fn geo_dimension(&self) -> Option<GeoDimension>;

    /// The field holding the transaction IP
    fn ip() -> Self;

    /// Look a field up by its rule-text name
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }
}

/// Checked fields of the payment domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCheckedField {
    Email,
    Ip,
    Fingerprint,
    CountryBank,
    CountryIp,
    Bin,
    Pan,
    Currency,
    ShopId,
    PartyId,
    CardToken,
    Mobile,
    Recurrent,
}

impl CheckedField for PaymentCheckedField {
    fn all() -> &'static [Self] {
        use PaymentCheckedField::*;
        &[
            Email,
            Ip,
            Fingerprint,
            CountryBank,
            CountryIp,
            Bin,
            Pan,
            Currency,
            ShopId,
            PartyId,
            CardToken,
            Mobile,
            Recurrent,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            PaymentCheckedField::Email => "email",
            PaymentCheckedField::Ip => "ip",
            PaymentCheckedField::Fingerprint => "fingerprint",
            PaymentCheckedField::CountryBank => "country_bank",
            PaymentCheckedField::CountryIp => "country_ip",
            PaymentCheckedField::Bin => "bin",
            PaymentCheckedField::Pan => "pan",
            PaymentCheckedField::Currency => "currency",
            PaymentCheckedField::ShopId => "shop_id",
            PaymentCheckedField::PartyId => "party_id",
            PaymentCheckedField::CardToken => "card_token",
            PaymentCheckedField::Mobile => "mobile",
            PaymentCheckedField::Recurrent => "recurrent",
        }
    }

    fn geo_dimension(&self) -> Option<GeoDimension> {
        match self {
            PaymentCheckedField::CountryIp => Some(GeoDimension::Ip),
            PaymentCheckedField::CountryBank => Some(GeoDimension::Bank),
            _ => None,
        }
    }

    fn ip() -> Self {
        PaymentCheckedField::Ip
    }
}

impl fmt::Display for PaymentCheckedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checked fields of the P2P transfer domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum P2PCheckedField {
    Email,
    Ip,
    Fingerprint,
    CountryBank,
    CountryIp,
    Bin,
    Pan,
    Currency,
    IdentityId,
    CardTokenFrom,
    CardTokenTo,
}

impl CheckedField for P2PCheckedField {
    fn all() -> &'static [Self] {
        use P2PCheckedField::*;
        &[
            Email,
            Ip,
            Fingerprint,
            CountryBank,
            CountryIp,
            Bin,
            Pan,
            Currency,
            IdentityId,
            CardTokenFrom,
            CardTokenTo,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            P2PCheckedField::Email => "email",
            P2PCheckedField::Ip => "ip",
            P2PCheckedField::Fingerprint => "fingerprint",
            P2PCheckedField::CountryBank => "country_bank",
            P2PCheckedField::CountryIp => "country_ip",
            P2PCheckedField::Bin => "bin",
            P2PCheckedField::Pan => "pan",
            P2PCheckedField::Currency => "currency",
            P2PCheckedField::IdentityId => "identity_id",
            P2PCheckedField::CardTokenFrom => "card_token_from",
            P2PCheckedField::CardTokenTo => "card_token_to",
        }
    }

    fn geo_dimension(&self) -> Option<GeoDimension> {
        match self {
            P2PCheckedField::CountryIp => Some(GeoDimension::Ip),
            P2PCheckedField::CountryBank => Some(GeoDimension::Bank),
            _ => None,
        }
    }

    fn ip() -> Self {
        P2PCheckedField::Ip
    }
}

impl fmt::Display for P2PCheckedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

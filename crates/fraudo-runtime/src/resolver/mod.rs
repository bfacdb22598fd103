//! Field resolvers for the built-in domains
//!
//! Each resolver reads checked fields off its model and names the storage
//! attribute the historical store keeps them under. `country_ip` is derived
//! through geo-IP at evaluation time, so neither resolver maps it.

mod p2p;
mod payment;

pub use p2p::P2PFieldResolver;
pub use payment::PaymentFieldResolver;

use fraudo_core::FieldModel;

fn optional(name: &'static str, value: &Option<String>) -> FieldModel {
    FieldModel::new(name, value.as_deref().unwrap_or_default())
}

//! Transaction domains
//!
//! A [`Domain`] ties a transaction model to its checked field enum. Every
//! component of the engine is generic over it, so payment and P2P scoring
//! share one implementation and are selected when the engine is built.

use crate::field::{CheckedField, P2PCheckedField, PaymentCheckedField};
use crate::model::{P2PModel, PaymentModel};
use std::fmt::Debug;

/// A transaction domain
pub trait Domain: Send + Sync + 'static {
    /// Snapshot of one transaction
    type Model: Clone + Debug + Send + Sync + 'static;

    /// Checked fields rules may reference
    type Field: CheckedField;

    /// Domain name used in logs and errors
    const NAME: &'static str;

    /// Whether outcome-filtered aggregates (`countSuccess`, `countError`,
    /// `sumSuccess`, `sumError`) exist in this domain's rule language
    const OUTCOME_AGGREGATES: bool;

    /// Whether refund and chargeback history (`countRefund`, `sumChargeback`
    /// and friends) is kept for this domain
    const REFUND_AGGREGATES: bool;

    /// Transaction amount in minor units
    fn amount(model: &Self::Model) -> i64;
}

/// Card payments
#[derive(Debug, Clone, Copy, Default)]
pub struct Payment;

impl Domain for Payment {
    type Model = PaymentModel;
    type Field = PaymentCheckedField;

    const NAME: &'static str = "payment";
    const OUTCOME_AGGREGATES: bool = true;
    const REFUND_AGGREGATES: bool = true;

    fn amount(model: &PaymentModel) -> i64 {
        model.amount
    }
}

/// Peer-to-peer transfers
#[derive(Debug, Clone, Copy, Default)]
pub struct P2P;

impl Domain for P2P {
    type Model = P2PModel;
    type Field = P2PCheckedField;

    const NAME: &'static str = "p2p";
    const OUTCOME_AGGREGATES: bool = false;
    const REFUND_AGGREGATES: bool = false;

    fn amount(model: &P2PModel) -> i64 {
        model.amount
    }
}

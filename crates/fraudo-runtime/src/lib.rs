//! Fraudo Runtime - evaluates compiled rule templates
//!
//! This crate provides everything a compiled template needs at evaluation
//! time: field resolvers for the built-in domains, windowed aggregators over
//! the historical event store, list and geo-IP enrichment, and the
//! first-match [`RuleEvaluator`].

pub mod aggregator;
pub mod error;
pub mod evaluator;
pub mod geo;
pub mod limiter;
pub mod lists;
pub mod resolver;
pub mod result;
pub mod storage;

// Re-export main types
pub use aggregator::{CountAggregator, SumAggregator, TimeWindow, UniqueValueAggregator};
pub use error::{ErrorKind, Result, RuntimeError};
pub use evaluator::RuleEvaluator;
pub use geo::{
    CountryResolver, GeoFailurePolicy, GeoIpService, HttpGeoIpService, StaticGeoIpService,
    UNKNOWN_COUNTRY,
};
pub use limiter::IoLimiter;
pub use lists::{composite_key, HttpListService, InListFinder, ListService, MemoryListService};
pub use resolver::{P2PFieldResolver, PaymentFieldResolver};
pub use result::{EvaluationResult, Outcome, RuleTrace};
#[cfg(feature = "sqlx")]
pub use storage::PostgresEventRepository;
pub use storage::{
    AggregateKind, AggregateQuery, EventKind, EventRepository, EventStatus, HistoricalEvent,
    InMemoryEventRepository,
};

//! List membership
//!
//! [`ListService`] is the external list store; [`InListFinder`] resolves
//! model fields and checks them against it.

mod finder;
mod service;

pub use finder::{composite_key, InListFinder};
pub use service::{HttpListService, ListService, MemoryListService};

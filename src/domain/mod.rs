//! Domain records for the Bima insurance protocol.
//!
//! Read-only projections of contract state plus the derived analytics
//! aggregate. Nothing here talks to the chain.

mod analytics;
mod claim;
mod policy;
mod types;

pub use analytics::*;
pub use claim::*;
pub use policy::*;
pub use types::*;

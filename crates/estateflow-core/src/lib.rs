//! EstateFlow Core — domain models, repository contracts, and the pure
//! logic of the lead lifecycle: recurrence arithmetic, due-date
//! classification, and the FREE/PRO admission policy.

pub mod error;
pub mod format;
pub mod links;
pub mod models;
pub mod plan;
pub mod repository;
pub mod schedule;

pub use error::{CrmError, CrmResult};

//! EstateFlow Leads — the lead-store service: quota-enforced creation,
//! status transitions with the closed-deal invariant, and follow-up
//! completion through the recurrence calculator.

pub mod service;

pub use service::{CompleteOutcome, FollowUpQueue, LeadService, PipelineStats};

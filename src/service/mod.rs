//! Async service runtime: the scheduler and the report pipeline it drives.

pub mod pipeline;
pub mod scheduler;

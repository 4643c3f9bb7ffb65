pub mod classify;
pub mod composite;
pub mod feedback;
pub mod metrics;
pub mod report;
pub mod timing;

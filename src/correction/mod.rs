pub mod highlight;
pub mod report;
pub mod rules;
pub mod service;
pub mod spans;

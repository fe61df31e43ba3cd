pub mod analytics;
pub mod budget;
pub mod insights;

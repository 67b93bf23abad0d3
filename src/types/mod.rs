pub mod config;
pub mod extraction;
pub mod grade;
pub mod record;

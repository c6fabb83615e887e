//! Behavioural core of a transaction fraud-check form: form sessions, a mock scoring
//! policy and a batch engine that drives one session per CSV row.

pub mod actors;
pub mod engine;
pub mod models;
pub mod policy;
pub mod storage;
pub mod types;

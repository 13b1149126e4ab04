//! House price exploration: dataset retrieval and preparation, a seeded
//! Bernoulli train/test split, decision-forest training through external
//! libraries, and figure data for the dashboard.

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod viz;

pub use error::{Error, Result};

//! Presentation artifacts. Builders are pure and return serializable
//! figures; writing them out is a separate step in [`export`].

pub mod export;
pub mod figure;

pub use figure::{error_curve, histogram, importance_chart, Figure};

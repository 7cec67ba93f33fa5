//! Report generators.

mod text;

pub use text::{dollars, signed_dollars, thousands, TextReportGenerator};

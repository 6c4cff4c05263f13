//! GST computation: rates, per-amount arithmetic, invoice lines and totals

pub mod calculator;
pub mod invoice;
pub mod line_item;
pub mod rates;
pub mod state;

pub use calculator::*;
pub use rates::*;
pub use state::*;

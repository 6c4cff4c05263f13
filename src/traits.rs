//! Traits for plugging rate sources into the engine

use bigdecimal::BigDecimal;

use crate::tax::rates::RateManager;

/// Source of GST rates for HSN/SAC classification codes
///
/// [`RateManager`] is the built-in implementation. Hosts with their own
/// rate catalogue (a tenant database, a cached master list) can implement
/// this directly.
pub trait RateProvider: Send + Sync {
    /// GST rate in percent for a classification code
    fn gst_rate_for(&self, code: &str) -> BigDecimal;
}

impl RateProvider for RateManager {
    fn gst_rate_for(&self, code: &str) -> BigDecimal {
        self.get_rate(code)
    }
}

//! Statutory constants and engine configuration
//!
//! The constants describe the rate schedule in force. Hosts that need to
//! follow an amendment before a release override them through [`TaxConfig`]
//! (and [`crate::tax::rates::RateSchedule`] for classification rates)
//! instead of patching the engine.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::GstResult;
use crate::utils::validation::{validate_rate, validate_tds_rate};

/// Statutory GST slabs, in percent
pub const GST_RATE_SLABS: [u32; 5] = [0, 5, 12, 18, 28];

/// Withholding on GST for notified deductors, in percent
pub const DEFAULT_TDS_RATE_PERCENT: u32 = 2;

/// Highest GST rate accepted as input, in percent
pub const MAX_GST_RATE_PERCENT: u32 = 50;

pub const MAX_TDS_RATE_PERCENT: u32 = 100;

/// Decimal places for printed rupee amounts (paise)
pub const MONEY_SCALE: u32 = 2;

/// Decimal places for printed derived rates
pub const RATE_SCALE: u32 = 4;

/// Tunables for [`crate::TaxCalculator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxConfig {
    /// Upper bound for GST rates, in percent
    pub max_gst_rate: BigDecimal,
    /// TDS rate applied when a call does not name one
    pub default_tds_rate: BigDecimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            max_gst_rate: BigDecimal::from(MAX_GST_RATE_PERCENT),
            default_tds_rate: BigDecimal::from(DEFAULT_TDS_RATE_PERCENT),
        }
    }
}

impl TaxConfig {
    /// Check that the configured bounds are themselves sane
    pub fn validate(&self) -> GstResult<()> {
        validate_rate(&self.max_gst_rate, &BigDecimal::from(100))?;
        validate_tds_rate(&self.default_tds_rate)
    }
}

//! # GST Engine
//!
//! Deterministic Indian Goods & Services Tax arithmetic for invoicing
//! services.
//!
//! ## Features
//!
//! - **Tax splits**: CGST + SGST for intra-state supplies, IGST for
//!   inter-state supplies, plus compensation cess
//! - **Inclusive pricing**: reduce a tax-inclusive amount to its taxable value
//! - **Reverse GST**: extract base and tax from a gross figure
//! - **Composite rates**: volume-weighted rate across mixed-rate supplies
//! - **TDS on GST**: withholding with an overridable statutory default
//! - **Invoices**: per-line taxable value with discounts, summed into totals
//! - **Rate resolution**: HSN/SAC prefix schedule with tenant overrides
//! - **Validation**: state codes, GSTIN check digits, invoice schema checks
//!
//! All money is [`bigdecimal::BigDecimal`] and nothing is rounded during
//! computation. Divisions that terminate are exact; the rest are carried at
//! the decimal precision limit. Round for printing with the `rounded`
//! methods. Nothing here performs I/O.
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_engine::{TaxCalculationInput, TaxCalculator};
//! use bigdecimal::BigDecimal;
//!
//! let calculator = TaxCalculator::new();
//! let input = TaxCalculationInput::new(BigDecimal::from(1000), BigDecimal::from(18));
//! let breakdown = calculator.calculate_tax(&input).unwrap();
//!
//! assert_eq!(breakdown.cgst, BigDecimal::from(90));
//! assert_eq!(breakdown.sgst, BigDecimal::from(90));
//! assert_eq!(breakdown.total_amount, BigDecimal::from(1180));
//! ```

pub mod config;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use tax::*;
pub use traits::*;
pub use types::*;

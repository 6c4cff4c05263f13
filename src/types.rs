//! Core types and data structures for the GST engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::money::round_half_up;

/// Input for a single-amount GST computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationInput {
    /// Amount to tax; must be positive
    pub amount: BigDecimal,
    /// GST rate percentage (e.g. 18 for 18%)
    pub gst_rate: BigDecimal,
    /// Whether `amount` already includes GST and cess
    pub is_inclusive: bool,
    /// Inter-state supplies attract IGST instead of CGST + SGST
    pub is_inter_state: bool,
    /// Compensation cess rate percentage
    pub cess_rate: BigDecimal,
}

impl TaxCalculationInput {
    /// Tax-exclusive, intra-state input without cess
    pub fn new(amount: BigDecimal, gst_rate: BigDecimal) -> Self {
        Self {
            amount,
            gst_rate,
            is_inclusive: false,
            is_inter_state: false,
            cess_rate: BigDecimal::from(0),
        }
    }

    pub fn inclusive(mut self, is_inclusive: bool) -> Self {
        self.is_inclusive = is_inclusive;
        self
    }

    pub fn inter_state(mut self, is_inter_state: bool) -> Self {
        self.is_inter_state = is_inter_state;
        self
    }

    pub fn with_cess(mut self, cess_rate: BigDecimal) -> Self {
        self.cess_rate = cess_rate;
        self
    }
}

/// Detailed GST breakdown for one amount
///
/// Components are kept exact: `cgst`, `sgst` and `igst` are precisely
/// `taxable_amount × gst_rate / 200` (or `/ 100` for IGST). Use
/// [`TaxBreakdown::rounded`] for figures meant to be printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    /// Value on which tax is levied
    pub taxable_amount: BigDecimal,
    /// Central GST
    pub cgst: BigDecimal,
    /// State/UT GST
    pub sgst: BigDecimal,
    /// Integrated GST
    pub igst: BigDecimal,
    /// Compensation cess
    pub cess: BigDecimal,
    /// `cgst + sgst + igst + cess`
    pub total_tax: BigDecimal,
    /// `taxable_amount + total_tax`
    pub total_amount: BigDecimal,
    pub gst_rate: BigDecimal,
    pub cess_rate: BigDecimal,
    pub is_inter_state: bool,
    pub is_inclusive: bool,
}

impl TaxBreakdown {
    /// Round every component half-up to `scale` places and re-add the
    /// totals from the rounded parts, so the printed figures still sum.
    pub fn rounded(&self, scale: u32) -> Self {
        let scale = i64::from(scale);
        let taxable_amount = round_half_up(&self.taxable_amount, scale);
        let cgst = round_half_up(&self.cgst, scale);
        let sgst = round_half_up(&self.sgst, scale);
        let igst = round_half_up(&self.igst, scale);
        let cess = round_half_up(&self.cess, scale);
        let total_tax = &cgst + &sgst + &igst + &cess;
        let total_amount = &taxable_amount + &total_tax;

        Self {
            taxable_amount,
            cgst,
            sgst,
            igst,
            cess,
            total_tax,
            total_amount,
            gst_rate: self.gst_rate.clone(),
            cess_rate: self.cess_rate.clone(),
            is_inter_state: self.is_inter_state,
            is_inclusive: self.is_inclusive,
        }
    }

    /// GST alone, excluding cess
    pub fn gst_amount(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }
}

/// Base and tax extracted from a GST-inclusive figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGstResult {
    pub taxable_amount: BigDecimal,
    pub gst_amount: BigDecimal,
}

impl ReverseGstResult {
    /// Round the base half-up and take the GST as what is left of the
    /// rounded gross
    pub fn rounded(&self, scale: u32) -> Self {
        let scale = i64::from(scale);
        let gross = &self.taxable_amount + &self.gst_amount;
        let taxable_amount = round_half_up(&self.taxable_amount, scale);
        let gst_amount = round_half_up(&gross, scale) - &taxable_amount;

        Self {
            taxable_amount,
            gst_amount,
        }
    }
}

/// One supply in a mixed-rate composite calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub amount: BigDecimal,
    pub gst_rate: BigDecimal,
}

impl Supply {
    pub fn new(amount: BigDecimal, gst_rate: BigDecimal) -> Self {
        Self { amount, gst_rate }
    }
}

/// Result of TDS withholding on a GST supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TdsResult {
    pub gst_amount: BigDecimal,
    pub tds_amount: BigDecimal,
    /// `taxable + gst - tds`
    pub net_payable: BigDecimal,
}

/// A single line of a GST invoice. Prices are always tax-exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstInvoiceLineItem {
    pub serial_no: u32,
    pub description: String,
    /// HSN code for goods, SAC code for services
    pub hsn_or_sac_code: Option<String>,
    pub quantity: BigDecimal,
    /// Unit quantity code (NOS, KGS, ...)
    pub unit: String,
    pub unit_price: BigDecimal,
    pub discount_percent: BigDecimal,
    pub gst_rate: BigDecimal,
    pub cess_rate: BigDecimal,
    pub is_service: bool,
}

impl GstInvoiceLineItem {
    /// Create a goods line without discount or cess
    pub fn new(
        serial_no: u32,
        description: impl Into<String>,
        quantity: BigDecimal,
        unit: impl Into<String>,
        unit_price: BigDecimal,
        gst_rate: BigDecimal,
    ) -> Self {
        Self {
            serial_no,
            description: description.into(),
            hsn_or_sac_code: None,
            quantity,
            unit: unit.into(),
            unit_price,
            discount_percent: BigDecimal::from(0),
            gst_rate,
            cess_rate: BigDecimal::from(0),
            is_service: false,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.hsn_or_sac_code = Some(code.into());
        self
    }

    pub fn with_discount(mut self, discount_percent: BigDecimal) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    pub fn with_cess(mut self, cess_rate: BigDecimal) -> Self {
        self.cess_rate = cess_rate;
        self
    }

    pub fn service(mut self) -> Self {
        self.is_service = true;
        self
    }
}

/// A GST invoice as handed over by the hosting layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstInvoice {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub supplier_name: String,
    pub supplier_gstin: Option<String>,
    /// Two-digit GST state code of the supplier
    pub supplier_state_code: String,
    pub customer_name: String,
    pub customer_gstin: Option<String>,
    /// Two-digit GST state code of the customer
    pub customer_state_code: String,
    pub place_of_supply: String,
    pub line_items: Vec<GstInvoiceLineItem>,
    pub reverse_charge: bool,
}

/// Tax computed for one invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemTaxResult {
    pub serial_no: u32,
    /// `quantity × unit_price`
    pub gross_amount: BigDecimal,
    pub discount_amount: BigDecimal,
    /// Gross minus discount; the taxable value of the line
    pub line_total: BigDecimal,
    pub is_service: bool,
    pub reverse_charge: bool,
    pub totals_breakdown: TaxBreakdown,
}

/// Invoice-level sums across every line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    #[serde(rename = "totalTaxableAmount")]
    pub total_taxable_amount: BigDecimal,
    #[serde(rename = "totalCGST")]
    pub total_cgst: BigDecimal,
    #[serde(rename = "totalSGST")]
    pub total_sgst: BigDecimal,
    #[serde(rename = "totalIGST")]
    pub total_igst: BigDecimal,
    #[serde(rename = "totalCess")]
    pub total_cess: BigDecimal,
    #[serde(rename = "totalTax")]
    pub total_tax: BigDecimal,
    #[serde(rename = "totalInvoiceAmount")]
    pub total_invoice_amount: BigDecimal,
}

impl InvoiceTotals {
    /// Round the component totals and re-add the grand totals from them
    pub fn rounded(&self, scale: u32) -> Self {
        let scale = i64::from(scale);
        let total_taxable_amount = round_half_up(&self.total_taxable_amount, scale);
        let total_cgst = round_half_up(&self.total_cgst, scale);
        let total_sgst = round_half_up(&self.total_sgst, scale);
        let total_igst = round_half_up(&self.total_igst, scale);
        let total_cess = round_half_up(&self.total_cess, scale);
        let total_tax = &total_cgst + &total_sgst + &total_igst + &total_cess;
        let total_invoice_amount = &total_taxable_amount + &total_tax;

        Self {
            total_taxable_amount,
            total_cgst,
            total_sgst,
            total_igst,
            total_cess,
            total_tax,
            total_invoice_amount,
        }
    }
}

/// Tax computed for a whole invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTaxResult {
    pub line_item_calculations: Vec<LineItemTaxResult>,
    pub totals: InvoiceTotals,
}

/// Which bound an amount violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountBound {
    Positive,
    NonNegative,
}

impl fmt::Display for AmountBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountBound::Positive => write!(f, "greater than zero"),
            AmountBound::NonNegative => write!(f, "zero or more"),
        }
    }
}

/// Errors raised by GST computations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GstError {
    #[error("Invalid amount {amount}: must be {bound}")]
    InvalidAmount {
        amount: BigDecimal,
        bound: AmountBound,
    },
    #[error("Invalid rate {rate}: must be between {min} and {max}")]
    InvalidRate {
        rate: BigDecimal,
        min: BigDecimal,
        max: BigDecimal,
    },
    #[error("Invalid cess rate {rate}: cannot be negative")]
    InvalidCessRate { rate: BigDecimal },
    #[error("Input must contain at least one entry")]
    EmptyInput,
    #[error("Invalid total {total}: weighted average needs a non-zero total")]
    InvalidTotal { total: BigDecimal },
    #[error("Invalid classification code: {0:?}")]
    InvalidCode(String),
    #[error("Invalid state code: {0:?}")]
    InvalidStateCode(String),
    #[error("Invalid GSTIN {gstin:?}: {reason}")]
    InvalidGstin { gstin: String, reason: String },
    #[error("Invalid line item {serial_no}: {reason}")]
    InvalidLineItem { serial_no: u32, reason: String },
}

/// Result type for GST operations
pub type GstResult<T> = Result<T, GstError>;

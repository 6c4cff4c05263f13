//! Validation utilities

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::config::{MAX_GST_RATE_PERCENT, MAX_TDS_RATE_PERCENT};
use crate::tax::state::validate_state_code;
use crate::types::*;

const GSTIN_LENGTH: usize = 15;
const GSTIN_CHARSET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Validate that an amount is strictly positive
pub fn validate_positive_amount(amount: &BigDecimal) -> GstResult<()> {
    if *amount <= BigDecimal::from(0) {
        return Err(GstError::InvalidAmount {
            amount: amount.clone(),
            bound: AmountBound::Positive,
        });
    }
    Ok(())
}

/// Validate that an amount is zero or positive
pub fn validate_non_negative_amount(amount: &BigDecimal) -> GstResult<()> {
    if *amount < BigDecimal::from(0) {
        return Err(GstError::InvalidAmount {
            amount: amount.clone(),
            bound: AmountBound::NonNegative,
        });
    }
    Ok(())
}

/// Validate a percentage rate against `[0, max]`
pub fn validate_rate(rate: &BigDecimal, max: &BigDecimal) -> GstResult<()> {
    let min = BigDecimal::from(0);
    if *rate < min || rate > max {
        return Err(GstError::InvalidRate {
            rate: rate.clone(),
            min,
            max: max.clone(),
        });
    }
    Ok(())
}

/// Validate a GST rate against the statutory ceiling
pub fn validate_gst_rate(rate: &BigDecimal) -> GstResult<()> {
    validate_rate(rate, &BigDecimal::from(MAX_GST_RATE_PERCENT))
}

/// Validate a TDS rate; withholding can never exceed the tax itself
pub fn validate_tds_rate(rate: &BigDecimal) -> GstResult<()> {
    validate_rate(rate, &BigDecimal::from(MAX_TDS_RATE_PERCENT))
}

/// Cess has no ceiling, only a floor
pub fn validate_cess_rate(rate: &BigDecimal) -> GstResult<()> {
    if *rate < BigDecimal::from(0) {
        return Err(GstError::InvalidCessRate { rate: rate.clone() });
    }
    Ok(())
}

/// Canonical form of an HSN/SAC code: trimmed, uppercased, without spaces
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Compute the GSTIN check character for the first 14 characters
pub fn gstin_check_digit(body: &str) -> Option<char> {
    let mut sum = 0u32;
    for (i, c) in body.chars().enumerate() {
        let value = GSTIN_CHARSET.iter().position(|&b| char::from(b) == c)? as u32;
        let product = value * if i % 2 == 0 { 1 } else { 2 };
        sum += product / 36 + product % 36;
    }
    let check = (36 - sum % 36) % 36;
    Some(char::from(GSTIN_CHARSET[check as usize]))
}

/// Validate a 15-character GSTIN: state prefix, embedded PAN, `Z`
/// marker and base-36 check digit
pub fn validate_gstin(gstin: &str) -> GstResult<()> {
    let invalid = |reason: &str| GstError::InvalidGstin {
        gstin: gstin.to_string(),
        reason: reason.to_string(),
    };

    let chars: Vec<char> = gstin.chars().collect();
    if chars.len() != GSTIN_LENGTH {
        return Err(invalid("must be 15 characters"));
    }
    if !chars
        .iter()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err(invalid("may only contain digits and uppercase letters"));
    }

    validate_state_code(&gstin[..2]).map_err(|_| invalid("unknown state code"))?;

    let pan_ok = chars[2..7].iter().all(|c| c.is_ascii_uppercase())
        && chars[7..11].iter().all(|c| c.is_ascii_digit())
        && chars[11].is_ascii_uppercase();
    if !pan_ok {
        return Err(invalid("does not embed a valid PAN"));
    }
    if chars[12] == '0' {
        return Err(invalid("entity number cannot be 0"));
    }
    if chars[13] != 'Z' {
        return Err(invalid("14th character must be 'Z'"));
    }
    if gstin_check_digit(&gstin[..14]) != Some(chars[14]) {
        return Err(invalid("check digit mismatch"));
    }

    Ok(())
}

/// State code embedded in a valid GSTIN
pub fn gstin_state_code(gstin: &str) -> GstResult<&str> {
    validate_gstin(gstin)?;
    Ok(&gstin[..2])
}

/// Validate a single invoice line
pub fn validate_line_item(item: &GstInvoiceLineItem) -> GstResult<()> {
    let invalid = |reason: &str| GstError::InvalidLineItem {
        serial_no: item.serial_no,
        reason: reason.to_string(),
    };

    if item.serial_no == 0 {
        return Err(invalid("serial number must be positive"));
    }
    if item.description.trim().is_empty() {
        return Err(invalid("description cannot be empty"));
    }
    if item.unit.trim().is_empty() {
        return Err(invalid("unit cannot be empty"));
    }
    if let Some(code) = &item.hsn_or_sac_code {
        if normalize_code(code).is_empty() {
            return Err(GstError::InvalidCode(code.clone()));
        }
    }

    validate_positive_amount(&item.quantity)?;
    validate_positive_amount(&item.unit_price)?;
    validate_rate(&item.discount_percent, &BigDecimal::from(100))?;
    validate_gst_rate(&item.gst_rate)?;
    validate_cess_rate(&item.cess_rate)?;

    Ok(())
}

/// Validate party details and every line of an invoice
pub fn validate_invoice(invoice: &GstInvoice) -> GstResult<()> {
    if invoice.line_items.is_empty() {
        return Err(GstError::EmptyInput);
    }

    validate_state_code(&invoice.supplier_state_code)?;
    validate_state_code(&invoice.customer_state_code)?;
    validate_state_code(&invoice.place_of_supply)?;

    let parties = [
        (&invoice.supplier_gstin, &invoice.supplier_state_code),
        (&invoice.customer_gstin, &invoice.customer_state_code),
    ];
    for (gstin, state_code) in parties {
        if let Some(gstin) = gstin {
            if gstin_state_code(gstin)? != state_code.trim() {
                return Err(GstError::InvalidGstin {
                    gstin: gstin.clone(),
                    reason: format!("does not belong to state {}", state_code),
                });
            }
        }
    }

    // Serial numbers identify lines in returns, so they must be unique
    let mut seen = HashSet::new();
    for item in &invoice.line_items {
        validate_line_item(item)?;
        if !seen.insert(item.serial_no) {
            return Err(GstError::InvalidLineItem {
                serial_no: item.serial_no,
                reason: "duplicate serial number".to_string(),
            });
        }
    }

    Ok(())
}

impl GstInvoiceLineItem {
    /// Schema-level checks on this line
    pub fn validate(&self) -> GstResult<()> {
        validate_line_item(self)
    }
}

impl GstInvoice {
    /// Schema-level checks on parties and lines
    pub fn validate(&self) -> GstResult<()> {
        validate_invoice(self)
    }
}

//! Per-line taxable value and GST breakdown

use bigdecimal::BigDecimal;

use crate::tax::calculator::TaxCalculator;
use crate::tax::state::is_inter_state;
use crate::traits::RateProvider;
use crate::types::*;
use crate::utils::money::percent_of;
use crate::utils::validation::{validate_positive_amount, validate_rate};

impl TaxCalculator {
    /// Compute tax for one invoice line
    ///
    /// Line prices are tax-exclusive. The line is inter-state when the two
    /// state codes differ. `is_service` and `reverse_charge` are carried
    /// through for reporting and do not change the arithmetic.
    ///
    /// Quantity and unit price must be positive and the discount within
    /// 0..=100 percent; rates are checked by [`TaxCalculator::calculate_tax`].
    pub fn calculate_line_item_tax(
        &self,
        line_item: &GstInvoiceLineItem,
        supplier_state_code: &str,
        customer_state_code: &str,
        reverse_charge: bool,
    ) -> GstResult<LineItemTaxResult> {
        validate_positive_amount(&line_item.quantity)?;
        validate_positive_amount(&line_item.unit_price)?;
        validate_rate(&line_item.discount_percent, &BigDecimal::from(100))?;

        let gross_amount = line_item.gross_amount();
        let discount_amount = percent_of(&gross_amount, &line_item.discount_percent);
        let line_total = &gross_amount - &discount_amount;

        let input = TaxCalculationInput {
            amount: line_total.clone(),
            gst_rate: line_item.gst_rate.clone(),
            is_inclusive: false,
            is_inter_state: is_inter_state(supplier_state_code, customer_state_code),
            cess_rate: line_item.cess_rate.clone(),
        };
        let totals_breakdown = self.calculate_tax(&input)?;

        Ok(LineItemTaxResult {
            serial_no: line_item.serial_no,
            gross_amount,
            discount_amount,
            line_total,
            is_service: line_item.is_service,
            reverse_charge,
            totals_breakdown,
        })
    }
}

impl GstInvoiceLineItem {
    /// Replace the line's GST rate with the one its HSN/SAC code resolves to
    ///
    /// Lines without a code keep their rate.
    pub fn with_rate_from(mut self, provider: &dyn RateProvider) -> Self {
        if let Some(code) = &self.hsn_or_sac_code {
            self.gst_rate = provider.gst_rate_for(code);
        }
        self
    }

    /// `quantity × unit_price` before discount
    pub fn gross_amount(&self) -> BigDecimal {
        &self.quantity * &self.unit_price
    }
}

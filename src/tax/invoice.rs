//! Invoice-level aggregation of line taxes

use tracing::debug;

use crate::tax::calculator::TaxCalculator;
use crate::types::*;

impl TaxCalculator {
    /// Compute every line of an invoice and sum the results
    ///
    /// Each line is classified intra- or inter-state on its own, so an
    /// invoice can carry CGST/SGST and IGST lines side by side. The invoice
    /// is expected to have been validated by the caller; any line failure
    /// aborts the whole computation.
    pub fn calculate_invoice_tax(&self, invoice: &GstInvoice) -> GstResult<InvoiceTaxResult> {
        let line_item_calculations = invoice
            .line_items
            .iter()
            .map(|item| {
                self.calculate_line_item_tax(
                    item,
                    &invoice.supplier_state_code,
                    &invoice.customer_state_code,
                    invoice.reverse_charge,
                )
            })
            .collect::<GstResult<Vec<_>>>()?;

        let totals = InvoiceTotals::from_lines(&line_item_calculations);

        debug!(
            invoice = %invoice.invoice_number,
            lines = line_item_calculations.len(),
            total_tax = %totals.total_tax,
            total = %totals.total_invoice_amount,
            "calculated invoice tax"
        );

        Ok(InvoiceTaxResult {
            line_item_calculations,
            totals,
        })
    }
}

impl InvoiceTotals {
    /// Elementwise sum of line breakdowns
    pub fn from_lines(lines: &[LineItemTaxResult]) -> Self {
        let breakdowns = || lines.iter().map(|line| &line.totals_breakdown);

        Self {
            total_taxable_amount: breakdowns().map(|b| &b.taxable_amount).sum(),
            total_cgst: breakdowns().map(|b| &b.cgst).sum(),
            total_sgst: breakdowns().map(|b| &b.sgst).sum(),
            total_igst: breakdowns().map(|b| &b.igst).sum(),
            total_cess: breakdowns().map(|b| &b.cess).sum(),
            total_tax: breakdowns().map(|b| &b.total_tax).sum(),
            total_invoice_amount: breakdowns().map(|b| &b.total_amount).sum(),
        }
    }
}

//! GST calculation walkthrough
//!
//! Run with `RUST_LOG=gst_engine=debug cargo run --example gst_calculations`
//! to see the engine's tracing output alongside the figures.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use gst_engine::utils::round_half_up;
use gst_engine::{
    state_name, GstInvoice, GstInvoiceLineItem, GstRateSlab, RateManager, Supply,
    TaxCalculationInput, TaxCalculator, MONEY_SCALE, RATE_SCALE,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let calculator = TaxCalculator::new();

    println!("Statutory GST slabs:");
    for slab in GstRateSlab::ALL {
        println!("  {:?}: {}%", slab, slab.percent());
    }
    println!();

    // 1. Intra-state vs inter-state
    let base = BigDecimal::from(10000);
    let intra = calculator.calculate_tax(&TaxCalculationInput::new(base.clone(), BigDecimal::from(18)))?;
    println!("Intra-state, 18% on ₹{}:", base);
    println!("  CGST: ₹{}  SGST: ₹{}  Total: ₹{}", intra.cgst, intra.sgst, intra.total_amount);

    let inter = calculator.calculate_tax(
        &TaxCalculationInput::new(base.clone(), BigDecimal::from(18)).inter_state(true),
    )?;
    println!("Inter-state, 18% on ₹{}:", base);
    println!("  IGST: ₹{}  Total: ₹{}", inter.igst, inter.total_amount);
    println!();

    // 2. Inclusive price with cess
    let inclusive = calculator.calculate_tax(
        &TaxCalculationInput::new(BigDecimal::from(1400), BigDecimal::from(28))
            .with_cess(BigDecimal::from(12))
            .inclusive(true),
    )?;
    println!("Inclusive ₹1400 at 28% + 12% cess:");
    println!(
        "  Taxable: ₹{}  GST: ₹{}  Cess: ₹{}",
        inclusive.taxable_amount,
        inclusive.gst_amount(),
        inclusive.cess
    );
    println!();

    // 3. Reverse calculation
    let reverse = calculator.calculate_reverse_gst(&BigDecimal::from(11800), &BigDecimal::from(18))?;
    println!("Reverse GST on ₹11800 at 18%:");
    println!("  Base: ₹{}  GST: ₹{}", reverse.taxable_amount, reverse.gst_amount);
    println!();

    // 4. Composite rate and TDS
    let composite = calculator.calculate_composite_rate(&[
        Supply::new(BigDecimal::from(1000), BigDecimal::from(18)),
        Supply::new(BigDecimal::from(500), BigDecimal::from(12)),
        Supply::new(BigDecimal::from(500), BigDecimal::from(5)),
    ])?;
    println!(
        "Composite rate across mixed supplies: {}%",
        round_half_up(&composite, i64::from(RATE_SCALE))
    );

    let tds = calculator.calculate_tds_on_gst(&BigDecimal::from(10000), &BigDecimal::from(18), None)?;
    println!(
        "TDS on ₹10000 at 18%: GST ₹{}, TDS ₹{}, net payable ₹{}",
        tds.gst_amount, tds.tds_amount, tds.net_payable
    );
    println!();

    // 5. Invoice with rates resolved from HSN/SAC codes and a tenant override
    let rates = RateManager::new();
    rates.set_custom_rate("sez-001", BigDecimal::from(0))?;

    let line_items: Vec<GstInvoiceLineItem> = vec![
        GstInvoiceLineItem::new(1, "Basmati rice 10kg", BigDecimal::from(2), "BAG", BigDecimal::from(950), BigDecimal::from(0))
            .with_code("1006"),
        GstInvoiceLineItem::new(2, "Cotton shirts", BigDecimal::from(5), "NOS", BigDecimal::from(800), BigDecimal::from(0))
            .with_code("6205")
            .with_discount(BigDecimal::from(10)),
        GstInvoiceLineItem::new(3, "Annual maintenance", BigDecimal::from(1), "NOS", BigDecimal::from(6000), BigDecimal::from(0))
            .with_code("998713")
            .service(),
        GstInvoiceLineItem::new(4, "SEZ consignment", BigDecimal::from(1), "NOS", BigDecimal::from(2500), BigDecimal::from(18))
            .with_code("SEZ-001"),
    ]
    .into_iter()
    .map(|item| item.with_rate_from(&rates))
    .collect();

    let invoice = GstInvoice {
        invoice_number: "MH/24-25/0001".to_string(),
        invoice_date: NaiveDate::from_ymd_opt(2024, 11, 4).ok_or("invalid date")?,
        supplier_name: "Deccan Traders".to_string(),
        supplier_gstin: Some("27AAPFU0939F1ZV".to_string()),
        supplier_state_code: "27".to_string(),
        customer_name: "Sabarmati Retail".to_string(),
        customer_gstin: Some("24AAACC1206D1ZM".to_string()),
        customer_state_code: "24".to_string(),
        place_of_supply: "24".to_string(),
        line_items,
        reverse_charge: false,
    };
    invoice.validate()?;

    let result = calculator.calculate_invoice_tax(&invoice)?;
    println!(
        "Invoice {} ({} → {}):",
        invoice.invoice_number,
        state_name(&invoice.supplier_state_code).unwrap_or("?"),
        state_name(&invoice.customer_state_code).unwrap_or("?")
    );
    for (item, line) in invoice.line_items.iter().zip(&result.line_item_calculations) {
        println!(
            "  {}. {} @ {}%: taxable ₹{}, IGST ₹{}",
            line.serial_no, item.description, item.gst_rate, line.line_total, line.totals_breakdown.igst
        );
    }

    let totals = result.totals.rounded(MONEY_SCALE);
    println!("  Taxable: ₹{}", totals.total_taxable_amount);
    println!("  IGST:    ₹{}", totals.total_igst);
    println!("  Total:   ₹{}", totals.total_invoice_amount);

    Ok(())
}

//! GST arithmetic: intra/inter-state splits, reverse extraction, composite
//! rates and TDS withholding

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::config::TaxConfig;
use crate::types::*;
use crate::utils::money::{gross_up_factor, percent_of};
use crate::utils::validation::*;

/// Stateless GST calculation engine
///
/// Only immutable configuration is held, so one instance can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct TaxCalculator {
    config: TaxConfig,
}

impl TaxCalculator {
    /// Create a calculator using the statutory defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with custom bounds and scales
    pub fn with_config(config: TaxConfig) -> GstResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    fn validate_gst_rate(&self, rate: &BigDecimal) -> GstResult<()> {
        validate_rate(rate, &self.config.max_gst_rate)
    }

    /// Split an amount into CGST/SGST or IGST plus cess
    ///
    /// Inclusive amounts are first reduced to their taxable value. The
    /// result is never rounded here; see [`TaxBreakdown::rounded`].
    pub fn calculate_tax(&self, input: &TaxCalculationInput) -> GstResult<TaxBreakdown> {
        validate_positive_amount(&input.amount)?;
        self.validate_gst_rate(&input.gst_rate)?;
        validate_cess_rate(&input.cess_rate)?;

        let taxable_amount = if input.is_inclusive {
            let combined_rate = &input.gst_rate + &input.cess_rate;
            &input.amount / gross_up_factor(&combined_rate)
        } else {
            input.amount.clone()
        };

        let (cgst, sgst, igst) = split_gst(&taxable_amount, &input.gst_rate, input.is_inter_state);
        let cess = percent_of(&taxable_amount, &input.cess_rate);

        let total_tax = &cgst + &sgst + &igst + &cess;
        let total_amount = &taxable_amount + &total_tax;

        Ok(TaxBreakdown {
            taxable_amount,
            cgst,
            sgst,
            igst,
            cess,
            total_tax,
            total_amount,
            gst_rate: input.gst_rate.clone(),
            cess_rate: input.cess_rate.clone(),
            is_inter_state: input.is_inter_state,
            is_inclusive: input.is_inclusive,
        })
    }

    /// Extract base and GST from a GST-inclusive amount
    ///
    /// The GST is the exact remainder, so the two parts always add back up
    /// to `gross_amount`.
    pub fn calculate_reverse_gst(
        &self,
        gross_amount: &BigDecimal,
        gst_rate: &BigDecimal,
    ) -> GstResult<ReverseGstResult> {
        validate_positive_amount(gross_amount)?;
        self.validate_gst_rate(gst_rate)?;

        let taxable_amount = gross_amount / gross_up_factor(gst_rate);
        let gst_amount = gross_amount - &taxable_amount;

        Ok(ReverseGstResult {
            taxable_amount,
            gst_amount,
        })
    }

    /// Volume-weighted average GST rate across mixed-rate supplies
    ///
    /// Sums are exact and the quotient is taken once. A quotient that does
    /// not terminate is cut at the decimal precision limit and kept within
    /// the range of the supplied rates.
    pub fn calculate_composite_rate(&self, supplies: &[Supply]) -> GstResult<BigDecimal> {
        if supplies.is_empty() {
            return Err(GstError::EmptyInput);
        }
        for supply in supplies {
            validate_non_negative_amount(&supply.amount)?;
            self.validate_gst_rate(&supply.gst_rate)?;
        }

        let total: BigDecimal = supplies.iter().map(|s| &s.amount).sum();
        if total == BigDecimal::from(0) {
            return Err(GstError::InvalidTotal { total });
        }

        let weighted: BigDecimal = supplies.iter().map(|s| &s.amount * &s.gst_rate).sum();
        let rate = clamp_to_supplied_rates(weighted / &total, supplies);

        debug!(supplies = supplies.len(), %total, %rate, "computed composite GST rate");
        Ok(rate)
    }

    /// GST, TDS withheld on that GST, and the net amount payable
    ///
    /// `tds_rate` of `None` applies the configured default (2% by statute).
    pub fn calculate_tds_on_gst(
        &self,
        taxable_amount: &BigDecimal,
        gst_rate: &BigDecimal,
        tds_rate: Option<&BigDecimal>,
    ) -> GstResult<TdsResult> {
        validate_non_negative_amount(taxable_amount)?;
        self.validate_gst_rate(gst_rate)?;
        let tds_rate = tds_rate.unwrap_or(&self.config.default_tds_rate);
        validate_tds_rate(tds_rate)?;

        let gst_amount = percent_of(taxable_amount, gst_rate);
        let tds_amount = percent_of(&gst_amount, tds_rate);
        let net_payable = taxable_amount + &gst_amount - &tds_amount;

        Ok(TdsResult {
            gst_amount,
            tds_amount,
            net_payable,
        })
    }
}

/// Returns `(cgst, sgst, igst)` for a taxable value
fn split_gst(
    taxable_amount: &BigDecimal,
    gst_rate: &BigDecimal,
    is_inter_state: bool,
) -> (BigDecimal, BigDecimal, BigDecimal) {
    if is_inter_state {
        let igst = percent_of(taxable_amount, gst_rate);
        (BigDecimal::from(0), BigDecimal::from(0), igst)
    } else {
        let half = (taxable_amount * gst_rate) / BigDecimal::from(200);
        (half.clone(), half, BigDecimal::from(0))
    }
}

fn clamp_to_supplied_rates(rate: BigDecimal, supplies: &[Supply]) -> BigDecimal {
    let rates = supplies.iter().map(|s| &s.gst_rate);
    match (rates.clone().min(), rates.max()) {
        (Some(min), Some(max)) => rate.clamp(min.clone(), max.clone()),
        _ => rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::money::round_half_up;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn calculator() -> TaxCalculator {
        TaxCalculator::new()
    }

    #[test]
    fn test_intra_state_split() {
        let input = TaxCalculationInput::new(dec("1000"), dec("18"));
        let breakdown = calculator().calculate_tax(&input).unwrap();

        assert_eq!(breakdown.taxable_amount, dec("1000"));
        assert_eq!(breakdown.cgst, dec("90"));
        assert_eq!(breakdown.sgst, dec("90"));
        assert_eq!(breakdown.igst, dec("0"));
        assert_eq!(breakdown.cess, dec("0"));
        assert_eq!(breakdown.total_tax, dec("180"));
        assert_eq!(breakdown.total_amount, dec("1180"));
        assert!(!breakdown.is_inter_state);
    }

    #[test]
    fn test_inter_state_split() {
        let input = TaxCalculationInput::new(dec("1000"), dec("18")).inter_state(true);
        let breakdown = calculator().calculate_tax(&input).unwrap();

        assert_eq!(breakdown.cgst, dec("0"));
        assert_eq!(breakdown.sgst, dec("0"));
        assert_eq!(breakdown.igst, dec("180"));
        assert_eq!(breakdown.total_amount, dec("1180"));
    }

    #[test]
    fn test_luxury_goods_with_cess() {
        let input = TaxCalculationInput::new(dec("1000"), dec("28")).with_cess(dec("12"));
        let breakdown = calculator().calculate_tax(&input).unwrap();

        assert_eq!(breakdown.cgst, dec("140"));
        assert_eq!(breakdown.sgst, dec("140"));
        assert_eq!(breakdown.cess, dec("120"));
        assert_eq!(breakdown.total_tax, dec("400"));
        assert_eq!(breakdown.total_amount, dec("1400"));
    }

    #[test]
    fn test_inclusive_amount_is_reduced_first() {
        let input = TaxCalculationInput::new(dec("1180"), dec("18")).inclusive(true);
        let breakdown = calculator().calculate_tax(&input).unwrap();

        assert_eq!(breakdown.taxable_amount, dec("1000"));
        assert_eq!(breakdown.total_tax, dec("180"));
        assert_eq!(breakdown.total_amount, dec("1180"));
        assert!(breakdown.is_inclusive);
    }

    #[test]
    fn test_inclusive_amount_with_cess() {
        let input = TaxCalculationInput::new(dec("1400"), dec("28"))
            .with_cess(dec("12"))
            .inclusive(true);
        let breakdown = calculator().calculate_tax(&input).unwrap();

        assert_eq!(breakdown.taxable_amount, dec("1000"));
        assert_eq!(breakdown.cess, dec("120"));
        assert_eq!(breakdown.total_amount, dec("1400"));
    }

    #[test]
    fn test_inclusive_total_equals_amount() {
        let calc = calculator();
        for (amount, rate) in [("1180", "18"), ("1120", "12"), ("103.239675", "18"), ("52.5", "5")] {
            let input = TaxCalculationInput::new(dec(amount), dec(rate)).inclusive(true);
            let breakdown = calc.calculate_tax(&input).unwrap();
            let reverse = calc.calculate_reverse_gst(&dec(amount), &dec(rate)).unwrap();

            assert_eq!(breakdown.total_amount, dec(amount));
            assert_eq!(breakdown.taxable_amount, reverse.taxable_amount);
            assert_eq!(breakdown.total_tax, reverse.gst_amount);
        }
    }

    #[test]
    fn test_inclusive_amount_with_repeating_base() {
        let calc = calculator();
        let input = TaxCalculationInput::new(dec("1000"), dec("18")).inclusive(true);
        let breakdown = calc.calculate_tax(&input).unwrap();
        let reverse = calc.calculate_reverse_gst(&dec("1000"), &dec("18")).unwrap();

        // 1000 / 1.18 = 847.4576...
        assert_eq!(breakdown.taxable_amount, reverse.taxable_amount);
        assert!((&breakdown.total_amount - dec("1000")).abs() < dec("1e-90"));

        let printed = breakdown.rounded(2);
        assert_eq!(printed.taxable_amount, dec("847.46"));
        assert_eq!(printed.cgst, dec("76.27"));
        assert_eq!(printed.total_tax, dec("152.54"));
        assert_eq!(printed.total_amount, dec("1000.00"));

        let printed_reverse = reverse.rounded(2);
        assert_eq!(printed_reverse.taxable_amount, printed.taxable_amount);
        assert_eq!(printed_reverse.gst_amount, printed.total_tax);
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        let input = TaxCalculationInput::new(dec("250"), dec("0"));
        let breakdown = calculator().calculate_tax(&input).unwrap();
        assert_eq!(breakdown.total_tax, dec("0"));
        assert_eq!(breakdown.total_amount, dec("250"));
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let calc = calculator();

        let negative = TaxCalculationInput::new(dec("-100"), dec("18"));
        assert!(matches!(
            calc.calculate_tax(&negative),
            Err(GstError::InvalidAmount { .. })
        ));

        let zero = TaxCalculationInput::new(dec("0"), dec("18"));
        assert!(matches!(
            calc.calculate_tax(&zero),
            Err(GstError::InvalidAmount { .. })
        ));

        let high_rate = TaxCalculationInput::new(dec("100"), dec("51"));
        assert_eq!(
            calc.calculate_tax(&high_rate),
            Err(GstError::InvalidRate {
                rate: dec("51"),
                min: dec("0"),
                max: dec("50"),
            })
        );

        let negative_cess = TaxCalculationInput::new(dec("100"), dec("18")).with_cess(dec("-1"));
        assert_eq!(
            calc.calculate_tax(&negative_cess),
            Err(GstError::InvalidCessRate { rate: dec("-1") })
        );
    }

    #[test]
    fn test_reverse_gst() {
        let result = calculator()
            .calculate_reverse_gst(&dec("1180"), &dec("18"))
            .unwrap();
        assert_eq!(result.taxable_amount, dec("1000"));
        assert_eq!(result.gst_amount, dec("180"));
    }

    #[test]
    fn test_reverse_gst_parts_sum_to_gross() {
        let gross = dec("999.99");
        let result = calculator().calculate_reverse_gst(&gross, &dec("12")).unwrap();
        // 999.99 / 1.12 = 892.848...
        assert_eq!(&result.taxable_amount + &result.gst_amount, gross);

        let printed = result.rounded(2);
        assert_eq!(printed.taxable_amount, dec("892.85"));
        assert_eq!(printed.gst_amount, dec("107.14"));
    }

    #[test]
    fn test_reverse_gst_recovers_sub_paise_base() {
        let calc = calculator();
        let forward = calc
            .calculate_tax(&TaxCalculationInput::new(dec("87.49125"), dec("18")))
            .unwrap();
        assert_eq!(forward.total_amount, dec("103.239675"));

        let reverse = calc.calculate_reverse_gst(&forward.total_amount, &dec("18")).unwrap();
        assert_eq!(reverse.taxable_amount, dec("87.49125"));
        assert_eq!(reverse.gst_amount, forward.total_tax);
    }

    #[test]
    fn test_reverse_gst_validation() {
        let calc = calculator();
        assert!(matches!(
            calc.calculate_reverse_gst(&dec("0"), &dec("18")),
            Err(GstError::InvalidAmount { .. })
        ));
        assert!(matches!(
            calc.calculate_reverse_gst(&dec("100"), &dec("60")),
            Err(GstError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_composite_rate() {
        let supplies = vec![
            Supply::new(dec("1000"), dec("18")),
            Supply::new(dec("500"), dec("12")),
            Supply::new(dec("500"), dec("5")),
        ];
        let rate = calculator().calculate_composite_rate(&supplies).unwrap();
        assert_eq!(rate, dec("13.25"));

        let mut reversed = supplies.clone();
        reversed.reverse();
        assert_eq!(calculator().calculate_composite_rate(&reversed).unwrap(), rate);
    }

    #[test]
    fn test_composite_rate_is_not_rounded() {
        let supplies = vec![
            Supply::new(dec("1"), dec("5")),
            Supply::new(dec("1"), dec("12")),
            Supply::new(dec("1"), dec("18")),
        ];
        // 35 / 3 = 11.6666...
        let rate = calculator().calculate_composite_rate(&supplies).unwrap();
        assert_eq!(round_half_up(&rate, 4), dec("11.6667"));
        assert!(rate > dec("11.6666") && rate < dec("11.6667"));

        let fine = vec![
            Supply::new(dec("250"), dec("5.00001")),
            Supply::new(dec("750"), dec("5.00001")),
        ];
        let rate = calculator().calculate_composite_rate(&fine).unwrap();
        assert_eq!(rate, dec("5.00001"));
    }

    #[test]
    fn test_composite_rate_stays_within_supplied_rates() {
        let supplies = vec![
            Supply::new(dec("7"), dec("12.34567")),
            Supply::new(dec("3"), dec("12.34568")),
        ];
        let rate = calculator().calculate_composite_rate(&supplies).unwrap();
        assert_eq!(rate, dec("12.345673"));

        let supplies = vec![
            Supply::new(dec("0.01"), dec("0.00001")),
            Supply::new(dec("99999.99"), dec("0.00003")),
            Supply::new(dec("0.01"), dec("0.00002")),
        ];
        let rate = calculator().calculate_composite_rate(&supplies).unwrap();
        assert!(rate >= dec("0.00001") && rate <= dec("0.00003"));
    }

    #[test]
    fn test_composite_rate_errors() {
        let calc = calculator();
        assert_eq!(calc.calculate_composite_rate(&[]), Err(GstError::EmptyInput));

        let zero_total = vec![
            Supply::new(dec("0"), dec("18")),
            Supply::new(dec("0"), dec("5")),
        ];
        assert_eq!(
            calc.calculate_composite_rate(&zero_total),
            Err(GstError::InvalidTotal { total: dec("0") })
        );

        let bad_rate = vec![Supply::new(dec("100"), dec("75"))];
        assert!(matches!(
            calc.calculate_composite_rate(&bad_rate),
            Err(GstError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_tds_on_gst() {
        let result = calculator()
            .calculate_tds_on_gst(&dec("10000"), &dec("18"), Some(&dec("2")))
            .unwrap();
        assert_eq!(result.gst_amount, dec("1800"));
        assert_eq!(result.tds_amount, dec("36"));
        assert_eq!(result.net_payable, dec("11764"));
    }

    #[test]
    fn test_tds_defaults_and_overrides() {
        let calc = calculator();
        let default = calc
            .calculate_tds_on_gst(&dec("10000"), &dec("18"), None)
            .unwrap();
        assert_eq!(default.tds_amount, dec("36"));

        let custom = calc
            .calculate_tds_on_gst(&dec("10000"), &dec("18"), Some(&dec("1")))
            .unwrap();
        assert_eq!(custom.tds_amount, dec("18"));
        assert_eq!(custom.net_payable, dec("11782"));

        let zero = calc
            .calculate_tds_on_gst(&dec("0"), &dec("18"), None)
            .unwrap();
        assert_eq!(zero.net_payable, dec("0"));
    }

    #[test]
    fn test_tds_rejects_negative_taxable() {
        assert!(matches!(
            calculator().calculate_tds_on_gst(&dec("-1"), &dec("18"), None),
            Err(GstError::InvalidAmount {
                bound: AmountBound::NonNegative,
                ..
            })
        ));
    }

    #[test]
    fn test_custom_config() {
        let config = TaxConfig {
            max_gst_rate: dec("40"),
            default_tds_rate: dec("1"),
        };
        let calc = TaxCalculator::with_config(config).unwrap();

        let input = TaxCalculationInput::new(dec("100"), dec("45"));
        assert!(matches!(
            calc.calculate_tax(&input),
            Err(GstError::InvalidRate { .. })
        ));

        let tds = calc
            .calculate_tds_on_gst(&dec("10000"), &dec("18"), None)
            .unwrap();
        assert_eq!(tds.tds_amount, dec("18"));
    }
}

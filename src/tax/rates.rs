//! Rate resolution for HSN/SAC classification codes
//!
//! Rates come from two places: tenant overrides set at runtime, and an
//! ordered schedule of prefix-range rules that mirrors the statutory rate
//! notification. Overrides always win.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::config::GST_RATE_SLABS;
use crate::types::{GstError, GstResult};
use crate::utils::validation::{normalize_code, validate_gst_rate};

/// Statutory GST slabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstRateSlab {
    /// Exempt staples (fresh produce, cereals, milk) - 0%
    Exempt,
    /// Processed food, textiles - 5%
    Reduced,
    /// Industrial inputs - 12%
    Standard,
    /// Most goods and all services - 18%
    Higher,
    /// Luxury and sin goods - 28%
    Luxury,
}

impl GstRateSlab {
    pub const ALL: [GstRateSlab; 5] = [
        GstRateSlab::Exempt,
        GstRateSlab::Reduced,
        GstRateSlab::Standard,
        GstRateSlab::Higher,
        GstRateSlab::Luxury,
    ];

    /// Rate of this slab in percent
    pub fn percent(&self) -> u32 {
        match self {
            GstRateSlab::Exempt => GST_RATE_SLABS[0],
            GstRateSlab::Reduced => GST_RATE_SLABS[1],
            GstRateSlab::Standard => GST_RATE_SLABS[2],
            GstRateSlab::Higher => GST_RATE_SLABS[3],
            GstRateSlab::Luxury => GST_RATE_SLABS[4],
        }
    }

    pub fn rate(&self) -> BigDecimal {
        BigDecimal::from(self.percent())
    }

    /// The slab a rate belongs to, if it is one of the statutory slabs
    pub fn from_rate(rate: &BigDecimal) -> Option<Self> {
        Self::ALL.into_iter().find(|slab| slab.rate() == *rate)
    }
}

/// Maps every code whose leading characters fall within `from..=to` to `rate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRule {
    pub from: String,
    pub to: String,
    pub rate: BigDecimal,
    pub label: String,
}

impl RateRule {
    pub fn new(from: &str, to: &str, slab: GstRateSlab, label: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            rate: slab.rate(),
            label: label.to_string(),
        }
    }

    /// Whether a normalized code falls inside this rule's range
    pub fn matches(&self, code: &str) -> bool {
        match code.get(..self.from.len()) {
            Some(prefix) => prefix >= self.from.as_str() && prefix <= self.to.as_str(),
            None => false,
        }
    }

    fn validate(&self) -> GstResult<()> {
        let bounds_ok = !self.from.is_empty()
            && self.from.len() == self.to.len()
            && self.from <= self.to
            && normalize_code(&self.from) == self.from
            && normalize_code(&self.to) == self.to;
        if !bounds_ok {
            return Err(GstError::InvalidCode(format!("{}..={}", self.from, self.to)));
        }
        validate_gst_rate(&self.rate)
    }
}

/// Ordered rule table; the first matching rule decides the rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSchedule {
    pub rules: Vec<RateRule>,
    /// Rate for codes no rule matches
    pub default_rate: BigDecimal,
}

impl Default for RateSchedule {
    fn default() -> Self {
        use GstRateSlab::*;

        Self {
            rules: vec![
                RateRule::new("99", "99", Higher, "services (SAC)"),
                RateRule::new("01", "08", Exempt, "fresh produce and animal products"),
                RateRule::new("10", "10", Exempt, "cereals"),
                RateRule::new("22", "22", Luxury, "aerated and alcoholic beverages"),
                RateRule::new("24", "24", Luxury, "tobacco"),
                RateRule::new("87", "87", Luxury, "motor vehicles"),
                RateRule::new("09", "09", Reduced, "tea, coffee and spices"),
                RateRule::new("11", "21", Reduced, "processed foods"),
                RateRule::new("50", "63", Reduced, "textiles and apparel"),
                RateRule::new("44", "49", Standard, "wood and paper"),
                RateRule::new("68", "70", Standard, "stone, ceramic and glass"),
            ],
            default_rate: Higher.rate(),
        }
    }
}

impl RateSchedule {
    pub fn validate(&self) -> GstResult<()> {
        for rule in &self.rules {
            rule.validate()?;
        }
        validate_gst_rate(&self.default_rate)
    }

    /// First rule matching a normalized code
    pub fn find_rule(&self, code: &str) -> Option<&RateRule> {
        self.rules.iter().find(|rule| rule.matches(code))
    }
}

/// Where a resolved rate came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RateSource {
    Custom,
    Schedule { label: String },
    Default,
}

/// A resolved rate with its provenance, for audit trails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResolution {
    /// Normalized code the rate was resolved for
    pub code: String,
    pub rate: BigDecimal,
    pub source: RateSource,
}

/// Resolves GST rates for classification codes, with tenant overrides
///
/// The override store is behind a `RwLock`, so a single manager can be
/// shared across request handlers with `Arc<RateManager>`.
#[derive(Debug, Default)]
pub struct RateManager {
    schedule: RateSchedule,
    custom_rates: RwLock<HashMap<String, BigDecimal>>,
}

impl RateManager {
    /// Create a manager backed by the statutory schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager backed by an amended schedule
    pub fn with_schedule(schedule: RateSchedule) -> GstResult<Self> {
        schedule.validate()?;
        Ok(Self {
            schedule,
            custom_rates: RwLock::new(HashMap::new()),
        })
    }

    pub fn schedule(&self) -> &RateSchedule {
        &self.schedule
    }

    // Every write is a single map operation, so a poisoned store is still
    // consistent and safe to keep using.
    fn read_store(&self) -> RwLockReadGuard<'_, HashMap<String, BigDecimal>> {
        self.custom_rates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, HashMap<String, BigDecimal>> {
        self.custom_rates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Override the rate for a code
    pub fn set_custom_rate(&self, code: &str, rate: BigDecimal) -> GstResult<()> {
        if let Err(err) = validate_gst_rate(&rate) {
            warn!(code, %rate, "rejected custom GST rate");
            return Err(err);
        }
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return Err(GstError::InvalidCode(code.to_string()));
        }

        info!(code = %normalized, %rate, "custom GST rate set");
        self.write_store().insert(normalized, rate);
        Ok(())
    }

    /// Rate for a code, with where it came from
    pub fn resolve(&self, code: &str) -> RateResolution {
        let code = normalize_code(code);

        let custom = self.read_store().get(&code).cloned();
        let (rate, source) = match custom {
            Some(rate) => (rate, RateSource::Custom),
            None => match self.schedule.find_rule(&code) {
                Some(rule) => (
                    rule.rate.clone(),
                    RateSource::Schedule {
                        label: rule.label.clone(),
                    },
                ),
                None => (self.schedule.default_rate.clone(), RateSource::Default),
            },
        };

        debug!(code = %code, %rate, ?source, "resolved GST rate");
        RateResolution { code, rate, source }
    }

    /// Rate for a code: the override if one is set, otherwise the schedule
    pub fn get_rate(&self, code: &str) -> BigDecimal {
        self.resolve(code).rate
    }

    /// Drop every override
    pub fn clear_custom_rates(&self) {
        let mut store = self.write_store();
        let cleared = store.len();
        store.clear();
        info!(cleared, "custom GST rates cleared");
    }

    /// Snapshot of the current overrides, ordered by code
    pub fn custom_rates(&self) -> BTreeMap<String, BigDecimal> {
        self.read_store()
            .iter()
            .map(|(code, rate)| (code.clone(), rate.clone()))
            .collect()
    }
}

//! The bundled bonus item rule.
//!
//! When the primary selection hits the trigger combination (by default color
//! "Black" and size "Medium"), a configured accessory goes into the cart too.

use serde::{Deserialize, Serialize};

use quickbuy_catalog::{AxisMap, Selection, Variant};
use quickbuy_core::{ProductHandle, Quantity, VariantId};

/// Where the bonus variant comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusSource {
    /// Look the product up and take its first available variant (else its first).
    Handle(ProductHandle),
    /// Add this variant directly.
    Variant(VariantId),
}

/// How many bonus items go in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusQuantity {
    Fixed(Quantity),
    /// Same quantity as the primary line.
    MatchPrimary,
}

impl Default for BonusQuantity {
    fn default() -> Self {
        Self::Fixed(Quantity::ONE)
    }
}

impl BonusQuantity {
    pub fn resolve(&self, primary: Quantity) -> Quantity {
        match self {
            Self::Fixed(q) => *q,
            Self::MatchPrimary => primary,
        }
    }
}

/// How the bonus line is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleStrategy {
    /// Primary add first, then a separate best-effort bonus add.
    #[default]
    Sequential,
    /// One `{items: [...]}` add. If the cart rejects the batch, the primary
    /// line is posted alone.
    Batched,
}

/// Option values that trigger the bonus (compared case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleTrigger {
    pub color: String,
    pub size: String,
}

impl Default for BundleTrigger {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            size: "medium".to_string(),
        }
    }
}

impl BundleTrigger {
    /// Both the color axis and the size axis must carry the trigger value,
    /// read from either the resolved variant or the shopper's selection.
    pub fn is_met(&self, variant: &Variant, axes: AxisMap, selection: &Selection) -> bool {
        axis_has(variant, axes.color, selection, &self.color)
            && axis_has(variant, axes.size, selection, &self.size)
    }
}

fn axis_has(variant: &Variant, axis: Option<usize>, selection: &Selection, wanted: &str) -> bool {
    let Some(axis) = axis else {
        return false;
    };
    let wanted = wanted.trim().to_lowercase();
    [variant.option(axis), selection.get(axis)]
        .into_iter()
        .flatten()
        .any(|value| value.trim().to_lowercase() == wanted)
}

/// Bonus rule configuration, normally read from the modal root's data attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BonusConfig {
    pub enabled: bool,
    pub source: Option<BonusSource>,
    pub quantity: BonusQuantity,
    pub trigger: BundleTrigger,
    pub strategy: BundleStrategy,
}

impl BonusConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn by_handle(handle: ProductHandle) -> Self {
        Self {
            enabled: true,
            source: Some(BonusSource::Handle(handle)),
            ..Self::default()
        }
    }

    pub fn by_variant(id: VariantId) -> Self {
        Self {
            enabled: true,
            source: Some(BonusSource::Variant(id)),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, quantity: BonusQuantity) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_strategy(mut self, strategy: BundleStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_trigger(mut self, trigger: BundleTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Enabled and pointing somewhere.
    pub fn is_active(&self) -> bool {
        self.enabled && self.source.is_some()
    }
}

/// What happened to the bonus line. Never an error: the primary add decides
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BonusOutcome {
    /// Rule disabled, unconfigured, or the selection didn't match the trigger.
    NotTriggered,
    Added { id: VariantId, quantity: Quantity },
    /// Attempted and failed; swallowed.
    Failed { reason: String },
}

impl BonusOutcome {
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Self::NotTriggered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(opts: &[&str]) -> Variant {
        Variant {
            id: VariantId::new(1),
            title: opts.join(" / "),
            price: 100,
            available: true,
            options: opts.iter().map(|s| s.to_string()).collect(),
        }
    }

    const AXES: AxisMap = AxisMap {
        color: Some(0),
        size: Some(1),
    };

    #[test]
    fn black_medium_triggers_case_insensitively() {
        let trigger = BundleTrigger::default();
        let v = variant(&["BLACK", "medium"]);
        assert!(trigger.is_met(&v, AXES, &Selection::new()));
    }

    #[test]
    fn red_medium_does_not_trigger() {
        let trigger = BundleTrigger::default();
        let v = variant(&["Red", "Medium"]);
        let sel = Selection::from_variant(&v);
        assert!(!trigger.is_met(&v, AXES, &sel));
    }

    #[test]
    fn selection_value_counts_even_if_variant_fell_back() {
        // Shopper picked Black/Medium but the resolved variant is a fallback.
        let trigger = BundleTrigger::default();
        let v = variant(&["Red", "Small"]);
        let sel = Selection::new().with(0, "Black").with(1, "Medium");
        assert!(trigger.is_met(&v, AXES, &sel));
    }

    #[test]
    fn missing_axis_never_triggers() {
        let trigger = BundleTrigger::default();
        let v = variant(&["Black"]);
        let axes = AxisMap {
            color: Some(0),
            size: None,
        };
        assert!(!trigger.is_met(&v, axes, &Selection::from_variant(&v)));
    }

    #[test]
    fn custom_trigger_values() {
        let trigger = BundleTrigger {
            color: "Navy".to_string(),
            size: "XL".to_string(),
        };
        assert!(trigger.is_met(&variant(&["navy", "xl"]), AXES, &Selection::new()));
        assert!(!trigger.is_met(&variant(&["Black", "Medium"]), AXES, &Selection::new()));
    }

    #[test]
    fn bonus_quantity_resolution() {
        let three = Quantity::new(3).unwrap();
        assert_eq!(BonusQuantity::default().resolve(three), Quantity::ONE);
        assert_eq!(BonusQuantity::MatchPrimary.resolve(three), three);
    }

    #[test]
    fn activity_requires_flag_and_source() {
        assert!(!BonusConfig::disabled().is_active());
        assert!(BonusConfig::by_variant(VariantId::new(5)).is_active());
        let mut cfg = BonusConfig::by_variant(VariantId::new(5));
        cfg.enabled = false;
        assert!(!cfg.is_active());
    }
}

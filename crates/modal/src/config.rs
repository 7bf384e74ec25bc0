//! Modal configuration.
//!
//! On a page this comes from data attributes on the modal root (and the money
//! format from the document element); the CLI reads the same keys from the
//! environment. Keys are matched loosely: `data-bonus-handle`, `bonusHandle`
//! and `BONUS_HANDLE` are the same key.

use std::time::Duration;

use quickbuy_core::{MoneyFormat, ProductHandle, Quantity, VariantId};
use quickbuy_storefront::{BonusConfig, BonusQuantity, BonusSource, BundleStrategy, BundleTrigger};

pub const MIN_CLOSE_DELAY: Duration = Duration::from_millis(400);
pub const MAX_CLOSE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfig {
    pub money_format: MoneyFormat,
    /// Delay between a successful add and the automatic close.
    pub close_delay: Duration,
    pub bonus: BonusConfig,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            money_format: MoneyFormat::default(),
            close_delay: MIN_CLOSE_DELAY,
            bonus: BonusConfig::disabled(),
        }
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.trim();
    let key = key.strip_prefix("data-").unwrap_or(key);
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl ModalConfig {
    /// Build from data attributes. Invalid values keep their defaults.
    pub fn from_dataset<I, K, V>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::parse(attrs, true)
    }

    /// Build from process environment (`BONUS_HANDLE`, `MONEY_FORMAT`, ...).
    pub fn from_env() -> Self {
        Self::parse(std::env::vars(), false)
    }

    fn parse<I, K, V>(attrs: I, report_unknown: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        let mut enabled: Option<bool> = None;
        let mut handle: Option<ProductHandle> = None;
        let mut variant: Option<VariantId> = None;

        for (key, value) in attrs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match normalize_key(key).as_str() {
                "bonusenabled" => enabled = Some(value == "true"),
                "bonushandle" if !value.is_empty() => match value.parse() {
                    Ok(h) => handle = Some(h),
                    Err(err) => tracing::warn!(key, %err, "ignoring bonus handle"),
                },
                "bonusvariantid" | "jacketvariantid" if !value.is_empty() => match value.parse() {
                    Ok(id) => variant = Some(id),
                    Err(err) => tracing::warn!(key, %err, "ignoring bonus variant id"),
                },
                "bonusquantity" => match value {
                    "match" | "match-primary" => config.bonus.quantity = BonusQuantity::MatchPrimary,
                    n => match n.parse::<u32>().map_err(|e| e.to_string()).and_then(|n| {
                        Quantity::new(n).map_err(|e| e.to_string())
                    }) {
                        Ok(q) => config.bonus.quantity = BonusQuantity::Fixed(q),
                        Err(err) => tracing::warn!(key, %err, "ignoring bonus quantity"),
                    },
                },
                "bonusstrategy" => match value {
                    "batched" => config.bonus.strategy = BundleStrategy::Batched,
                    "sequential" => config.bonus.strategy = BundleStrategy::Sequential,
                    other => tracing::warn!(key, value = other, "ignoring bonus strategy"),
                },
                "bonuscolor" if !value.is_empty() => config.bonus.trigger.color = value.to_string(),
                "bonussize" if !value.is_empty() => config.bonus.trigger.size = value.to_string(),
                "closedelayms" => match value.parse::<u64>() {
                    Ok(ms) => {
                        config.close_delay =
                            Duration::from_millis(ms).clamp(MIN_CLOSE_DELAY, MAX_CLOSE_DELAY)
                    }
                    Err(err) => tracing::warn!(key, %err, "ignoring close delay"),
                },
                "moneyformat" if !value.is_empty() => config.money_format = MoneyFormat::new(value),
                other if report_unknown => tracing::debug!(key = other, "unused modal attribute"),
                _ => {}
            }
        }

        // A bare variant id (the grid markup) enables the rule on its own.
        config.bonus.enabled = enabled.unwrap_or(variant.is_some());
        config.bonus.source = variant
            .map(BonusSource::Variant)
            .or(handle.map(BonusSource::Handle));
        config
    }

    pub fn with_bonus(mut self, bonus: BonusConfig) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_trigger(mut self, trigger: BundleTrigger) -> Self {
        self.bonus.trigger = trigger;
        self
    }
}

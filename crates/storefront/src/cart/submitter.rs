use thiserror::Error;

use quickbuy_catalog::{AxisMap, Selection, Variant};
use quickbuy_core::{Quantity, VariantId};

use crate::api::StorefrontApi;
use crate::cart::bonus::{BonusConfig, BonusOutcome, BonusSource, BundleStrategy};
use crate::cart::line::{CartAddRequest, CartAddResponse, CartLineItem};
use crate::error::StorefrontError;

/// Message shown when the cart endpoint gave no description.
pub const DEFAULT_ADD_FAILURE: &str = "Could not add to cart.";

/// The primary add failed; nothing was confirmed to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("primary add failed: {0}")]
    Primary(#[source] StorefrontError),
}

impl CartError {
    /// Text for the shopper-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Primary(err) => err
                .description()
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_ADD_FAILURE.to_string()),
        }
    }
}

/// What the shopper is adding.
#[derive(Debug, Clone, Copy)]
pub struct PrimaryItem<'a> {
    pub variant: &'a Variant,
    pub quantity: Quantity,
    /// Where color/size live on the variant's product; used by the bonus trigger.
    pub axes: AxisMap,
    pub selection: &'a Selection,
}

impl PrimaryItem<'_> {
    pub fn line(&self) -> CartLineItem {
        CartLineItem::new(self.variant.id, self.quantity)
    }
}

/// Result of a successful primary add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSubmission {
    pub primary: CartAddResponse,
    pub bonus: BonusOutcome,
}

/// Posts the shopper's line and, when the bundle rule fires, the bonus line.
#[derive(Debug, Clone, Default)]
pub struct CartSubmitter {
    bonus: BonusConfig,
}

impl CartSubmitter {
    pub fn new(bonus: BonusConfig) -> Self {
        Self { bonus }
    }

    pub fn bonus_config(&self) -> &BonusConfig {
        &self.bonus
    }

    pub fn bonus_triggered(&self, item: &PrimaryItem<'_>) -> bool {
        self.bonus.is_active()
            && self
                .bonus
                .trigger
                .is_met(item.variant, item.axes, item.selection)
    }

    /// Add `item` to the cart.
    ///
    /// Only a primary failure is an error. Calls are sequential: the bonus
    /// lookup/add (if any) starts after the primary add resolved. A rejected
    /// batch is followed by the primary line on its own.
    pub async fn submit<S>(&self, api: &S, item: PrimaryItem<'_>) -> Result<CartSubmission, CartError>
    where
        S: StorefrontApi + ?Sized,
    {
        let primary_line = item.line();

        if !self.bonus_triggered(&item) {
            let primary = self.add_primary(api, primary_line).await?;
            return Ok(CartSubmission {
                primary,
                bonus: BonusOutcome::NotTriggered,
            });
        }

        match self.bonus.strategy {
            BundleStrategy::Sequential => {
                let primary = self.add_primary(api, primary_line).await?;
                let bonus = match self.add_bonus(api, item.quantity).await {
                    Ok(line) => BonusOutcome::Added {
                        id: line.id,
                        quantity: line.quantity,
                    },
                    Err(err) => Self::swallow(err),
                };
                Ok(CartSubmission { primary, bonus })
            }
            BundleStrategy::Batched => {
                let bonus_line = match self.resolve_bonus_line(api, item.quantity).await {
                    Ok(line) => line,
                    Err(err) => {
                        // Lookup failed: the primary still goes in on its own.
                        let bonus = Self::swallow(err);
                        let primary = self.add_primary(api, primary_line).await?;
                        return Ok(CartSubmission { primary, bonus });
                    }
                };

                let request = CartAddRequest::batch(vec![primary_line, bonus_line]);
                match api.add_to_cart(&request).await {
                    Ok(primary) => {
                        tracing::info!(variant = %primary_line.id, bonus = %bonus_line.id, "added line with bonus in one batch");
                        Ok(CartSubmission {
                            primary,
                            bonus: BonusOutcome::Added {
                                id: bonus_line.id,
                                quantity: bonus_line.quantity,
                            },
                        })
                    }
                    Err(err) => {
                        // A batch is taken whole or not at all. Post the primary alone.
                        let bonus = Self::swallow(err);
                        let primary = self.add_primary(api, primary_line).await?;
                        Ok(CartSubmission { primary, bonus })
                    }
                }
            }
        }
    }

    async fn add_primary<S>(&self, api: &S, line: CartLineItem) -> Result<CartAddResponse, CartError>
    where
        S: StorefrontApi + ?Sized,
    {
        match api.add_to_cart(&CartAddRequest::single(line)).await {
            Ok(resp) => {
                tracing::info!(variant = %line.id, quantity = %line.quantity, "added line to cart");
                Ok(resp)
            }
            Err(err) => {
                tracing::error!(error = %err, variant = %line.id, "cart add failed");
                Err(CartError::Primary(err))
            }
        }
    }

    async fn add_bonus<S>(&self, api: &S, primary_quantity: Quantity) -> Result<CartLineItem, StorefrontError>
    where
        S: StorefrontApi + ?Sized,
    {
        let line = self.resolve_bonus_line(api, primary_quantity).await?;
        api.add_to_cart(&CartAddRequest::single(line)).await?;
        tracing::info!(variant = %line.id, quantity = %line.quantity, "added bonus line");
        Ok(line)
    }

    async fn resolve_bonus_line<S>(
        &self,
        api: &S,
        primary_quantity: Quantity,
    ) -> Result<CartLineItem, StorefrontError>
    where
        S: StorefrontApi + ?Sized,
    {
        let id: VariantId = match &self.bonus.source {
            Some(BonusSource::Variant(id)) => *id,
            Some(BonusSource::Handle(handle)) => {
                let product = api.fetch_product(handle).await?;
                product
                    .default_variant()
                    .map(|v| v.id)
                    .ok_or_else(|| StorefrontError::data(format!("bonus product {handle} has no variants")))?
            }
            None => return Err(StorefrontError::data("no bonus configured")),
        };
        Ok(CartLineItem::new(id, self.bonus.quantity.resolve(primary_quantity)))
    }

    fn swallow(err: StorefrontError) -> BonusOutcome {
        tracing::warn!(error = %err, "bonus item not added");
        BonusOutcome::Failed {
            reason: err.to_string(),
        }
    }
}

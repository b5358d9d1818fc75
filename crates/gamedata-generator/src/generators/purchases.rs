//! In-app purchase generator.

use crate::context::RandomContext;
use crate::error::GeneratorError;
use gamedata_core::{CampaignWindow, ConfigError, ProductCategory, Purchase, Vocabulary};
use tracing::debug;
use uuid::Uuid;

/// Inclusive bounds of a purchase amount before rounding.
pub const AMOUNT_RANGE: (f64, f64) = (0.99, 99.99);
/// Inclusive range of the numeric part of `product_id`.
pub const PRODUCT_ID_RANGE: (i32, i32) = (1000, 9999);
/// Inclusive range of the pack index in `product_name`.
pub const PACK_INDEX_RANGE: (i32, i32) = (1, 10);

/// Generate `count` purchases referencing players drawn with replacement
/// from `player_universe`.
pub fn generate_purchases(
    ctx: &mut RandomContext,
    count: usize,
    window: &CampaignWindow,
    vocabulary: &Vocabulary,
    player_universe: &[Uuid],
) -> Result<Vec<Purchase>, GeneratorError> {
    if count > 0 && player_universe.is_empty() {
        return Err(ConfigError::EmptyPlayerUniverse("purchases").into());
    }

    let mut purchases = Vec::with_capacity(count);
    for _ in 0..count {
        let product_category = *ctx.choose(&ProductCategory::ALL)?;
        let transaction_id = ctx.uuid();
        let player_id = *ctx.choose(player_universe)?;
        let purchase_timestamp = ctx.uniform_datetime(window.start(), window.end())?;
        let product_id = format!(
            "PROD_{}",
            ctx.uniform_int(PRODUCT_ID_RANGE.0, PRODUCT_ID_RANGE.1)?
        );
        let pack = ctx.uniform_int(PACK_INDEX_RANGE.0, PACK_INDEX_RANGE.1)?;
        let product_name = product_category.product_name(pack);
        let amount = ctx.uniform_amount(AMOUNT_RANGE.0, AMOUNT_RANGE.1)?;
        let currency = ctx.choose(&vocabulary.currencies)?.clone();
        let payment_method = ctx.choose(&vocabulary.payment_methods)?.clone();
        let platform = ctx.choose(&vocabulary.platforms)?.clone();
        let country = ctx.choose(&vocabulary.countries)?.clone();
        let session_id = ctx.uuid();

        purchases.push(Purchase {
            transaction_id,
            player_id,
            purchase_timestamp,
            product_id,
            product_name,
            product_category,
            amount,
            currency,
            payment_method,
            platform,
            country,
            session_id,
        });
    }

    debug!("Generated {} purchases", purchases.len());
    Ok(purchases)
}

//! Rank-based discount schedule applied to the items of a single rental.
//!
//! The multiplier depends on the item's 1-indexed position in the request, never on its
//! price. Callers decide which title gets which rank by the order they submit them.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::Item;

/// Fraction of the unit price charged for ranks 1 through 5. Ranks past the end of the
/// table are free.
pub const RANK_DISCOUNT_SCHEDULE: [Decimal; 5] =
    [dec!(1.00), dec!(1.00), dec!(0.75), dec!(0.50), dec!(0.25)];

/// Currency precision of the final total.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Multiplier for a 1-indexed rank. Rank 0 is treated as rank 1.
pub fn rank_multiplier(rank: usize) -> Decimal {
    let index = rank.saturating_sub(1);
    RANK_DISCOUNT_SCHEDULE
        .get(index)
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// One priced line of a quote, kept so totals can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub rank: usize,
    pub item: String,
    pub unit_price: Decimal,
    pub multiplier: Decimal,
    pub charged: Decimal,
}

/// Result of a pricing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

/// Stateless pricing policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingPolicy;

impl PricingPolicy {
    pub fn quote(&self, items: &[Item]) -> PriceQuote {
        let lines: Vec<PricedLine> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let rank = index + 1;
                let multiplier = rank_multiplier(rank);
                PricedLine {
                    rank,
                    item: item.name.clone(),
                    unit_price: item.unit_price,
                    multiplier,
                    charged: item.unit_price * multiplier,
                }
            })
            .collect();

        // Lines stay unrounded; only the sum is brought to currency precision.
        let total = lines
            .iter()
            .map(|line| line.charged)
            .sum::<Decimal>()
            .round_dp_with_strategy(
                CURRENCY_DECIMAL_PLACES,
                RoundingStrategy::MidpointAwayFromZero,
            );

        PriceQuote { lines, total }
    }

    /// Total charge for `items`. An empty slice prices to zero.
    pub fn compute_total(&self, items: &[Item]) -> Decimal {
        self.quote(items).total
    }
}

//! Round-trip opportunity search
//!
//! For one reserve snapshot and a fixed base-asset trade amount, evaluates
//! every ordered pair of distinct exchanges: buy quote asset on the first,
//! sell the proceeds on the second, and report the round trips whose
//! base-asset return beats the profit threshold.
//!
//! Buy legs are ranked descending by quote output and sell legs descending
//! by base output. For a fixed input amount a larger output strictly
//! dominates downstream profit, so the top-ranked sell leg for each buy leg
//! is already the best one and the rest can be skipped.

use crate::{
    data::ReserveSnapshot,
    pricing::{swap_base_for_quote, swap_quote_for_base},
    utils::{wei_to_units, wei_to_units_signed},
    Result, ScannerError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Amounts of one swap leg, for audit: what went in and what came out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegQuote {
    /// Amount paid in, in wei of the leg's input asset
    pub amount_in: u128,
    /// Amount received, in wei of the leg's output asset
    pub amount_out: u128,
}

/// A profitable round trip detected in one evaluation round.
///
/// Immutable once constructed; `profit` always equals
/// `sell_quote.amount_out - buy_quote.amount_in` and always exceeds the
/// threshold the search was configured with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Block the snapshot was taken at, for downstream correlation
    pub block_number: u64,
    /// Round-trip profit in wei of base asset
    pub profit: i128,
    /// Exchange to buy quote asset on
    pub buy_exchange: String,
    /// Exchange to sell the quote asset back on
    pub sell_exchange: String,
    /// Marginal price of base in quote terms after the buy leg
    pub buy_price: f64,
    /// Buy leg amounts: base in, quote out
    pub buy_quote: LegQuote,
    /// Marginal price of quote in base terms after the sell leg
    pub sell_price: f64,
    /// Sell leg amounts: quote in, base out
    pub sell_quote: LegQuote,
    /// When the opportunity was detected
    pub detected_at: chrono::DateTime<chrono::Utc>,
}

impl fmt::Display for ArbitrageOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} -> {} via {}/{}: +{} (block {})",
            wei_to_units(self.buy_quote.amount_in),
            wei_to_units(self.buy_quote.amount_out),
            wei_to_units(self.sell_quote.amount_out),
            self.buy_exchange,
            self.sell_exchange,
            wei_to_units_signed(self.profit),
            self.block_number
        )
    }
}

/// Buy leg evaluated for one exchange
#[derive(Debug, Clone)]
struct BuyQuote {
    exchange: String,
    buy_price: f64,
    quote_out: u128,
}

/// Sell leg evaluated for one (buy, sell) exchange pair
#[derive(Debug, Clone)]
struct SaleQuote {
    exchange: String,
    sell_price: f64,
    base_out: u128,
}

/// Round-trip arbitrage search over one reserve snapshot.
///
/// Pure and synchronous: one call to [`find_opportunities`] consumes one
/// immutable snapshot and produces one immutable result list, with no state
/// carried between rounds.
///
/// [`find_opportunities`]: OpportunitySearch::find_opportunities
#[derive(Debug, Clone, Copy)]
pub struct OpportunitySearch {
    trade_amount: u128,
    profit_threshold: i128,
}

impl OpportunitySearch {
    /// Create a search for a fixed trade amount and profit threshold, both
    /// in wei of base asset. The trade amount must be positive.
    pub fn new(trade_amount: u128, profit_threshold: i128) -> Result<Self, ScannerError> {
        if trade_amount == 0 {
            return Err(ScannerError::Config(
                "Trade amount must be positive".to_string(),
            ));
        }
        Ok(Self {
            trade_amount,
            profit_threshold,
        })
    }

    /// Fixed base-asset amount spent on every buy leg, in wei
    pub fn trade_amount(&self) -> u128 {
        self.trade_amount
    }

    /// Minimum profit in wei a round trip must strictly exceed to be reported
    pub fn profit_threshold(&self) -> i128 {
        self.profit_threshold
    }

    /// Find every qualifying round trip in the snapshot.
    ///
    /// Returns at most one opportunity per buy exchange (the best available
    /// for that buy leg), sorted descending by profit. Exchanges without
    /// liquidity are skipped for the round; they never abort it.
    pub fn find_opportunities(
        &self,
        snapshot: &ReserveSnapshot,
        block_number: u64,
    ) -> Vec<ArbitrageOpportunity> {
        let mut buys = self.evaluate_buy_legs(snapshot);
        // Best buy legs first: more quote out means more base back downstream
        buys.sort_by(|a, b| b.quote_out.cmp(&a.quote_out));

        let mut opportunities = Vec::new();
        for buy in &buys {
            let mut sales = self.evaluate_sell_legs(snapshot, buy);
            sales.sort_by(|a, b| b.base_out.cmp(&a.base_out));

            // The top-ranked sell leg is the best this buy leg can do; if it
            // does not clear the threshold, none of the others will.
            let Some(sale) = sales.first() else {
                continue;
            };
            let profit = sale.base_out as i128 - self.trade_amount as i128;
            if profit > self.profit_threshold {
                opportunities.push(ArbitrageOpportunity {
                    block_number,
                    profit,
                    buy_exchange: buy.exchange.clone(),
                    sell_exchange: sale.exchange.clone(),
                    buy_price: buy.buy_price,
                    buy_quote: LegQuote {
                        amount_in: self.trade_amount,
                        amount_out: buy.quote_out,
                    },
                    sell_price: sale.sell_price,
                    sell_quote: LegQuote {
                        amount_in: buy.quote_out,
                        amount_out: sale.base_out,
                    },
                    detected_at: chrono::Utc::now(),
                });
            }
        }

        opportunities.sort_by(|a, b| b.profit.cmp(&a.profit));
        opportunities
    }

    /// Spend the trade amount on every exchange, skipping illiquid pools
    fn evaluate_buy_legs(&self, snapshot: &ReserveSnapshot) -> Vec<BuyQuote> {
        let mut buys = Vec::with_capacity(snapshot.len());
        for (exchange, reserves) in snapshot.iter() {
            match swap_base_for_quote(reserves.base, reserves.quote, self.trade_amount) {
                Ok(swap) => {
                    debug!(
                        exchange,
                        quote_out = %wei_to_units(swap.amount_out),
                        buy_price = swap.price,
                        "evaluated buy leg"
                    );
                    buys.push(BuyQuote {
                        exchange: exchange.to_string(),
                        buy_price: swap.price,
                        quote_out: swap.amount_out,
                    });
                }
                Err(e) => {
                    warn!(exchange, error = %e, "excluding exchange from this round");
                }
            }
        }
        buys
    }

    /// Sell a buy leg's quote output on every other exchange
    fn evaluate_sell_legs(&self, snapshot: &ReserveSnapshot, buy: &BuyQuote) -> Vec<SaleQuote> {
        let mut sales = Vec::with_capacity(snapshot.len().saturating_sub(1));
        for (exchange, reserves) in snapshot.iter() {
            if exchange == buy.exchange {
                continue;
            }
            match swap_quote_for_base(reserves.quote, reserves.base, buy.quote_out) {
                Ok(swap) => sales.push(SaleQuote {
                    exchange: exchange.to_string(),
                    sell_price: swap.price,
                    base_out: swap.amount_out,
                }),
                // Already warned about in the buy pass
                Err(e) => debug!(exchange, error = %e, "sell leg unavailable"),
            }
        }
        sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReservePair;
    use crate::WEI_PER_UNIT;

    fn four_pool_snapshot() -> ReserveSnapshot {
        let mut snapshot = ReserveSnapshot::new();
        snapshot.insert("uniswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
        snapshot.insert("sushiswap", ReservePair::new(3 * WEI_PER_UNIT, 50 * WEI_PER_UNIT));
        snapshot.insert("shebaswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
        snapshot.insert("croswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
        snapshot
    }

    fn search(trade_amount: u128, threshold: i128) -> OpportunitySearch {
        OpportunitySearch::new(trade_amount, threshold).unwrap()
    }

    /// Exhaustive O(n^2) search used to validate the sorted early-exit one
    fn brute_force_best_sale(
        snapshot: &ReserveSnapshot,
        buy_exchange: &str,
        quote_in: u128,
    ) -> Option<(String, u128)> {
        let mut best: Option<(String, u128)> = None;
        for (exchange, reserves) in snapshot.iter() {
            if exchange == buy_exchange {
                continue;
            }
            if let Ok(swap) = swap_quote_for_base(reserves.quote, reserves.base, quote_in) {
                if best.as_ref().map_or(true, |(_, out)| swap.amount_out > *out) {
                    best = Some((exchange.to_string(), swap.amount_out));
                }
            }
        }
        best
    }

    #[test]
    fn test_zero_trade_amount_rejected() {
        assert!(matches!(
            OpportunitySearch::new(0, 0),
            Err(ScannerError::Config(_))
        ));
    }

    #[test]
    fn test_reference_scenario_finds_three_opportunities() {
        // uniswap/shebaswap/croswap hold 100 quote per base, sushiswap is the
        // cheap place to buy base back. Trade 0.0001 base, threshold 1e-7.
        let snapshot = four_pool_snapshot();
        let search = search(WEI_PER_UNIT / 10_000, (WEI_PER_UNIT / 10_000_000) as i128);

        let opportunities = search.find_opportunities(&snapshot, 0);

        assert_eq!(opportunities.len(), 3);
        for opp in &opportunities {
            assert_eq!(opp.sell_exchange, "sushiswap");
            // Each route nets about 0.0005 base
            let profit_units = opp.profit as f64 / WEI_PER_UNIT as f64;
            assert!((profit_units - 0.0005).abs() < 1e-6, "profit {}", profit_units);
        }
        let buyers: Vec<&str> = opportunities.iter().map(|o| o.buy_exchange.as_str()).collect();
        assert!(buyers.contains(&"uniswap"));
        assert!(buyers.contains(&"shebaswap"));
        assert!(buyers.contains(&"croswap"));
    }

    #[test]
    fn test_profit_invariant_and_ordering() {
        let snapshot = four_pool_snapshot();
        let search = search(WEI_PER_UNIT / 10_000, 0);

        let opportunities = search.find_opportunities(&snapshot, 42);

        for opp in &opportunities {
            assert_eq!(opp.block_number, 42);
            assert_eq!(
                opp.profit,
                opp.sell_quote.amount_out as i128 - opp.buy_quote.amount_in as i128
            );
            assert_eq!(opp.buy_quote.amount_out, opp.sell_quote.amount_in);
            assert_ne!(opp.buy_exchange, opp.sell_exchange);
        }
        for pair in opportunities.windows(2) {
            assert!(pair[0].profit >= pair[1].profit);
        }
    }

    #[test]
    fn test_selected_sell_leg_matches_brute_force() {
        let mut snapshot = four_pool_snapshot();
        snapshot.insert("fourswap", ReservePair::new(2 * WEI_PER_UNIT, 190 * WEI_PER_UNIT));
        let trade_amount = WEI_PER_UNIT / 10_000;
        let search = search(trade_amount, i128::MIN + 1);

        let opportunities = search.find_opportunities(&snapshot, 0);

        // Threshold is effectively -inf, so every buy exchange emits exactly
        // one opportunity and it must be the argmax sell leg.
        assert_eq!(opportunities.len(), snapshot.len());
        for opp in &opportunities {
            let (best_exchange, best_out) =
                brute_force_best_sale(&snapshot, &opp.buy_exchange, opp.buy_quote.amount_out)
                    .unwrap();
            assert_eq!(opp.sell_quote.amount_out, best_out);
            assert_eq!(opp.sell_exchange, best_exchange);
        }
    }

    #[test]
    fn test_identical_reserves_never_profit() {
        let mut snapshot = ReserveSnapshot::new();
        snapshot.insert("a", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
        snapshot.insert("b", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));

        for trade in [1u128, 1_000, WEI_PER_UNIT / 10_000, WEI_PER_UNIT / 10] {
            let search = search(trade, 0);
            assert!(
                search.find_opportunities(&snapshot, 0).is_empty(),
                "identical pools must not arb at trade {}",
                trade
            );
        }
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        let snapshot = four_pool_snapshot();
        let trade_amount = WEI_PER_UNIT / 10_000;

        // Find the actual best profit, then use it as the threshold: the
        // equal-profit round trip must disappear from the output.
        let probe = search(trade_amount, i128::MIN + 1);
        let best = probe.find_opportunities(&snapshot, 0)[0].profit;

        let at_boundary = search(trade_amount, best);
        assert!(at_boundary
            .find_opportunities(&snapshot, 0)
            .iter()
            .all(|o| o.profit > best));

        let below_boundary = search(trade_amount, best - 1);
        assert!(below_boundary
            .find_opportunities(&snapshot, 0)
            .iter()
            .any(|o| o.profit == best));
    }

    #[test]
    fn test_illiquid_exchange_is_skipped_not_fatal() {
        let mut snapshot = four_pool_snapshot();
        snapshot.insert("emptyswap", ReservePair::new(0, 100 * WEI_PER_UNIT));
        let search = search(WEI_PER_UNIT / 10_000, (WEI_PER_UNIT / 10_000_000) as i128);

        let opportunities = search.find_opportunities(&snapshot, 0);

        assert_eq!(opportunities.len(), 3);
        for opp in &opportunities {
            assert_ne!(opp.buy_exchange, "emptyswap");
            assert_ne!(opp.sell_exchange, "emptyswap");
        }
    }

    #[test]
    fn test_single_exchange_yields_nothing() {
        let mut snapshot = ReserveSnapshot::new();
        snapshot.insert("uniswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
        let search = search(WEI_PER_UNIT / 10_000, 0);

        assert!(search.find_opportunities(&snapshot, 0).is_empty());
    }

    #[test]
    fn test_empty_snapshot_yields_nothing() {
        let search = search(WEI_PER_UNIT, 0);
        assert!(search.find_opportunities(&ReserveSnapshot::new(), 0).is_empty());
    }
}

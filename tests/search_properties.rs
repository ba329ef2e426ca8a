//! Search properties exercised through the public API

use amm_arbitrage_scanner::{
    data::{ReservePair, ReserveSnapshot},
    pricing,
    strategy::OpportunitySearch,
    WEI_PER_UNIT,
};

fn reference_snapshot() -> ReserveSnapshot {
    let mut snapshot = ReserveSnapshot::new();
    snapshot.insert("uniswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
    snapshot.insert("sushiswap", ReservePair::new(3 * WEI_PER_UNIT, 50 * WEI_PER_UNIT));
    snapshot.insert("shebaswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
    snapshot.insert("croswap", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
    snapshot
}

#[test]
fn reference_scenario_reports_three_routes_into_the_cheap_pool() {
    let search = OpportunitySearch::new(
        WEI_PER_UNIT / 10_000,           // 0.0001 base
        (WEI_PER_UNIT / 10_000_000) as i128, // 1e-7 base
    )
    .unwrap();

    let opportunities = search.find_opportunities(&reference_snapshot(), 1234);

    assert_eq!(opportunities.len(), 3);
    for opp in &opportunities {
        assert_eq!(opp.sell_exchange, "sushiswap");
        assert_eq!(opp.block_number, 1234);
        let profit_units = opp.profit as f64 / WEI_PER_UNIT as f64;
        assert!(
            (profit_units - 0.0005).abs() < 1e-6,
            "unexpected profit {}",
            profit_units
        );
    }
}

#[test]
fn output_is_sorted_descending_by_profit() {
    // Pools with progressively better quote prices, so profits differ
    let mut snapshot = ReserveSnapshot::new();
    snapshot.insert("a", ReservePair::new(WEI_PER_UNIT, 90 * WEI_PER_UNIT));
    snapshot.insert("b", ReservePair::new(WEI_PER_UNIT, 100 * WEI_PER_UNIT));
    snapshot.insert("c", ReservePair::new(WEI_PER_UNIT, 110 * WEI_PER_UNIT));
    snapshot.insert("cheap", ReservePair::new(10 * WEI_PER_UNIT, 100 * WEI_PER_UNIT));

    let search = OpportunitySearch::new(WEI_PER_UNIT / 10_000, 0).unwrap();
    let opportunities = search.find_opportunities(&snapshot, 0);

    assert!(opportunities.len() >= 2);
    for pair in opportunities.windows(2) {
        assert!(pair[0].profit >= pair[1].profit);
    }
    // The best buy leg is the pool quoting the most quote asset per base
    assert_eq!(opportunities[0].buy_exchange, "c");
}

#[test]
fn early_exit_selection_matches_exhaustive_search() {
    let mut snapshot = reference_snapshot();
    snapshot.insert("fifthswap", ReservePair::new(5 * WEI_PER_UNIT, 400 * WEI_PER_UNIT));
    snapshot.insert("sixthswap", ReservePair::new(2 * WEI_PER_UNIT, 210 * WEI_PER_UNIT));

    let trade_amount = WEI_PER_UNIT / 10_000;
    let search = OpportunitySearch::new(trade_amount, i128::MIN + 1).unwrap();
    let opportunities = search.find_opportunities(&snapshot, 0);

    // Threshold is effectively unbounded below: one opportunity per exchange
    assert_eq!(opportunities.len(), snapshot.len());

    for opp in &opportunities {
        // Recompute the argmax sell leg by brute force
        let mut best: Option<(&str, u128)> = None;
        for (exchange, reserves) in snapshot.iter() {
            if exchange == opp.buy_exchange {
                continue;
            }
            let swap = pricing::swap_quote_for_base(
                reserves.quote,
                reserves.base,
                opp.buy_quote.amount_out,
            )
            .unwrap();
            if best.map_or(true, |(_, out)| swap.amount_out > out) {
                best = Some((exchange, swap.amount_out));
            }
        }
        let (best_exchange, best_out) = best.unwrap();
        assert_eq!(opp.sell_exchange, best_exchange);
        assert_eq!(opp.sell_quote.amount_out, best_out);
        assert_eq!(opp.profit, best_out as i128 - trade_amount as i128);
    }
}

#[test]
fn identical_pools_never_report_profit() {
    let mut snapshot = ReserveSnapshot::new();
    for name in ["a", "b", "c"] {
        snapshot.insert(name, ReservePair::new(7 * WEI_PER_UNIT, 950 * WEI_PER_UNIT));
    }

    for trade in [1u128, WEI_PER_UNIT / 1_000_000, WEI_PER_UNIT / 100, WEI_PER_UNIT] {
        let search = OpportunitySearch::new(trade, 0).unwrap();
        assert!(
            search.find_opportunities(&snapshot, 0).is_empty(),
            "trade {} reported profit on identical pools",
            trade
        );
    }
}

#[test]
fn zero_reserve_pool_is_excluded_without_aborting_the_round() {
    let mut snapshot = reference_snapshot();
    snapshot.insert("drained", ReservePair::new(0, 0));

    let search = OpportunitySearch::new(
        WEI_PER_UNIT / 10_000,
        (WEI_PER_UNIT / 10_000_000) as i128,
    )
    .unwrap();
    let opportunities = search.find_opportunities(&snapshot, 0);

    assert_eq!(opportunities.len(), 3);
    assert!(opportunities
        .iter()
        .all(|o| o.buy_exchange != "drained" && o.sell_exchange != "drained"));
}

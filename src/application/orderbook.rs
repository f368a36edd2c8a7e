//! Order book reconstruction from cumulative depth histograms.
//!
//! Marketplaces publish depth as "quantity available at or better than this
//! price". Discrete levels fall out as the difference between successive
//! cumulative values. Source data is not trusted: a cumulative value that
//! goes backwards clamps to zero instead of producing a negative level.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::currency::CurrencyConverter;
use crate::domain::book::total_quantity;
use crate::domain::money::{MinorUnits, Quantity};
use crate::domain::{BookSide, CanonicalItem, GraphRow, OrderGraph, OrderLevel};
use crate::error::ConversionError;

/// Data-quality counters gathered while reading a histogram.
///
/// Never an error: the caller decides whether to log them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphAnomalies {
    /// Rows whose cumulative value was below the running total.
    pub clamped: usize,
    /// Rows that could not be parsed and were skipped.
    pub malformed: usize,
    /// Levels dropped because their price broke the side's ordering.
    pub out_of_order: usize,
}

impl GraphAnomalies {
    /// True when the histogram was fully well formed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.clamped == 0 && self.malformed == 0 && self.out_of_order == 0
    }

    fn absorb(&mut self, other: Self) {
        self.clamped += other.clamped;
        self.malformed += other.malformed;
        self.out_of_order += other.out_of_order;
    }
}

/// Levels reconstructed from one side of a histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// One level per well-formed row, in input order.
    pub levels: Vec<OrderLevel>,
    pub anomalies: GraphAnomalies,
}

/// Convert cumulative `(price, quantity)` rows into discrete levels.
///
/// Output order mirrors input order. Empty input yields an empty result.
#[must_use]
pub fn reconstruct(graph: &[GraphRow]) -> Vec<OrderLevel> {
    reconstruct_with_report(graph).levels
}

/// Like [`reconstruct`], also reporting data-quality anomalies.
#[must_use]
pub fn reconstruct_with_report(graph: &[GraphRow]) -> Reconstruction {
    let mut out = Reconstruction {
        levels: Vec::with_capacity(graph.len()),
        anomalies: GraphAnomalies::default(),
    };
    let mut running_total: Quantity = 0;

    for row in graph {
        let Some((price, cumulative)) = parse_row(row) else {
            out.anomalies.malformed += 1;
            continue;
        };

        let delta = cumulative.saturating_sub(running_total);
        if delta < 0 {
            out.anomalies.clamped += 1;
        }
        out.levels.push(OrderLevel::new(price, delta.max(0)));
        running_total = running_total.max(cumulative);
    }

    out
}

fn parse_row(row: &GraphRow) -> Option<(MinorUnits, Quantity)> {
    let price = row[0].trim().parse::<MinorUnits>().ok()?;
    let cumulative = row[1].trim().parse::<Quantity>().ok()?;
    (price >= 0).then_some((price, cumulative))
}

/// Replace an item's order book with one rebuilt from `graph`.
///
/// Level prices are converted into the item's currency; levels that collide
/// after conversion are merged and empty levels are dropped, so both sides
/// stay strictly ordered with no duplicate prices.
///
/// # Errors
///
/// Any conversion failure abandons the update and leaves `item` untouched.
pub fn apply_order_book(
    item: &mut CanonicalItem,
    graph: &OrderGraph,
    converter: &CurrencyConverter,
    now: DateTime<Utc>,
) -> Result<GraphAnomalies, ConversionError> {
    let sell = reconstruct_with_report(&graph.sell);
    let buy = reconstruct_with_report(&graph.buy);

    let mut anomalies = sell.anomalies;
    anomalies.absorb(buy.anomalies);

    let (sell_orders, sell_dropped) = normalize_side(
        BookSide::Sell,
        convert_levels(&sell.levels, graph, item, converter, now)?,
    );
    let (buy_orders, buy_dropped) = normalize_side(
        BookSide::Buy,
        convert_levels(&buy.levels, graph, item, converter, now)?,
    );
    anomalies.out_of_order += sell_dropped + buy_dropped;

    item.sell_order_lowest_price = sell_orders.first().map(|level| level.price);
    item.buy_order_highest_price = buy_orders.first().map(|level| level.price);
    item.sell_order_count = total_quantity(&sell_orders);
    item.buy_order_count = total_quantity(&buy_orders);
    item.sell_orders = sell_orders;
    item.buy_orders = buy_orders;
    item.last_checked_orders_on = Some(now);
    item.mark_dirty();

    Ok(anomalies)
}

fn convert_levels(
    levels: &[OrderLevel],
    graph: &OrderGraph,
    item: &CanonicalItem,
    converter: &CurrencyConverter,
    now: DateTime<Utc>,
) -> Result<Vec<OrderLevel>, ConversionError> {
    levels
        .iter()
        .map(|level| {
            converter
                .convert(level.price, &graph.currency, &item.currency, now)
                .map(|price| OrderLevel::new(price, level.quantity))
        })
        .collect()
}

/// Merge equal prices, drop empty levels and levels breaking the ordering.
fn normalize_side(side: BookSide, levels: Vec<OrderLevel>) -> (Vec<OrderLevel>, usize) {
    let mut out: Vec<OrderLevel> = Vec::with_capacity(levels.len());
    let mut dropped = 0;

    for level in levels.into_iter().filter(|level| level.quantity > 0) {
        match out.last_mut() {
            Some(last) if last.price == level.price => last.quantity += level.quantity,
            Some(last) if !side.is_ordered(last.price, level.price) => dropped += 1,
            _ => out.push(level),
        }
    }

    (out, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::currency::RateBook;
    use crate::domain::{AppId, Currency, ItemKey};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn rows(raw: &[(&str, &str)]) -> Vec<GraphRow> {
        raw.iter()
            .map(|(p, q)| [(*p).to_string(), (*q).to_string()])
            .collect()
    }

    fn quantities(levels: &[OrderLevel]) -> Vec<Quantity> {
        levels.iter().map(|l| l.quantity).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    fn converter() -> CurrencyConverter {
        let rates = RateBook::from_parts(
            Vec::new(),
            vec![(usd(), dec!(1)), (Currency::new("EUR").unwrap(), dec!(0.5))],
        );
        CurrencyConverter::new(usd(), rates, now()).unwrap()
    }

    #[test]
    fn deltas_from_cumulative_depth() {
        let levels = reconstruct(&rows(&[("100", "5"), ("110", "12"), ("120", "12")]));
        assert_eq!(quantities(&levels), vec![5, 7, 0]);
        assert_eq!(levels[1], OrderLevel::new(110, 7));
    }

    #[test]
    fn decreasing_cumulative_clamps_to_zero() {
        let report = reconstruct_with_report(&rows(&[("100", "5"), ("110", "3")]));
        assert_eq!(quantities(&report.levels), vec![5, 0]);
        assert_eq!(report.anomalies.clamped, 1);
    }

    #[test]
    fn running_total_keeps_its_maximum() {
        let levels = reconstruct(&rows(&[("100", "5"), ("110", "3"), ("120", "9")]));
        assert_eq!(quantities(&levels), vec![5, 0, 4]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(reconstruct(&[]).is_empty());
    }

    #[test]
    fn buy_side_order_is_preserved() {
        let levels = reconstruct(&rows(&[("90", "2"), ("85", "6"), ("80", "10")]));
        let prices: Vec<_> = levels.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![90, 85, 80]);
        assert_eq!(quantities(&levels), vec![2, 4, 4]);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let report = reconstruct_with_report(&rows(&[("100", "5"), ("abc", "7"), ("120", "9")]));
        assert_eq!(quantities(&report.levels), vec![5, 4]);
        assert_eq!(report.anomalies.malformed, 1);
    }

    #[test]
    fn apply_sets_book_fields_in_item_currency() {
        let mut item = CanonicalItem::new(AppId::new(730), ItemKey::new("Sticker"), usd());
        let graph = OrderGraph {
            currency: Currency::new("EUR").unwrap(),
            sell: rows(&[("50", "3"), ("60", "3"), ("70", "8")]),
            buy: rows(&[("45", "1"), ("40", "4")]),
        };

        let anomalies = apply_order_book(&mut item, &graph, &converter(), now()).unwrap();

        assert!(anomalies.is_clean());
        assert_eq!(item.sell_orders, vec![OrderLevel::new(100, 3), OrderLevel::new(140, 5)]);
        assert_eq!(item.buy_orders, vec![OrderLevel::new(90, 1), OrderLevel::new(80, 3)]);
        assert_eq!(item.sell_order_lowest_price, Some(100));
        assert_eq!(item.buy_order_highest_price, Some(90));
        assert_eq!(item.sell_order_count, 8);
        assert_eq!(item.buy_order_count, 4);
        assert_eq!(item.last_checked_orders_on, Some(now()));
        assert!(item.is_dirty());
    }

    #[test]
    fn apply_merges_prices_that_collide_after_conversion() {
        let mut item = CanonicalItem::new(AppId::new(730), ItemKey::new("Sticker"), usd());
        let rates = RateBook::from_parts(
            Vec::new(),
            vec![(usd(), dec!(1)), (Currency::new("JPY").unwrap(), dec!(100))],
        );
        let converter = CurrencyConverter::new(usd(), rates, now()).unwrap();
        let graph = OrderGraph {
            currency: Currency::new("JPY").unwrap(),
            sell: rows(&[("1000", "2"), ("1020", "5"), ("1100", "6")]),
            buy: Vec::new(),
        };

        apply_order_book(&mut item, &graph, &converter, now()).unwrap();

        assert_eq!(item.sell_orders, vec![OrderLevel::new(10, 5), OrderLevel::new(11, 1)]);
        assert_eq!(item.buy_order_highest_price, None);
    }

    #[test]
    fn apply_drops_out_of_order_levels() {
        let mut item = CanonicalItem::new(AppId::new(730), ItemKey::new("Sticker"), usd());
        let graph = OrderGraph {
            currency: usd(),
            sell: rows(&[("100", "1"), ("90", "2"), ("120", "3")]),
            buy: Vec::new(),
        };

        let anomalies = apply_order_book(&mut item, &graph, &converter(), now()).unwrap();

        assert_eq!(item.sell_orders, vec![OrderLevel::new(100, 1), OrderLevel::new(120, 1)]);
        assert_eq!(anomalies.out_of_order, 1);
    }

    #[test]
    fn apply_leaves_item_untouched_on_missing_rate() {
        let mut item = CanonicalItem::new(AppId::new(730), ItemKey::new("Sticker"), usd());
        let graph = OrderGraph {
            currency: Currency::new("GBP").unwrap(),
            sell: rows(&[("100", "1")]),
            buy: Vec::new(),
        };
        let before = item.clone();

        assert!(apply_order_book(&mut item, &graph, &converter(), now()).is_err());
        assert_eq!(item, before);
    }
}

//! Position enrichment: trades, pair symbols and prices in, PnL report out.

use crate::entities::{EnrichedPosition, PairMap, PositionReport, PriceMap, Summary, Trade};
use crate::error::DomainError;
use crate::metrics::{directional_pnl, position_size, roi_percent};
use crate::resolvers::asset_label;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Enriches every trade, in input order, and aggregates the summary.
///
/// An asset without a price is valued at the trade's open price (zero PnL).
/// Any malformed trade aborts the whole batch; no partial report is returned.
///
/// # Errors
/// Returns [`DomainError::InvalidInput`] for negative collateral or leverage,
/// or when an amount overflows.
pub fn enrich(
    trades: &[Trade],
    pair_map: &PairMap,
    price_map: &PriceMap,
) -> Result<PositionReport, DomainError> {
    let positions = trades
        .iter()
        .map(|trade| enrich_trade(trade, pair_map, price_map))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = summarize(&positions)?;
    debug!(
        positions = summary.total_positions,
        total_pnl = %summary.total_pnl,
        "Positions enriched"
    );

    Ok(PositionReport {
        total_positions: positions.len(),
        positions,
        summary,
    })
}

fn enrich_trade(
    trade: &Trade,
    pair_map: &PairMap,
    price_map: &PriceMap,
) -> Result<EnrichedPosition, DomainError> {
    trade.validate()?;

    let asset = asset_label(pair_map, trade.pair_index);
    if !pair_map.contains_key(&trade.pair_index) {
        warn!(pair_index = trade.pair_index, "Pair metadata missing, using synthetic label");
    }

    let margin = trade.open_collateral;
    let size = position_size(margin, trade.leverage)?;

    let current_price = match price_map.get(&asset) {
        Some(price) => *price,
        None => {
            warn!(asset = %asset, "No price available, valuing at open price");
            trade.open_price
        }
    };

    if trade.open_price.is_zero() {
        warn!(
            pair_index = trade.pair_index,
            trade_index = trade.trade_index,
            "Open price is zero, reporting zero pnl"
        );
    }

    let direction = trade.direction();
    let pnl = directional_pnl(direction, trade.open_price, current_price, size)?;
    let roi = roi_percent(pnl, margin)?;

    Ok(EnrichedPosition {
        pair_index: trade.pair_index,
        trade_index: trade.trade_index,
        asset,
        direction,
        leverage: trade.leverage,
        position_size: size,
        margin,
        entry_price: trade.open_price,
        current_price,
        take_profit: trade.take_profit,
        stop_loss: trade.stop_loss,
        liquidation_price: trade.liquidation_price,
        pnl,
        roi,
    })
}

fn summarize(positions: &[EnrichedPosition]) -> Result<Summary, DomainError> {
    let mut total_pnl = Decimal::ZERO;
    let mut total_margin = Decimal::ZERO;

    for position in positions {
        total_pnl = total_pnl
            .checked_add(position.pnl)
            .ok_or_else(|| DomainError::InvalidInput("total pnl overflows".to_string()))?;
        total_margin = total_margin
            .checked_add(position.margin)
            .ok_or_else(|| DomainError::InvalidInput("total margin overflows".to_string()))?;
    }

    Ok(Summary {
        total_positions: positions.len(),
        total_pnl,
        total_margin,
        overall_roi: roi_percent(total_pnl, total_margin)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Direction;
    use rust_decimal_macros::dec;

    fn trade(pair_index: u32, is_long: bool, collateral: Decimal, open_price: Decimal) -> Trade {
        Trade {
            pair_index,
            trade_index: 0,
            is_long,
            open_collateral: collateral,
            leverage: dec!(10),
            open_price,
            take_profit: dec!(1.5),
            stop_loss: dec!(0.5),
            liquidation_price: dec!(0.91),
        }
    }

    fn pairs() -> PairMap {
        PairMap::from([(0, "ENA/USD".to_string()), (1, "ETH/USD".to_string())])
    }

    #[test]
    fn test_long_scenario() {
        let prices = PriceMap::from([("ENA/USD".to_string(), dec!(1.1))]);
        let report = enrich(&[trade(0, true, dec!(100), dec!(1.0))], &pairs(), &prices).unwrap();

        let position = &report.positions[0];
        assert_eq!(position.asset, "ENA/USD");
        assert_eq!(position.direction, Direction::Long);
        assert_eq!(position.position_size, dec!(1000));
        assert_eq!(position.margin, dec!(100));
        assert_eq!(position.pnl, dec!(100));
        assert_eq!(position.roi, dec!(100));
        assert_eq!(position.take_profit, dec!(1.5));
        assert_eq!(position.stop_loss, dec!(0.5));
        assert_eq!(position.liquidation_price, dec!(0.91));
    }

    #[test]
    fn test_short_scenario() {
        let prices = PriceMap::from([("ENA/USD".to_string(), dec!(0.9))]);
        let report = enrich(&[trade(0, false, dec!(100), dec!(1.0))], &pairs(), &prices).unwrap();

        let position = &report.positions[0];
        assert_eq!(position.direction, Direction::Short);
        assert_eq!(position.pnl, dec!(100));
        assert_eq!(position.roi, dec!(100));
    }

    #[test]
    fn test_missing_price_falls_back_to_open() {
        let report = enrich(
            &[trade(1, true, dec!(250), dec!(3120.5))],
            &pairs(),
            &PriceMap::new(),
        )
        .unwrap();

        let position = &report.positions[0];
        assert_eq!(position.current_price, dec!(3120.5));
        assert_eq!(position.pnl, Decimal::ZERO);
        assert_eq!(position.roi, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_pair_gets_synthetic_label() {
        let report = enrich(&[trade(17, true, dec!(10), dec!(2))], &pairs(), &PriceMap::new())
            .unwrap();
        assert_eq!(report.positions[0].asset, "Pair 17");
    }

    #[test]
    fn test_zero_margin_has_zero_roi() {
        let prices = PriceMap::from([("ENA/USD".to_string(), dec!(2))]);
        let report = enrich(&[trade(0, true, dec!(0), dec!(1))], &pairs(), &prices).unwrap();

        assert_eq!(report.positions[0].roi, Decimal::ZERO);
        assert_eq!(report.summary.overall_roi, Decimal::ZERO);
    }

    #[test]
    fn test_zero_open_price_does_not_fault() {
        let prices = PriceMap::from([("ENA/USD".to_string(), dec!(2))]);
        let report = enrich(&[trade(0, true, dec!(50), dec!(0))], &pairs(), &prices).unwrap();
        assert_eq!(report.positions[0].pnl, Decimal::ZERO);
    }

    #[test]
    fn test_summary_totals() {
        let prices = PriceMap::from([
            ("ENA/USD".to_string(), dec!(1.2)),
            ("ETH/USD".to_string(), dec!(1900)),
        ]);
        let trades = vec![
            trade(0, true, dec!(100), dec!(1.0)),
            trade(1, false, dec!(300), dec!(2000)),
            trade(5, true, dec!(40), dec!(7)),
        ];

        let report = enrich(&trades, &pairs(), &prices).unwrap();
        assert_eq!(report.total_positions, 3);
        assert_eq!(report.summary.total_positions, 3);

        let pnl_sum: Decimal = report.positions.iter().map(|p| p.pnl).sum();
        let margin_sum: Decimal = report.positions.iter().map(|p| p.margin).sum();
        assert_eq!(report.summary.total_pnl, pnl_sum);
        assert_eq!(report.summary.total_margin, margin_sum);
        assert_eq!(report.summary.total_margin, dec!(440));

        // 200 (long) + 150 (short) + 0 (unpriced)
        assert_eq!(report.summary.total_pnl, dec!(350));
        assert_eq!(
            report.summary.overall_roi,
            dec!(350) / dec!(440) * dec!(100)
        );
    }

    #[test]
    fn test_positions_keep_input_order() {
        let trades = vec![
            trade(1, true, dec!(1), dec!(1)),
            trade(0, false, dec!(1), dec!(1)),
        ];
        let report = enrich(&trades, &pairs(), &PriceMap::new()).unwrap();

        let assets: Vec<_> = report.positions.iter().map(|p| p.asset.as_str()).collect();
        assert_eq!(assets, vec!["ETH/USD", "ENA/USD"]);
    }

    #[test]
    fn test_empty_trades() {
        let report = enrich(&[], &pairs(), &PriceMap::new()).unwrap();
        assert_eq!(report, PositionReport::empty());
    }

    #[test]
    fn test_negative_margin_aborts_batch() {
        let trades = vec![
            trade(0, true, dec!(100), dec!(1)),
            trade(1, true, dec!(-5), dec!(1)),
        ];
        let err = enrich(&trades, &pairs(), &PriceMap::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}

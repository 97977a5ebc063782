//! PnL and ROI arithmetic for leveraged positions.
//!
//! All operations use checked decimal arithmetic; an overflow is reported as
//! [`DomainError::InvalidInput`] instead of panicking.

use crate::enums::Direction;
use crate::error::DomainError;
use rust_decimal::Decimal;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn overflow(what: &str) -> DomainError {
    DomainError::InvalidInput(format!("{what} overflows decimal range"))
}

/// Notional size of a position.
///
/// # Errors
/// Returns an error if the product overflows.
pub fn position_size(margin: Decimal, leverage: Decimal) -> Result<Decimal, DomainError> {
    margin
        .checked_mul(leverage)
        .ok_or_else(|| overflow("position size"))
}

/// Signed PnL of a position moved from `open_price` to `current_price`.
///
/// Longs gain when the price rises, shorts when it falls. A zero open price
/// yields zero PnL.
///
/// # Errors
/// Returns an error if an intermediate value overflows.
pub fn directional_pnl(
    direction: Direction,
    open_price: Decimal,
    current_price: Decimal,
    position_size: Decimal,
) -> Result<Decimal, DomainError> {
    if open_price.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let price_move = match direction {
        Direction::Long => current_price.checked_sub(open_price),
        Direction::Short => open_price.checked_sub(current_price),
    };

    price_move
        .and_then(|delta| delta.checked_div(open_price))
        .and_then(|change| change.checked_mul(position_size))
        .ok_or_else(|| overflow("pnl"))
}

/// PnL as a percentage of margin; zero when there is no positive margin.
///
/// # Errors
/// Returns an error if the ratio overflows.
pub fn roi_percent(pnl: Decimal, margin: Decimal) -> Result<Decimal, DomainError> {
    if margin <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    pnl.checked_div(margin)
        .and_then(|ratio| ratio.checked_mul(ONE_HUNDRED))
        .ok_or_else(|| overflow("roi"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_long_pnl_follows_price() {
        let up = directional_pnl(Direction::Long, dec!(1.0), dec!(1.1), dec!(1000)).unwrap();
        assert_eq!(up, dec!(100));

        let down = directional_pnl(Direction::Long, dec!(1.0), dec!(0.9), dec!(1000)).unwrap();
        assert_eq!(down, dec!(-100));
    }

    #[test]
    fn test_short_pnl_is_inverted() {
        let down = directional_pnl(Direction::Short, dec!(1.0), dec!(0.9), dec!(1000)).unwrap();
        assert_eq!(down, dec!(100));

        let up = directional_pnl(Direction::Short, dec!(1.0), dec!(1.1), dec!(1000)).unwrap();
        assert_eq!(up, dec!(-100));
    }

    #[test]
    fn test_unchanged_price_is_flat() {
        let pnl = directional_pnl(Direction::Long, dec!(2500), dec!(2500), dec!(5000)).unwrap();
        assert!(pnl.is_zero());
    }

    #[test]
    fn test_zero_open_price_yields_zero_pnl() {
        let pnl = directional_pnl(Direction::Long, dec!(0), dec!(3), dec!(1000)).unwrap();
        assert_eq!(pnl, Decimal::ZERO);
    }

    #[test]
    fn test_roi_percent() {
        assert_eq!(roi_percent(dec!(100), dec!(100)).unwrap(), dec!(100));
        assert_eq!(roi_percent(dec!(-25), dec!(50)).unwrap(), dec!(-50));
    }

    #[test]
    fn test_roi_zero_margin() {
        assert_eq!(roi_percent(dec!(100), dec!(0)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_position_size_overflow() {
        assert!(position_size(Decimal::MAX, dec!(2)).is_err());
        assert_eq!(position_size(dec!(100), dec!(10)).unwrap(), dec!(1000));
    }
}

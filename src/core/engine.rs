use super::error::{CalcError, Result};
use super::types::{GlidePath, PriceHolding, Summary, TaxDrag};

pub const DIVIDEND_YIELD_PCT: f64 = 2.0;
pub const DIVIDEND_TAX_RATE_PCT: f64 = 15.0;

/// Compounds `principal` through `returns` (percent per year).
///
/// The result has one more point than `returns`; index 0 is the principal.
/// Returns at or below -100% are applied as-is and may drive the balance to
/// zero or below.
pub fn grow_balance(returns: &[f64], principal: f64) -> Result<Vec<f64>> {
    check_principal(principal)?;
    check_returns("returns", returns)?;
    Ok(compound(returns, principal))
}

/// Bond share of the portfolio at `age`. Grows by 0.01 per year past `offset`
/// and is not capped at 1.
pub fn bond_weight(age: u32, offset: i32) -> f64 {
    (i64::from(age) - i64::from(offset)).max(0) as f64 / 100.0
}

pub fn blend_glide_path(
    stock_returns: &[f64],
    bond_returns: &[f64],
    start_age: u32,
    offset: i32,
    principal: f64,
) -> Result<GlidePath> {
    check_principal(principal)?;
    check_returns("stock", stock_returns)?;
    check_returns("bond", bond_returns)?;
    if stock_returns.len() != bond_returns.len() {
        return Err(CalcError::LengthMismatch {
            left: "stock",
            left_len: stock_returns.len(),
            right: "bond",
            right_len: bond_returns.len(),
        });
    }

    let bond_weights: Vec<f64> = (0..stock_returns.len() as u32)
        .map(|i| bond_weight(start_age.saturating_add(i), offset))
        .collect();
    let blended_returns: Vec<f64> = stock_returns
        .iter()
        .zip(bond_returns)
        .zip(&bond_weights)
        .map(|((stock, bond), w)| (1.0 - w) * stock + w * bond)
        .collect();
    let balances = compound(&blended_returns, principal);

    Ok(GlidePath {
        bond_weights,
        blended_returns,
        balances,
    })
}

/// Simulates a taxable account whose dividends are taxed every year.
///
/// `returns` are total returns (dividends included), so the dividend tax is
/// the only drag. The basis grows by the after-tax dividend that gets
/// reinvested. Balances are floored at zero.
pub fn simulate_tax_drag(
    returns: &[f64],
    principal: f64,
    dividend_yield_pct: f64,
    dividend_tax_rate_pct: f64,
) -> Result<TaxDrag> {
    check_principal(principal)?;
    check_returns("returns", returns)?;
    check_finite("dividend yield", dividend_yield_pct)?;
    check_finite("dividend tax rate", dividend_tax_rate_pct)?;

    let div_yield = dividend_yield_pct / 100.0;
    let div_tax_rate = dividend_tax_rate_pct / 100.0;

    let mut balances = Vec::with_capacity(returns.len() + 1);
    let mut cost_basis = Vec::with_capacity(returns.len() + 1);
    let mut dividend_taxes = Vec::with_capacity(returns.len());
    let mut bal = principal;
    let mut basis = principal;
    balances.push(bal);
    cost_basis.push(basis);

    for r in returns {
        let dividend = bal * div_yield;
        let div_tax = dividend * div_tax_rate;
        let after_tax_dividend = dividend * (1.0 - div_tax_rate);

        dividend_taxes.push(div_tax);
        bal = (bal * (1.0 + r / 100.0) - div_tax).max(0.0);
        basis += after_tax_dividend;
        balances.push(bal);
        cost_basis.push(basis);
    }

    Ok(TaxDrag {
        balances,
        cost_basis,
        dividend_taxes,
    })
}

/// Value kept after selling at `balance` and paying capital-gains tax on the
/// gain above `basis`. Losses are not credited.
pub fn liquidation_value(balance: f64, basis: f64, cap_gains_rate_pct: f64) -> f64 {
    let gains = (balance - basis).max(0.0);
    balance - gains * (cap_gains_rate_pct / 100.0)
}

/// [`liquidation_value`] at every point of a balance/basis pair.
pub fn after_tax_series(
    balances: &[f64],
    cost_basis: &[f64],
    cap_gains_rate_pct: f64,
) -> Result<Vec<f64>> {
    check_finite("capital gains rate", cap_gains_rate_pct)?;
    if balances.len() != cost_basis.len() {
        return Err(CalcError::LengthMismatch {
            left: "balance",
            left_len: balances.len(),
            right: "cost basis",
            right_len: cost_basis.len(),
        });
    }
    Ok(balances
        .iter()
        .zip(cost_basis)
        .map(|(bal, basis)| liquidation_value(*bal, *basis, cap_gains_rate_pct))
        .collect())
}

/// Buys `principal / prices[0]` units and values them at every price.
pub fn translate_prices(prices: &[f64], principal: f64) -> Result<PriceHolding> {
    check_principal(principal)?;
    check_prices(prices)?;

    let units_owned = principal / prices[0];
    let mut balances: Vec<f64> = prices.iter().map(|p| units_owned * p).collect();
    // units_owned * prices[0] can round away from the principal.
    balances[0] = principal;

    Ok(PriceHolding {
        units_owned,
        balances,
    })
}

/// Year-over-year percentage change between consecutive prices.
pub fn price_returns(prices: &[f64]) -> Result<Vec<f64>> {
    check_prices(prices)?;
    prices
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            if pair[0] <= 0.0 {
                return Err(CalcError::InvalidPrice {
                    index: i,
                    value: pair[0],
                });
            }
            Ok((pair[1] - pair[0]) / pair[0] * 100.0)
        })
        .collect()
}

/// Compound annual growth rate in percent, rounded to 2 decimals.
pub fn cagr_pct(start: f64, end: f64, years: usize) -> Result<f64> {
    let undefined = CalcError::UndefinedCagr { start, end, years };
    if years == 0 || !start.is_finite() || !end.is_finite() || start <= 0.0 || end < 0.0 {
        return Err(undefined);
    }
    let rate = ((end / start).powf(1.0 / years as f64) - 1.0) * 100.0;
    if !rate.is_finite() {
        return Err(undefined);
    }
    Ok(round2(rate))
}

pub fn summarize(balances: &[f64], principal: f64) -> Result<Summary> {
    check_principal(principal)?;
    let Some(&final_value) = balances.last() else {
        return Err(CalcError::EmptySeries { name: "balance" });
    };
    check_finite("final value", final_value)?;

    Ok(Summary {
        final_value,
        gain: final_value - principal,
        cagr_pct: cagr_pct(principal, final_value, balances.len() - 1).ok(),
    })
}

fn compound(returns: &[f64], principal: f64) -> Vec<f64> {
    let mut balances = Vec::with_capacity(returns.len() + 1);
    let mut bal = principal;
    balances.push(bal);
    for r in returns {
        bal *= 1.0 + r / 100.0;
        balances.push(bal);
    }
    balances
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_principal(principal: f64) -> Result<()> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(CalcError::InvalidPrincipal(principal));
    }
    Ok(())
}

fn check_finite(what: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CalcError::NonFinite { what });
    }
    Ok(())
}

fn check_returns(name: &'static str, returns: &[f64]) -> Result<()> {
    if returns.is_empty() {
        return Err(CalcError::EmptySeries { name });
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(CalcError::NonFinite { what: name });
    }
    Ok(())
}

fn check_prices(prices: &[f64]) -> Result<()> {
    if prices.len() < 2 {
        return Err(CalcError::EmptySeries { name: "price" });
    }
    if let Some((index, &value)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0)
    {
        return Err(CalcError::InvalidPrice { index, value });
    }
    if prices[0] <= 0.0 {
        return Err(CalcError::InvalidPrice {
            index: 0,
            value: prices[0],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::{BOND_RETURNS, SILVER_PRICES, SP500_RETURNS, TOTAL_MARKET_RETURNS};
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_series_approx(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "length mismatch");
        for (a, e) in actual.iter().zip(expected) {
            assert_approx(*a, *e);
        }
    }

    #[test]
    fn grow_balance_compounds_each_year() {
        let balances = grow_balance(&[10.0, -10.0], 10_000.0).expect("valid series");
        assert_series_approx(&balances, &[10_000.0, 11_000.0, 9_900.0]);
    }

    #[test]
    fn grow_balance_does_not_clamp_total_losses() {
        let balances = grow_balance(&[-100.0, 50.0], 10_000.0).expect("valid series");
        assert_series_approx(&balances, &[10_000.0, 0.0, 0.0]);

        let balances = grow_balance(&[-150.0], 10_000.0).expect("valid series");
        assert_approx(balances[1], -5_000.0);
    }

    #[test]
    fn grow_balance_rejects_bad_inputs() {
        assert_eq!(
            grow_balance(&[], 10_000.0),
            Err(CalcError::EmptySeries { name: "returns" })
        );
        assert_eq!(
            grow_balance(&[5.0], 0.0),
            Err(CalcError::InvalidPrincipal(0.0))
        );
        assert!(matches!(
            grow_balance(&[f64::NAN], 10_000.0),
            Err(CalcError::NonFinite { .. })
        ));
    }

    #[test]
    fn bond_weight_starts_at_offset() {
        assert_approx(bond_weight(10, 10), 0.0);
        assert_approx(bond_weight(5, 10), 0.0);
        assert_approx(bond_weight(25, 10), 0.15);
        assert_approx(bond_weight(64, 20), 0.44);
    }

    #[test]
    fn bond_weight_is_not_capped() {
        assert_approx(bond_weight(130, 10), 1.2);
        assert_approx(bond_weight(30, -80), 1.1);
    }

    #[test]
    fn blend_glide_path_weights_first_year() {
        let path = blend_glide_path(&[20.0, 20.0], &[0.0, 0.0], 25, 10, 10_000.0)
            .expect("valid series");
        assert_approx(path.bond_weights[0], 0.15);
        assert_approx(path.blended_returns[0], 17.0);
        assert_approx(path.blended_returns[1], 16.8);
        assert_series_approx(&path.balances, &[10_000.0, 11_700.0, 11_700.0 * 1.168]);
    }

    #[test]
    fn blend_glide_path_rejects_mismatched_lengths() {
        let err = blend_glide_path(&[1.0, 2.0], &[1.0], 25, 10, 10_000.0)
            .expect_err("must reject mismatched series");
        assert_eq!(
            err,
            CalcError::LengthMismatch {
                left: "stock",
                left_len: 2,
                right: "bond",
                right_len: 1,
            }
        );
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn historical_glide_path_lags_pure_stocks() {
        let stocks = grow_balance(&TOTAL_MARKET_RETURNS, 10_000.0).expect("valid series");
        let age_minus_10 = blend_glide_path(&TOTAL_MARKET_RETURNS, &BOND_RETURNS, 25, 10, 10_000.0)
            .expect("valid series");
        let age_minus_20 = blend_glide_path(&TOTAL_MARKET_RETURNS, &BOND_RETURNS, 25, 20, 10_000.0)
            .expect("valid series");

        assert_eq!(age_minus_10.balances.len(), 41);
        assert_approx(age_minus_10.bond_weights[39], 0.54);
        assert_approx(age_minus_20.bond_weights[0], 0.05);
        assert!(age_minus_10.balances[40] < age_minus_20.balances[40]);
        assert!(age_minus_20.balances[40] < stocks[40]);
    }

    #[test]
    fn tax_drag_first_year_matches_hand_calculation() {
        let drag = simulate_tax_drag(&[10.0], 10_000.0, 2.0, 15.0).expect("valid series");
        assert_approx(drag.dividend_taxes[0], 30.0);
        assert_approx(drag.balances[1], 10_970.0);
        assert_approx(drag.cost_basis[1], 10_170.0);
        assert_approx(drag.total_dividend_tax(), 30.0);
    }

    #[test]
    fn tax_drag_floors_balance_at_zero() {
        let drag = simulate_tax_drag(&[-100.0, 20.0], 10_000.0, 2.0, 15.0).expect("valid series");
        assert_approx(drag.balances[1], 0.0);
        assert_approx(drag.balances[2], 0.0);
        assert_approx(drag.dividend_taxes[1], 0.0);
        assert_approx(drag.cost_basis[2], 10_170.0);
    }

    #[test]
    fn tax_drag_without_dividends_matches_growth() {
        let growth = grow_balance(&SP500_RETURNS, 10_000.0).expect("valid series");
        let drag = simulate_tax_drag(&SP500_RETURNS, 10_000.0, 0.0, 15.0).expect("valid series");
        assert_series_approx(&drag.balances, &growth);
        assert!(drag.cost_basis.iter().all(|b| (*b - 10_000.0).abs() <= EPS));
    }

    #[test]
    fn liquidation_taxes_only_gains() {
        assert_approx(liquidation_value(20_000.0, 12_000.0, 15.0), 18_800.0);
        assert_approx(liquidation_value(20_000.0, 12_000.0, 20.0), 18_400.0);
        assert_approx(liquidation_value(8_000.0, 12_000.0, 20.0), 8_000.0);
    }

    #[test]
    fn after_tax_series_recomputes_without_rerunning_drag() {
        let drag = simulate_tax_drag(&SP500_RETURNS, 10_000.0, 2.0, 15.0).expect("valid series");
        let at_15 = after_tax_series(&drag.balances, &drag.cost_basis, 15.0).expect("same length");
        let at_20 = after_tax_series(&drag.balances, &drag.cost_basis, 20.0).expect("same length");
        assert_approx(at_15[0], 10_000.0);
        assert!(at_20[40] < at_15[40]);
        assert!(at_15[40] < drag.balances[40]);
    }

    #[test]
    fn after_tax_series_rejects_mismatched_lengths() {
        let err = after_tax_series(&[1.0, 2.0], &[1.0], 15.0).expect_err("must reject");
        assert!(matches!(err, CalcError::LengthMismatch { .. }));
    }

    #[test]
    fn translate_prices_holds_fixed_units() {
        let holding = translate_prices(&[10.0, 20.0, 5.0], 10_000.0).expect("valid prices");
        assert_approx(holding.units_owned, 1_000.0);
        assert_series_approx(&holding.balances, &[10_000.0, 20_000.0, 5_000.0]);
    }

    #[test]
    fn translate_prices_rejects_zero_purchase_price() {
        assert_eq!(
            translate_prices(&[0.0, 1.0], 10_000.0).map(|h| h.units_owned),
            Err(CalcError::InvalidPrice {
                index: 0,
                value: 0.0
            })
        );
        assert!(translate_prices(&[1.0, -2.0], 10_000.0).is_err());
        assert!(translate_prices(&[1.0], 10_000.0).is_err());
    }

    #[test]
    fn price_returns_are_year_over_year_changes() {
        let returns = price_returns(&[10.0, 20.0, 5.0]).expect("valid prices");
        assert_series_approx(&returns, &[100.0, -75.0]);
        assert!(price_returns(&[10.0, 0.0, 5.0]).is_err());
    }

    #[test]
    fn silver_history_translates_to_balances() {
        let holding = translate_prices(&SILVER_PRICES, 10_000.0).expect("valid prices");
        let returns = price_returns(&SILVER_PRICES).expect("valid prices");
        assert_eq!(holding.balances.len(), 41);
        assert_eq!(returns.len(), 40);
        assert_approx(holding.balances[40], 10_000.0 / 6.31 * 29.52);
    }

    #[test]
    fn cagr_matches_closed_form() {
        assert_eq!(cagr_pct(10_000.0, 40_000.0, 40), Ok(3.53));
        assert_eq!(cagr_pct(10_000.0, 10_000.0, 40), Ok(0.0));
        assert_eq!(cagr_pct(10_000.0, 0.0, 40), Ok(-100.0));
    }

    #[test]
    fn cagr_is_undefined_for_degenerate_values() {
        assert!(matches!(
            cagr_pct(0.0, 40_000.0, 40),
            Err(CalcError::UndefinedCagr { .. })
        ));
        assert!(cagr_pct(-1.0, 40_000.0, 40).is_err());
        assert!(cagr_pct(10_000.0, -1.0, 40).is_err());
        assert!(cagr_pct(10_000.0, 40_000.0, 0).is_err());
    }

    #[test]
    fn summarize_reports_missing_cagr_explicitly() {
        let summary = summarize(&[10_000.0, -500.0], 10_000.0).expect("non-empty balances");
        assert_approx(summary.final_value, -500.0);
        assert_approx(summary.gain, -10_500.0);
        assert_eq!(summary.cagr_pct, None);

        let summary = summarize(&[10_000.0, 11_000.0, 12_100.0], 10_000.0).expect("non-empty");
        assert_eq!(summary.cagr_pct, Some(10.0));
        assert!(summarize(&[], 10_000.0).is_err());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_growth_follows_recurrence(
            returns in vec(-150.0f64..150.0, 1..60),
            principal in 1.0f64..1_000_000.0
        ) {
            let balances = grow_balance(&returns, principal).expect("finite inputs");
            prop_assert_eq!(balances.len(), returns.len() + 1);
            prop_assert_eq!(balances[0], principal);
            for (i, r) in returns.iter().enumerate() {
                prop_assert_eq!(balances[i + 1], balances[i] * (1.0 + r / 100.0));
            }
        }

        #[test]
        fn prop_bond_weight_steps_by_one_percent(age in 0u32..150, offset in -50i32..100) {
            let now = bond_weight(age, offset);
            let next = bond_weight(age + 1, offset);
            prop_assert!(now >= 0.0);
            prop_assert!(next >= now);
            if i64::from(age) >= i64::from(offset) {
                prop_assert!((next - now - 0.01).abs() <= 1e-12);
            }
        }

        #[test]
        fn prop_tax_drag_never_goes_negative(
            returns in vec(-300.0f64..200.0, 1..60),
            dividend_yield in 0.0f64..10.0,
            dividend_tax in 0.0f64..60.0
        ) {
            let drag = simulate_tax_drag(&returns, 10_000.0, dividend_yield, dividend_tax)
                .expect("finite inputs");
            prop_assert_eq!(drag.balances.len(), returns.len() + 1);
            prop_assert_eq!(drag.cost_basis.len(), returns.len() + 1);
            prop_assert_eq!(drag.dividend_taxes.len(), returns.len());
            prop_assert!(drag.balances.iter().all(|b| *b >= 0.0));
        }

        #[test]
        fn prop_zero_rate_liquidation_keeps_balance(
            balance in -1_000_000.0f64..1_000_000.0,
            basis in 0.0f64..1_000_000.0
        ) {
            prop_assert_eq!(liquidation_value(balance, basis, 0.0), balance);
        }

        #[test]
        fn prop_price_holding_starts_at_principal(
            prices in vec(0.01f64..10_000.0, 2..50),
            principal in 1.0f64..1_000_000.0
        ) {
            let holding = translate_prices(&prices, principal).expect("positive prices");
            prop_assert_eq!(holding.balances[0], principal);
            prop_assert_eq!(holding.balances.len(), prices.len());
        }
    }
}

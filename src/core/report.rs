//! Page reports: everything a chart page needs, computed from one [`Scenario`].
//!
//! Reports hold raw numbers only. Currency and percent formatting belong to
//! whoever renders them.

use serde::Serialize;
use tracing::debug;

use super::engine::{
    DIVIDEND_TAX_RATE_PCT, DIVIDEND_YIELD_PCT, after_tax_series, blend_glide_path, grow_balance,
    price_returns, simulate_tax_drag, summarize, translate_prices,
};
use super::error::{CalcError, Result};
use super::history::{
    BOND_RETURNS, PRINCIPAL, SILVER_PRICES, SP500_RETURNS, START_AGE, TOTAL_MARKET_RETURNS,
    YEAR_COUNT, ages, chart_labels, years,
};
use super::types::{ReturnCell, Summary, TaxDrag};

pub const DEFAULT_BOND_OFFSET: i32 = 10;
pub const DEFAULT_CAP_GAINS_RATE: f64 = 15.0;
pub const MAX_START_AGE: u32 = 120;

/// User-adjustable inputs shared by all pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub bond_offset: i32,
    pub cap_gains_rate: f64,
    pub start_age: u32,
    pub principal: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            bond_offset: DEFAULT_BOND_OFFSET,
            cap_gains_rate: DEFAULT_CAP_GAINS_RATE,
            start_age: START_AGE,
            principal: PRINCIPAL,
        }
    }
}

impl Scenario {
    /// Checks the parameters every front end accepts before building reports.
    pub fn validated(self) -> Result<Self> {
        if !(0.0..=100.0).contains(&self.cap_gains_rate) {
            return Err(CalcError::OutOfRange {
                what: "capital gains rate",
                min: 0.0,
                max: 100.0,
                value: self.cap_gains_rate,
            });
        }
        if self.start_age > MAX_START_AGE {
            return Err(CalcError::OutOfRange {
                what: "start age",
                min: 0.0,
                max: f64::from(MAX_START_AGE),
                value: f64::from(self.start_age),
            });
        }
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(CalcError::InvalidPrincipal(self.principal));
        }
        Ok(self)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    GlidePath,
    Roth,
    Silver,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageReport {
    GlidePath(GlidePathReport),
    Roth(RothReport),
    Silver(SilverReport),
}

pub fn build_report(page: Page, scenario: &Scenario) -> Result<PageReport> {
    Ok(match page {
        Page::GlidePath => PageReport::GlidePath(GlidePathReport::build(scenario)?),
        Page::Roth => PageReport::Roth(RothReport::build(scenario)?),
        Page::Silver => PageReport::Silver(SilverReport::build(scenario)?),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    pub balances: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub label: String,
    pub value: f64,
    pub detail: CardDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CardDetail {
    #[serde(rename_all = "camelCase")]
    Growth { gain: f64, cagr_pct: Option<f64> },
    #[serde(rename_all = "camelCase")]
    CagrOnly { cagr_pct: Option<f64> },
    TaxFree,
    #[serde(rename_all = "camelCase")]
    TaxesLost { total_tax: f64 },
    #[serde(rename_all = "camelCase")]
    TaxBreakdown {
        dividend_tax: f64,
        cap_gains_tax: f64,
    },
    /// How many times larger the leading value is; `None` when the other is zero.
    Multiple { ratio: Option<f64> },
}

impl Card {
    fn growth(label: impl Into<String>, summary: Summary) -> Self {
        Self {
            label: label.into(),
            value: summary.final_value,
            detail: CardDetail::Growth {
                gain: summary.gain,
                cagr_pct: summary.cagr_pct,
            },
        }
    }
}

fn glide_label(offset: i32) -> String {
    format!("Age minus {offset}")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlidePathRow {
    pub year: u32,
    pub age: u32,
    pub sp500_return: ReturnCell,
    pub sp500_balance: f64,
    pub total_market_return: ReturnCell,
    pub total_market_balance: f64,
    pub bond_allocation_pct: i64,
    pub blended_return: ReturnCell,
    pub blend_balance: f64,
}

/// 100% S&P 500 and 100% total market against an age-based bond glide path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlidePathReport {
    pub bond_offset: i32,
    pub start_age: u32,
    pub principal: f64,
    pub legend: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub cards: Vec<Card>,
    pub rows: Vec<GlidePathRow>,
}

impl GlidePathReport {
    pub fn build(scenario: &Scenario) -> Result<Self> {
        let Scenario {
            bond_offset,
            start_age,
            principal,
            ..
        } = *scenario;
        debug!(bond_offset, start_age, principal, "computing glide path report");

        let sp500 = grow_balance(&SP500_RETURNS, principal)?;
        let total_market = grow_balance(&TOTAL_MARKET_RETURNS, principal)?;
        let blend = blend_glide_path(
            &TOTAL_MARKET_RETURNS,
            &BOND_RETURNS,
            start_age,
            bond_offset,
            principal,
        )?;

        let blend_label = glide_label(bond_offset);
        let cards = vec![
            Card::growth("100% S&P 500", summarize(&sp500, principal)?),
            Card::growth("100% Total US Market", summarize(&total_market, principal)?),
            Card::growth(blend_label.clone(), summarize(&blend.balances, principal)?),
        ];

        let first_pct = allocation_pct(start_age, bond_offset);
        let last_age = start_age.saturating_add(YEAR_COUNT as u32);
        let last_pct = allocation_pct(last_age, bond_offset);
        let legend = format!(
            "{blend_label} (age {start_age} = {first_pct}% bonds \u{2192} age {last_age} = {last_pct}% bonds)"
        );

        let rows = years()
            .into_iter()
            .zip(ages(start_age))
            .enumerate()
            .map(|(i, (year, age))| GlidePathRow {
                year,
                age,
                sp500_return: SP500_RETURNS[i].into(),
                sp500_balance: sp500[i + 1],
                total_market_return: TOTAL_MARKET_RETURNS[i].into(),
                total_market_balance: total_market[i + 1],
                bond_allocation_pct: allocation_pct(age, bond_offset),
                blended_return: blend.blended_returns[i].into(),
                blend_balance: blend.balances[i + 1],
            })
            .collect();

        Ok(Self {
            bond_offset,
            start_age,
            principal,
            legend,
            labels: chart_labels(),
            series: vec![
                ChartSeries {
                    label: "100% S&P 500".to_string(),
                    balances: sp500,
                },
                ChartSeries {
                    label: "100% Total US Market".to_string(),
                    balances: total_market,
                },
                ChartSeries {
                    label: blend_label,
                    balances: blend.balances,
                },
            ],
            cards,
            rows,
        })
    }
}

fn allocation_pct(age: u32, offset: i32) -> i64 {
    (i64::from(age) - i64::from(offset)).max(0)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RothRow {
    pub year: u32,
    pub age: u32,
    pub sp500_return: ReturnCell,
    pub roth_value: f64,
    pub brokerage_after_tax: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RothTotals {
    pub roth_value: f64,
    pub brokerage_value: f64,
    pub brokerage_after_tax: f64,
    pub dividend_tax: f64,
    pub cap_gains_tax: f64,
    pub total_tax: f64,
    pub gap: f64,
}

/// Tax-free Roth growth against a brokerage account paying dividend tax every
/// year and capital-gains tax on sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RothReport {
    pub cap_gains_rate: f64,
    pub dividend_yield_pct: f64,
    pub dividend_tax_rate_pct: f64,
    pub start_age: u32,
    pub principal: f64,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub cards: Vec<Card>,
    pub rows: Vec<RothRow>,
    pub totals: RothTotals,
    #[serde(skip)]
    roth: Vec<f64>,
    #[serde(skip)]
    brokerage: TaxDrag,
}

impl RothReport {
    pub fn build(scenario: &Scenario) -> Result<Self> {
        debug!(
            cap_gains_rate = scenario.cap_gains_rate,
            principal = scenario.principal,
            "computing roth report"
        );
        let roth = grow_balance(&SP500_RETURNS, scenario.principal)?;
        let brokerage = simulate_tax_drag(
            &SP500_RETURNS,
            scenario.principal,
            DIVIDEND_YIELD_PCT,
            DIVIDEND_TAX_RATE_PCT,
        )?;
        Self::assemble(
            roth,
            brokerage,
            scenario.cap_gains_rate,
            scenario.start_age,
            scenario.principal,
        )
    }

    /// Re-prices the sale at a new capital-gains rate. Dividend drag does not
    /// depend on that rate, so the stored balances and basis are reused.
    pub fn with_cap_gains_rate(&self, cap_gains_rate: f64) -> Result<Self> {
        debug!(cap_gains_rate, "re-pricing roth report");
        Self::assemble(
            self.roth.clone(),
            self.brokerage.clone(),
            cap_gains_rate,
            self.start_age,
            self.principal,
        )
    }

    pub fn brokerage(&self) -> &TaxDrag {
        &self.brokerage
    }

    fn assemble(
        roth: Vec<f64>,
        brokerage: TaxDrag,
        cap_gains_rate: f64,
        start_age: u32,
        principal: f64,
    ) -> Result<Self> {
        let after_tax =
            after_tax_series(&brokerage.balances, &brokerage.cost_basis, cap_gains_rate)?;

        let roth_final = roth[YEAR_COUNT];
        let brokerage_final = brokerage.balances[YEAR_COUNT];
        let after_tax_final = after_tax[YEAR_COUNT];
        let dividend_tax = brokerage.total_dividend_tax();
        let cap_gains_tax = brokerage_final - after_tax_final;
        let total_tax = dividend_tax + cap_gains_tax;
        let advantage = roth_final - after_tax_final;

        let cards = vec![
            Card {
                label: "Roth IRA (you keep)".to_string(),
                value: roth_final,
                detail: CardDetail::TaxFree,
            },
            Card {
                label: "Brokerage (you keep)".to_string(),
                value: after_tax_final,
                detail: CardDetail::TaxesLost { total_tax },
            },
            Card {
                label: "Roth Advantage".to_string(),
                value: advantage,
                detail: CardDetail::TaxBreakdown {
                    dividend_tax,
                    cap_gains_tax,
                },
            },
        ];

        let rows = years()
            .into_iter()
            .zip(ages(start_age))
            .enumerate()
            .map(|(i, (year, age))| RothRow {
                year,
                age,
                sp500_return: SP500_RETURNS[i].into(),
                roth_value: roth[i + 1],
                brokerage_after_tax: after_tax[i + 1],
                gap: roth[i + 1] - after_tax[i + 1],
            })
            .collect();

        Ok(Self {
            cap_gains_rate,
            dividend_yield_pct: DIVIDEND_YIELD_PCT,
            dividend_tax_rate_pct: DIVIDEND_TAX_RATE_PCT,
            start_age,
            principal,
            labels: chart_labels(),
            series: vec![
                ChartSeries {
                    label: "Roth IRA (you keep)".to_string(),
                    balances: roth.clone(),
                },
                ChartSeries {
                    label: "Brokerage (you keep)".to_string(),
                    balances: after_tax,
                },
            ],
            cards,
            rows,
            totals: RothTotals {
                roth_value: roth_final,
                brokerage_value: brokerage_final,
                brokerage_after_tax: after_tax_final,
                dividend_tax,
                cap_gains_tax,
                total_tax,
                gap: advantage,
            },
            roth,
            brokerage,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SilverRow {
    pub year: u32,
    pub sp500_return: ReturnCell,
    pub sp500_value: f64,
    pub silver_price: f64,
    pub silver_return: ReturnCell,
    pub silver_value: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SilverTotals {
    pub sp500_value: f64,
    pub silver_value: f64,
}

/// S&P 500 growth against holding the ounces of silver the principal bought.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SilverReport {
    pub principal: f64,
    pub ounces_owned: f64,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub cards: Vec<Card>,
    pub rows: Vec<SilverRow>,
    pub totals: SilverTotals,
}

impl SilverReport {
    pub fn build(scenario: &Scenario) -> Result<Self> {
        let principal = scenario.principal;
        debug!(principal, "computing silver report");

        let sp500 = grow_balance(&SP500_RETURNS, principal)?;
        let silver = translate_prices(&SILVER_PRICES, principal)?;
        let silver_returns = price_returns(&SILVER_PRICES)?;

        let sp500_summary = summarize(&sp500, principal)?;
        let silver_summary = summarize(&silver.balances, principal)?;
        let ratio = (silver_summary.final_value > 0.0)
            .then(|| sp500_summary.final_value / silver_summary.final_value);

        let cards = vec![
            Card {
                label: "S&P 500".to_string(),
                value: sp500_summary.final_value,
                detail: CardDetail::CagrOnly {
                    cagr_pct: sp500_summary.cagr_pct,
                },
            },
            Card {
                label: "Silver".to_string(),
                value: silver_summary.final_value,
                detail: CardDetail::CagrOnly {
                    cagr_pct: silver_summary.cagr_pct,
                },
            },
            Card {
                label: "S&P 500 Advantage".to_string(),
                value: sp500_summary.final_value - silver_summary.final_value,
                detail: CardDetail::Multiple { ratio },
            },
        ];

        let rows = years()
            .into_iter()
            .enumerate()
            .map(|(i, year)| SilverRow {
                year,
                sp500_return: SP500_RETURNS[i].into(),
                sp500_value: sp500[i + 1],
                silver_price: SILVER_PRICES[i + 1],
                silver_return: silver_returns[i].into(),
                silver_value: silver.balances[i + 1],
            })
            .collect();

        Ok(Self {
            principal,
            ounces_owned: silver.units_owned,
            labels: chart_labels(),
            totals: SilverTotals {
                sp500_value: sp500_summary.final_value,
                silver_value: silver_summary.final_value,
            },
            series: vec![
                ChartSeries {
                    label: "S&P 500".to_string(),
                    balances: sp500,
                },
                ChartSeries {
                    label: "Silver".to_string(),
                    balances: silver.balances,
                },
            ],
            cards,
            rows,
        })
    }
}

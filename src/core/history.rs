//! Annual historical series shared by every comparison page.
//!
//! Returns are signed percentages for calendar years 1985..=2024. Prices are
//! year-end spot snapshots for 1984..=2024, so they carry one more point than
//! the returns.

use serde::Serialize;

pub const DATA_VERSION: &str = "1985-2024.1";

pub const BASE_YEAR: u32 = 1984;
pub const FIRST_YEAR: u32 = 1985;
pub const LAST_YEAR: u32 = 2024;
pub const YEAR_COUNT: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;

pub const START_AGE: u32 = 25;
pub const PRINCIPAL: f64 = 10_000.0;

/// S&P 500 total returns, dividends reinvested.
#[rustfmt::skip]
pub const SP500_RETURNS: [f64; YEAR_COUNT] = [
    31.73, 18.67, 5.25, 16.61, 31.69, -3.10, 30.47, 7.62, 10.08, 1.32,
    37.58, 22.96, 33.36, 28.58, 21.04, -9.10, -11.89, -22.10, 28.68, 10.88,
    4.91, 15.79, 5.49, -37.00, 26.46, 15.06, 2.11, 16.00, 32.39, 13.69,
    1.38, 11.96, 21.83, -4.38, 31.49, 18.40, 28.71, -18.11, 26.29, 25.02,
];

#[rustfmt::skip]
pub const TOTAL_MARKET_RETURNS: [f64; YEAR_COUNT] = [
    31.73, 18.67, 5.25, 16.61, 31.69, -3.10, 30.47, 7.62, 10.62, -0.17,
    35.79, 20.96, 30.99, 23.26, 23.81, -10.57, -10.97, -20.96, 31.35, 12.52,
    5.98, 15.51, 5.49, -37.04, 28.70, 17.09, 0.96, 16.25, 33.35, 12.43,
    0.29, 12.53, 21.05, -5.26, 30.65, 20.87, 25.59, -19.60, 25.89, 23.61,
];

#[rustfmt::skip]
pub const BOND_RETURNS: [f64; YEAR_COUNT] = [
    22.10, 15.26, 2.76, 7.89, 14.53, 8.96, 16.00, 7.40, 9.75, -2.92,
    18.47, 3.63, 9.65, 8.69, -0.82, 11.63, 8.44, 10.26, 4.10, 4.34,
    2.43, 4.33, 6.97, 5.24, 5.93, 6.54, 7.84, 4.21, -2.02, 5.97,
    0.55, 2.65, 3.54, 0.01, 8.72, 7.51, -1.54, -13.01, 5.53, 1.25,
];

/// Silver year-end spot prices in USD per troy ounce, 1984 first.
#[rustfmt::skip]
pub const SILVER_PRICES: [f64; YEAR_COUNT + 1] = [
    6.31,
    5.94, 5.34, 6.80, 6.12, 5.63,
    4.07, 3.91, 3.69, 5.21, 4.78,
    5.18, 4.82, 6.06, 5.04, 5.33,
    4.57, 4.52, 4.73, 5.97, 6.82,
    8.83, 12.90, 14.76, 10.79, 16.99,
    30.63, 28.18, 30.23, 19.50, 15.97,
    13.83, 15.94, 16.87, 15.49, 17.85,
    26.49, 23.35, 23.94, 24.09, 29.52,
];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Asset {
    Sp500,
    TotalMarket,
    Bonds,
    Silver,
}

/// How an asset's history is recorded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Series {
    AnnualReturns(&'static [f64]),
    Prices(&'static [f64]),
}

impl Asset {
    pub const ALL: [Asset; 4] = [Asset::Sp500, Asset::TotalMarket, Asset::Bonds, Asset::Silver];

    pub fn label(self) -> &'static str {
        match self {
            Asset::Sp500 => "S&P 500",
            Asset::TotalMarket => "Total US Market",
            Asset::Bonds => "Bonds",
            Asset::Silver => "Silver",
        }
    }

    pub fn series(self) -> Series {
        match self {
            Asset::Sp500 => Series::AnnualReturns(&SP500_RETURNS),
            Asset::TotalMarket => Series::AnnualReturns(&TOTAL_MARKET_RETURNS),
            Asset::Bonds => Series::AnnualReturns(&BOND_RETURNS),
            Asset::Silver => Series::Prices(&SILVER_PRICES),
        }
    }
}

pub fn years() -> Vec<u32> {
    (FIRST_YEAR..=LAST_YEAR).collect()
}

/// One label per balance point: the starting snapshot year, then every return year.
pub fn chart_labels() -> Vec<String> {
    (BASE_YEAR..=LAST_YEAR).map(|y| y.to_string()).collect()
}

pub fn ages(start_age: u32) -> Vec<u32> {
    (0..YEAR_COUNT as u32)
        .map(|i| start_age.saturating_add(i))
        .collect()
}

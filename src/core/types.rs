use serde::Serialize;

/// Blended returns and the balances they compound into.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlidePath {
    pub bond_weights: Vec<f64>,
    pub blended_returns: Vec<f64>,
    pub balances: Vec<f64>,
}

/// Taxable account whose dividends are taxed every year.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDrag {
    pub balances: Vec<f64>,
    pub cost_basis: Vec<f64>,
    pub dividend_taxes: Vec<f64>,
}

impl TaxDrag {
    pub fn total_dividend_tax(&self) -> f64 {
        self.dividend_taxes.iter().sum()
    }
}

/// Fixed number of units bought with the principal at the first price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHolding {
    pub units_owned: f64,
    pub balances: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub final_value: f64,
    pub gain: f64,
    /// Percent, rounded to 2 decimals. `None` when the growth rate is undefined.
    pub cagr_pct: Option<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// A percentage cell with its display classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnCell {
    pub pct: f64,
    pub sign: Sign,
}

impl From<f64> for ReturnCell {
    fn from(pct: f64) -> Self {
        Self {
            pct,
            sign: Sign::of(pct),
        }
    }
}

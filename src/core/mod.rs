mod engine;
mod error;
pub mod history;
mod report;
mod types;

pub use engine::{
    DIVIDEND_TAX_RATE_PCT, DIVIDEND_YIELD_PCT, after_tax_series, blend_glide_path, bond_weight,
    cagr_pct, grow_balance, liquidation_value, price_returns, simulate_tax_drag, summarize,
    translate_prices,
};
pub use error::{CalcError, Result};
pub use report::{
    Card, CardDetail, ChartSeries, DEFAULT_BOND_OFFSET, DEFAULT_CAP_GAINS_RATE, GlidePathReport,
    GlidePathRow, MAX_START_AGE, Page, PageReport, RothReport, RothRow, RothTotals, Scenario,
    SilverReport, SilverRow, SilverTotals, build_report,
};
pub use types::{GlidePath, PriceHolding, ReturnCell, Sign, Summary, TaxDrag};

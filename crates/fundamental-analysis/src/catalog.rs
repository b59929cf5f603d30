//! Metric catalog
//!
//! Documentation and scoring data for every id the engine emits. Bands and
//! confidence weights live here so they can be tuned without touching the
//! calculators.
//!
//! Confidence weights: scored ratios count 1.0, informational amounts and
//! trend readings 0.5, category composites 2.0 and the investment score 3.0.

use serde::{Deserialize, Serialize};

use crate::scoring::BenchmarkBand;

/// Stable metric identifiers
pub mod ids {
    pub const REVENUE_CAGR: &str = "growth.revenue_cagr";
    pub const TOTAL_ASSETS_CAGR: &str = "growth.total_assets_cagr";
    pub const INTANGIBLE_ASSETS_CAGR: &str = "growth.intangible_assets_cagr";
    pub const EPS_CAGR: &str = "growth.eps_cagr";
    pub const BOOK_VALUE_CAGR: &str = "growth.book_value_cagr";
    pub const DIVIDEND_GROWTH: &str = "growth.dividend_growth_rate";

    pub const CURRENT_RATIO: &str = "liquidity.current_ratio";
    pub const QUICK_RATIO: &str = "liquidity.quick_ratio";
    pub const CASH_RATIO: &str = "liquidity.cash_ratio";
    pub const CASH_TO_ASSETS: &str = "liquidity.cash_to_assets";
    pub const WORKING_CAPITAL: &str = "liquidity.working_capital";

    pub const DEBT_TO_EQUITY: &str = "leverage.debt_to_equity";
    pub const DEBT_TO_ASSETS: &str = "leverage.debt_to_assets";
    pub const EQUITY_MULTIPLIER: &str = "leverage.equity_multiplier";
    pub const INTEREST_COVERAGE: &str = "leverage.interest_coverage";
    pub const DEBT_TO_EQUITY_TREND: &str = "leverage.debt_to_equity_trend";

    pub const ROA: &str = "profitability.roa";
    pub const ROE: &str = "profitability.roe";
    pub const OCF_MARGIN: &str = "profitability.ocf_margin";
    pub const AVERAGE_ROE: &str = "profitability.average_roe";
    pub const NET_MARGIN_TTM: &str = "profitability.net_margin_ttm";
    pub const ROE_CONSISTENCY: &str = "profitability.roe_consistency";
    pub const ROE_TREND: &str = "profitability.roe_trend";

    pub const FREE_CASH_FLOW: &str = "cash_flow.free_cash_flow";
    pub const FCF_YIELD: &str = "cash_flow.fcf_yield";
    pub const DIVIDEND_PAYOUT_RATIO: &str = "cash_flow.dividend_payout_ratio";

    pub const INTANGIBLES_TO_ASSETS: &str = "innovation.intangibles_to_assets";
    pub const GOODWILL_TO_ASSETS: &str = "innovation.goodwill_to_assets";
    pub const CAPEX_INTENSITY: &str = "innovation.capex_intensity";

    pub const EPS_GROWTH_YOY: &str = "earnings.eps_growth_yoy";
    pub const EPS_TREND_CONSISTENCY: &str = "earnings.eps_trend_consistency";
    pub const AVERAGE_SURPRISE: &str = "earnings.average_surprise";
    pub const POSITIVE_SURPRISE_RATIO: &str = "earnings.positive_surprise_ratio";
    pub const EPS_VOLATILITY: &str = "earnings.eps_volatility";

    pub const INSIDER_NET_SHARES: &str = "insider.net_shares";
    pub const INSIDER_NET_VALUE: &str = "insider.net_value";
    pub const INSIDER_BULLISHNESS: &str = "insider.bullishness_ratio";

    pub const BOOK_VALUE_PER_SHARE: &str = "per_share.book_value";
    pub const CASH_FLOW_PER_SHARE: &str = "per_share.operating_cash_flow";

    pub const BUSINESS_QUALITY: &str = "quality.business_quality_score";

    pub const GROWTH_SCORE: &str = "composite.growth_score";
    pub const FINANCIAL_HEALTH_SCORE: &str = "composite.financial_health_score";
    pub const PROFITABILITY_SCORE: &str = "composite.profitability_score";
    pub const INNOVATION_SCORE: &str = "composite.innovation_score";
    pub const EARNINGS_QUALITY_SCORE: &str = "composite.earnings_quality_score";
    pub const BUFFETT_SCORE: &str = "composite.buffett_score";
    pub const INVESTMENT_SCORE: &str = "composite.investment_score";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Growth,
    Liquidity,
    Leverage,
    Profitability,
    CashFlow,
    Innovation,
    Earnings,
    Insider,
    PerShare,
    Quality,
    Composite,
}

/// Catalog entry for one metric id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: String,
    pub category: MetricCategory,
    pub display_name: String,
    pub formula: String,
    pub interpretation: String,
    pub significance: String,
    pub limitations: String,
    /// `None` marks an informational metric: raw value only.
    pub band: Option<BenchmarkBand>,
    /// Contribution to the overall confidence figure
    pub weight: f64,
}

struct Entry {
    id: &'static str,
    category: MetricCategory,
    display_name: &'static str,
    formula: &'static str,
    interpretation: &'static str,
    significance: &'static str,
    limitations: &'static str,
    band: Option<(f64, f64, f64)>,
    weight: f64,
}

impl From<Entry> for MetricDefinition {
    fn from(e: Entry) -> Self {
        MetricDefinition {
            id: e.id.to_string(),
            category: e.category,
            display_name: e.display_name.to_string(),
            formula: e.formula.to_string(),
            interpretation: e.interpretation.to_string(),
            significance: e.significance.to_string(),
            limitations: e.limitations.to_string(),
            band: e.band.map(|(f, t, x)| BenchmarkBand::new(f, t, x)),
            weight: e.weight,
        }
    }
}

/// Standard catalog, raw metrics first and composites last.
pub fn default_catalog() -> Vec<MetricDefinition> {
    use MetricCategory::*;

    let entries = vec![
        // Growth
        Entry {
            id: ids::REVENUE_CAGR,
            category: Growth,
            display_name: "Revenue Growth (CAGR)",
            formula: "(newest / oldest)^(1 / periods) - 1 over the revenue proxy",
            interpretation: "Above 8% a year is healthy, above 20% is exceptional",
            significance: "Sustained top-line growth is what compounds intrinsic value",
            limitations: "Statements carry no revenue line; operating cash flow stands in by default",
            band: Some((0.0, 0.08, 0.20)),
            weight: 1.0,
        },
        Entry {
            id: ids::TOTAL_ASSETS_CAGR,
            category: Growth,
            display_name: "Total Assets Growth (CAGR)",
            formula: "(newest / oldest)^(1 / periods) - 1 over total assets",
            interpretation: "Steady asset growth signals reinvestment",
            significance: "Shows whether the balance sheet is expanding",
            limitations: "Acquisitions inflate asset growth without organic progress",
            band: Some((0.0, 0.05, 0.15)),
            weight: 1.0,
        },
        Entry {
            id: ids::INTANGIBLE_ASSETS_CAGR,
            category: Growth,
            display_name: "Intangible Assets Growth (CAGR)",
            formula: "(newest / oldest)^(1 / periods) - 1 over intangible assets",
            interpretation: "Growing intangibles point to investment in IP and brands",
            significance: "Proxy for accumulation of hard-to-copy assets",
            limitations: "Internally developed IP is mostly expensed and never shows up here",
            band: Some((0.0, 0.05, 0.20)),
            weight: 1.0,
        },
        Entry {
            id: ids::EPS_CAGR,
            category: Growth,
            display_name: "EPS Growth (CAGR)",
            formula: "(newest / oldest)^(1 / periods) - 1 over annual reported EPS",
            interpretation: "Above 7% a year beats the long-run market average",
            significance: "Per-share earnings growth drives long-term returns",
            limitations: "Unknown when EPS changed sign inside the window",
            band: Some((0.0, 0.07, 0.20)),
            weight: 1.0,
        },
        Entry {
            id: ids::BOOK_VALUE_CAGR,
            category: Growth,
            display_name: "Book Value Growth (CAGR)",
            formula: "(newest / oldest)^(1 / periods) - 1 over shareholder equity",
            interpretation: "Consistent book value growth indicates retained value creation",
            significance: "Long favoured as a proxy for intrinsic value growth",
            limitations: "Buybacks and dividends reduce equity without destroying value",
            band: Some((0.0, 0.06, 0.15)),
            weight: 1.0,
        },
        Entry {
            id: ids::DIVIDEND_GROWTH,
            category: Growth,
            display_name: "Dividend Growth (YoY)",
            formula: "latest annual dividends / prior annual dividends - 1",
            interpretation: "Steady increases signal confidence in future cash flows",
            significance: "Dividend growth tracks management's view of sustainable earnings",
            limitations: "Unknown when no dividend was paid in either year",
            band: Some((0.0, 0.05, 0.15)),
            weight: 0.5,
        },
        // Liquidity
        Entry {
            id: ids::CURRENT_RATIO,
            category: Liquidity,
            display_name: "Current Ratio",
            formula: "total current assets / total current liabilities",
            interpretation: "Above 1.5 is comfortable, below 1.0 signals pressure",
            significance: "Ability to meet short-term obligations",
            limitations: "Inventory and receivables may not convert to cash quickly",
            band: Some((1.0, 1.5, 3.0)),
            weight: 1.0,
        },
        Entry {
            id: ids::QUICK_RATIO,
            category: Liquidity,
            display_name: "Quick Ratio",
            formula: "liquid current assets / total current liabilities, per configured variant",
            interpretation: "Above 1.0 means obligations are covered without selling inventory",
            significance: "Stricter liquidity test than the current ratio",
            limitations: "Definitions differ between sources; the variant is configurable",
            band: Some((0.5, 1.0, 2.0)),
            weight: 1.0,
        },
        Entry {
            id: ids::CASH_RATIO,
            category: Liquidity,
            display_name: "Cash Ratio",
            formula: "cash and cash equivalents / total current liabilities",
            interpretation: "Above 0.5 is a strong cash buffer",
            significance: "Most conservative liquidity measure",
            limitations: "High values can also mean idle capital",
            band: Some((0.1, 0.5, 1.0)),
            weight: 1.0,
        },
        Entry {
            id: ids::CASH_TO_ASSETS,
            category: Liquidity,
            display_name: "Cash to Total Assets",
            formula: "cash and cash equivalents / total assets",
            interpretation: "Above 10% is strong, below 5% is thin",
            significance: "Cash cushion relative to the size of the business",
            limitations: "Hoarded cash can also mean a lack of reinvestment opportunities",
            band: Some((0.0, 0.1, 0.2)),
            weight: 1.0,
        },
        Entry {
            id: ids::WORKING_CAPITAL,
            category: Liquidity,
            display_name: "Working Capital",
            formula: "total current assets - total current liabilities",
            interpretation: "Positive means short-term assets cover short-term obligations",
            significance: "Operating liquidity in currency terms",
            limitations: "Absolute amount, not comparable across company sizes",
            band: None,
            weight: 0.5,
        },
        // Leverage
        Entry {
            id: ids::DEBT_TO_EQUITY,
            category: Leverage,
            display_name: "Debt to Equity",
            formula: "total debt / total shareholder equity",
            interpretation: "Below 0.5 is conservative, above 2.0 is aggressive",
            significance: "Financial risk taken on through borrowing",
            limitations: "Negative equity after buybacks makes the ratio meaningless",
            band: Some((2.0, 1.0, 0.3)),
            weight: 1.0,
        },
        Entry {
            id: ids::DEBT_TO_ASSETS,
            category: Leverage,
            display_name: "Debt to Assets",
            formula: "total debt / total assets",
            interpretation: "Share of assets financed by debt",
            significance: "Solvency buffer for creditors",
            limitations: "Ignores off-balance-sheet obligations",
            band: Some((0.6, 0.4, 0.1)),
            weight: 1.0,
        },
        Entry {
            id: ids::EQUITY_MULTIPLIER,
            category: Leverage,
            display_name: "Equity Multiplier",
            formula: "total assets / total shareholder equity",
            interpretation: "Lower means less balance sheet leverage",
            significance: "Leverage component of the DuPont decomposition",
            limitations: "Includes non-debt liabilities such as payables",
            band: Some((4.0, 2.5, 1.5)),
            weight: 1.0,
        },
        Entry {
            id: ids::INTEREST_COVERAGE,
            category: Leverage,
            display_name: "Interest Coverage (estimated)",
            formula: "operating cash flow / (interest rate proxy * total debt)",
            interpretation: "Above 5 is comfortable, below 1.5 is a warning",
            significance: "Capacity to service debt from operations",
            limitations: "Interest expense is estimated from a configured rate, not reported",
            band: Some((1.5, 5.0, 15.0)),
            weight: 1.0,
        },
        Entry {
            id: ids::DEBT_TO_EQUITY_TREND,
            category: Leverage,
            display_name: "Debt to Equity Trend",
            formula: "mean D/E of the two latest annual periods - mean D/E of the two oldest in the trailing window",
            interpretation: "Negative means the company is deleveraging",
            significance: "Direction of balance sheet risk over time",
            limitations: "Needs at least three annual periods with debt and positive equity",
            band: Some((0.5, 0.0, -0.3)),
            weight: 0.5,
        },
        // Profitability
        Entry {
            id: ids::ROA,
            category: Profitability,
            display_name: "Return on Assets",
            formula: "net income / average(total assets, current and prior period)",
            interpretation: "Above 5% is solid, above 15% is exceptional",
            significance: "How efficiently the asset base produces profit",
            limitations: "Needs two consecutive balance sheets",
            band: Some((0.0, 0.05, 0.15)),
            weight: 1.0,
        },
        Entry {
            id: ids::ROE,
            category: Profitability,
            display_name: "Return on Equity",
            formula: "net income / average(shareholder equity, current and prior period)",
            interpretation: "Above 12% is good, above 25% is exceptional",
            significance: "Return generated on owners' capital",
            limitations: "Inflated by leverage and by shrinking equity",
            band: Some((0.0, 0.12, 0.25)),
            weight: 1.0,
        },
        Entry {
            id: ids::OCF_MARGIN,
            category: Profitability,
            display_name: "Operating Cash Flow to Net Income",
            formula: "operating cash flow / net income",
            interpretation: "Above 1.0 means earnings are backed by cash",
            significance: "Earnings quality check",
            limitations: "Unknown when net income is zero or negative",
            band: Some((0.5, 1.0, 1.5)),
            weight: 1.0,
        },
        Entry {
            id: ids::AVERAGE_ROE,
            category: Profitability,
            display_name: "Average Return on Equity",
            formula: "mean of net income / equity per period over the trailing window",
            interpretation: "Persistent high ROE suggests a durable advantage",
            significance: "Smooths one-off years out of the ROE picture",
            limitations: "Simple average, periods are not weighted by size",
            band: Some((0.0, 0.12, 0.25)),
            weight: 1.0,
        },
        Entry {
            id: ids::NET_MARGIN_TTM,
            category: Profitability,
            display_name: "Net Margin (TTM)",
            formula: "sum of last four quarters net income / provider revenue TTM",
            interpretation: "Above 10% is healthy for most industries",
            significance: "Share of each revenue dollar kept as profit",
            limitations: "Relies on the provider's revenue estimate",
            band: Some((0.0, 0.10, 0.25)),
            weight: 1.0,
        },
        Entry {
            id: ids::ROE_CONSISTENCY,
            category: Profitability,
            display_name: "ROE Consistency",
            formula: "share of annual periods in the trailing window with net income / equity above 15%",
            interpretation: "1.0 means every year cleared the 15% hurdle",
            significance: "Durable high returns are the mark of a competitive moat",
            limitations: "A hard threshold ignores how far above or below each year landed",
            band: Some((0.2, 0.6, 1.0)),
            weight: 1.0,
        },
        Entry {
            id: ids::ROE_TREND,
            category: Profitability,
            display_name: "ROE Trend",
            formula: "mean ROE of the two latest annual periods - mean ROE of the two oldest in the trailing window",
            interpretation: "Positive means returns on equity are improving",
            significance: "Shows whether profitability is strengthening or eroding",
            limitations: "Needs at least three annual periods with net income and positive equity",
            band: Some((-0.05, 0.0, 0.05)),
            weight: 0.5,
        },
        // Cash flow
        Entry {
            id: ids::FREE_CASH_FLOW,
            category: CashFlow,
            display_name: "Free Cash Flow",
            formula: "operating cash flow - |capital expenditures|",
            interpretation: "Positive means the business funds itself",
            significance: "Cash available to owners after reinvestment",
            limitations: "Absolute amount, not comparable across company sizes",
            band: None,
            weight: 0.5,
        },
        Entry {
            id: ids::FCF_YIELD,
            category: CashFlow,
            display_name: "Free Cash Flow Yield on Assets",
            formula: "free cash flow / total assets",
            interpretation: "Above 5% is strong cash generation",
            significance: "Size-neutral view of free cash flow",
            limitations: "Asset-light businesses score high by construction",
            band: Some((0.0, 0.05, 0.12)),
            weight: 1.0,
        },
        Entry {
            id: ids::DIVIDEND_PAYOUT_RATIO,
            category: CashFlow,
            display_name: "Dividend Payout Ratio",
            formula: "dividend payout / net income",
            interpretation: "Share of earnings paid out to shareholders",
            significance: "Dividend sustainability",
            limitations: "Good and bad values depend on the company's stage",
            band: None,
            weight: 0.5,
        },
        // Innovation
        Entry {
            id: ids::INTANGIBLES_TO_ASSETS,
            category: Innovation,
            display_name: "Intangibles to Assets",
            formula: "intangible assets / total assets",
            interpretation: "Higher means more of the asset base is IP and brands",
            significance: "Proxy for investment in innovation",
            limitations: "Acquired intangibles dominate the figure",
            band: Some((0.0, 0.10, 0.30)),
            weight: 1.0,
        },
        Entry {
            id: ids::GOODWILL_TO_ASSETS,
            category: Innovation,
            display_name: "Goodwill to Assets",
            formula: "goodwill / total assets",
            interpretation: "High values indicate growth through acquisition",
            significance: "Impairment risk exposure",
            limitations: "No universal benchmark",
            band: None,
            weight: 0.5,
        },
        Entry {
            id: ids::CAPEX_INTENSITY,
            category: Innovation,
            display_name: "Capex Intensity",
            formula: "|capital expenditures| / operating cash flow",
            interpretation: "Share of operating cash reinvested in the business",
            significance: "Reinvestment rate",
            limitations: "Maintenance and growth capex are not separated",
            band: Some((0.0, 0.25, 0.50)),
            weight: 1.0,
        },
        // Earnings
        Entry {
            id: ids::EPS_GROWTH_YOY,
            category: Earnings,
            display_name: "EPS Growth (YoY)",
            formula: "eps[0] / eps[1] - 1 over annual reported EPS",
            interpretation: "Above 8% is solid year-over-year growth",
            significance: "Most recent earnings momentum",
            limitations: "Unknown when EPS changed sign",
            band: Some((0.0, 0.08, 0.25)),
            weight: 1.0,
        },
        Entry {
            id: ids::EPS_TREND_CONSISTENCY,
            category: Earnings,
            display_name: "EPS Trend Consistency",
            formula: "share of years where EPS rose over the year before",
            interpretation: "1.0 means EPS rose every year",
            significance: "Predictability of earnings",
            limitations: "Ignores the size of each move",
            band: Some((0.25, 0.6, 1.0)),
            weight: 1.0,
        },
        Entry {
            id: ids::AVERAGE_SURPRISE,
            category: Earnings,
            display_name: "Average Earnings Surprise",
            formula: "mean of (reported - estimated EPS) over recent quarters",
            interpretation: "Positive means the company beats expectations",
            significance: "Management's track record against analyst estimates",
            limitations: "Estimates are often guided lower to be beaten",
            band: Some((-0.1, 0.02, 0.15)),
            weight: 1.0,
        },
        Entry {
            id: ids::POSITIVE_SURPRISE_RATIO,
            category: Earnings,
            display_name: "Positive Surprise Ratio",
            formula: "quarters with reported > estimated / known quarters",
            interpretation: "Above 60% is a consistent beater",
            significance: "Reliability of earnings beats",
            limitations: "Small beats count the same as large ones",
            band: Some((0.25, 0.6, 0.9)),
            weight: 1.0,
        },
        Entry {
            id: ids::EPS_VOLATILITY,
            category: Earnings,
            display_name: "EPS Volatility",
            formula: "population std dev / |mean| of annual EPS over the trailing window",
            interpretation: "Lower means steadier earnings",
            significance: "Earnings stability",
            limitations: "Explodes when mean EPS is near zero",
            band: Some((1.0, 0.3, 0.05)),
            weight: 1.0,
        },
        // Insider
        Entry {
            id: ids::INSIDER_NET_SHARES,
            category: Insider,
            display_name: "Insider Net Shares",
            formula: "shares acquired - shares disposed in the window",
            interpretation: "Positive means insiders are net buyers",
            significance: "Insiders know the business best",
            limitations: "Scheduled sales and option exercises add noise",
            band: None,
            weight: 0.5,
        },
        Entry {
            id: ids::INSIDER_NET_VALUE,
            category: Insider,
            display_name: "Insider Net Value",
            formula: "sum of signed shares * share price in the window",
            interpretation: "Dollar size of net insider activity",
            significance: "Weights conviction by money at stake",
            limitations: "Zero-priced grants contribute nothing",
            band: None,
            weight: 0.5,
        },
        Entry {
            id: ids::INSIDER_BULLISHNESS,
            category: Insider,
            display_name: "Insider Bullishness Ratio",
            formula: "acquisitions / transactions in the window",
            interpretation: "Above 0.5 means more buys than sells",
            significance: "Direction of insider sentiment",
            limitations: "Counts transactions, not their size",
            band: Some((0.0, 0.3, 0.7)),
            weight: 0.5,
        },
        // Per share
        Entry {
            id: ids::BOOK_VALUE_PER_SHARE,
            category: PerShare,
            display_name: "Book Value per Share",
            formula: "total shareholder equity / common shares outstanding",
            interpretation: "Net asset value backing each share",
            significance: "Anchor for asset-based valuation",
            limitations: "Book value understates businesses built on intangible assets",
            band: None,
            weight: 0.5,
        },
        Entry {
            id: ids::CASH_FLOW_PER_SHARE,
            category: PerShare,
            display_name: "Operating Cash Flow per Share",
            formula: "operating cash flow / common shares outstanding at the same fiscal date",
            interpretation: "Cash generated for each share",
            significance: "Harder to manage than earnings per share",
            limitations: "Share count is a period-end figure, not a weighted average",
            band: None,
            weight: 0.5,
        },
        // Quality
        Entry {
            id: ids::BUSINESS_QUALITY,
            category: Quality,
            display_name: "Business Quality Score",
            formula: "share of known strength indicators that hold: three profitable years, growing book value, D/E below 0.5, current ratio above 1.5, positive operating cash flow",
            interpretation: "0.8 or more is excellent, below 0.4 is poor",
            significance: "Checklist view of a durable, conservatively financed business",
            limitations: "Pass or fail checks ignore margins of safety",
            band: Some((0.2, 0.6, 1.0)),
            weight: 1.0,
        },
        // Composites
        Entry {
            id: ids::GROWTH_SCORE,
            category: Composite,
            display_name: "Growth Score",
            formula: "weighted average of growth sub-scores",
            interpretation: "0 to 100, 60 is on target",
            significance: "Overall growth profile",
            limitations: "Unknown sub-scores are dropped and their weight redistributed",
            band: None,
            weight: 2.0,
        },
        Entry {
            id: ids::FINANCIAL_HEALTH_SCORE,
            category: Composite,
            display_name: "Financial Health Score",
            formula: "weighted average of liquidity and leverage sub-scores",
            interpretation: "0 to 100, 60 is on target",
            significance: "Balance sheet resilience",
            limitations: "Unknown sub-scores are dropped and their weight redistributed",
            band: None,
            weight: 2.0,
        },
        Entry {
            id: ids::PROFITABILITY_SCORE,
            category: Composite,
            display_name: "Profitability Score",
            formula: "weighted average of profitability and cash flow sub-scores",
            interpretation: "0 to 100, 60 is on target",
            significance: "Return on capital and margin quality",
            limitations: "Unknown sub-scores are dropped and their weight redistributed",
            band: None,
            weight: 2.0,
        },
        Entry {
            id: ids::INNOVATION_SCORE,
            category: Composite,
            display_name: "Innovation Score",
            formula: "weighted average of intangible and reinvestment sub-scores",
            interpretation: "0 to 100, 60 is on target",
            significance: "Investment in future capacity",
            limitations: "Unknown sub-scores are dropped and their weight redistributed",
            band: None,
            weight: 2.0,
        },
        Entry {
            id: ids::EARNINGS_QUALITY_SCORE,
            category: Composite,
            display_name: "Earnings Quality Score",
            formula: "weighted average of earnings behaviour sub-scores",
            interpretation: "0 to 100, 60 is on target",
            significance: "Consistency and credibility of reported earnings",
            limitations: "Unknown sub-scores are dropped and their weight redistributed",
            band: None,
            weight: 2.0,
        },
        Entry {
            id: ids::BUFFETT_SCORE,
            category: Composite,
            display_name: "Buffett Score",
            formula: "ROE 30%, debt to equity 20%, current ratio 15%, EPS CAGR 20%, cash to assets 15%",
            interpretation: "0 to 100, high values fit a quality value investor",
            significance: "Durable returns on equity with a conservative balance sheet",
            limitations: "A persona view, not a valuation",
            band: None,
            weight: 2.0,
        },
        Entry {
            id: ids::INVESTMENT_SCORE,
            category: Composite,
            display_name: "Investment Score",
            formula: "weighted average of the category composites",
            interpretation: "0 to 100, 60 is on target",
            significance: "Single headline number for the fundamentals",
            limitations: "Collapses many dimensions into one",
            band: None,
            weight: 3.0,
        },
    ];

    entries.into_iter().map(MetricDefinition::from).collect()
}

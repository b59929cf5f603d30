use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Financial statement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    BalanceSheet,
    CashFlow,
    Earnings,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "balance_sheet",
            StatementKind::CashFlow => "cash_flow",
            StatementKind::Earnings => "earnings",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting interval of a statement period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Annual,
    Quarterly,
}

/// Every statement field the engine knows about. Each field belongs to exactly
/// one statement schema, see [`Field::statement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    // Balance sheet
    TotalAssets,
    TotalCurrentAssets,
    TotalCurrentLiabilities,
    TotalLiabilities,
    TotalShareholderEquity,
    CashAndCashEquivalents,
    CashAndShortTermInvestments,
    ShortTermInvestments,
    CurrentNetReceivables,
    Inventory,
    Goodwill,
    IntangibleAssets,
    IntangibleAssetsExcludingGoodwill,
    ShortTermDebt,
    LongTermDebt,
    ShortLongTermDebtTotal,
    CommonStockSharesOutstanding,
    PropertyPlantEquipment,
    RetainedEarnings,

    // Cash flow
    OperatingCashflow,
    CapitalExpenditures,
    NetIncome,
    DividendPayout,
    DividendPayoutCommonStock,
    DepreciationDepletionAndAmortization,
    CashflowFromInvestment,
    CashflowFromFinancing,
    ProfitLoss,

    // Earnings
    ReportedEps,
    EstimatedEps,
    Surprise,
    SurprisePercentage,
}

impl Field {
    pub const ALL: [Field; 32] = [
        Field::TotalAssets,
        Field::TotalCurrentAssets,
        Field::TotalCurrentLiabilities,
        Field::TotalLiabilities,
        Field::TotalShareholderEquity,
        Field::CashAndCashEquivalents,
        Field::CashAndShortTermInvestments,
        Field::ShortTermInvestments,
        Field::CurrentNetReceivables,
        Field::Inventory,
        Field::Goodwill,
        Field::IntangibleAssets,
        Field::IntangibleAssetsExcludingGoodwill,
        Field::ShortTermDebt,
        Field::LongTermDebt,
        Field::ShortLongTermDebtTotal,
        Field::CommonStockSharesOutstanding,
        Field::PropertyPlantEquipment,
        Field::RetainedEarnings,
        Field::OperatingCashflow,
        Field::CapitalExpenditures,
        Field::NetIncome,
        Field::DividendPayout,
        Field::DividendPayoutCommonStock,
        Field::DepreciationDepletionAndAmortization,
        Field::CashflowFromInvestment,
        Field::CashflowFromFinancing,
        Field::ProfitLoss,
        Field::ReportedEps,
        Field::EstimatedEps,
        Field::Surprise,
        Field::SurprisePercentage,
    ];

    /// The statement schema this field belongs to.
    pub fn statement(&self) -> StatementKind {
        use Field::*;
        match self {
            TotalAssets
            | TotalCurrentAssets
            | TotalCurrentLiabilities
            | TotalLiabilities
            | TotalShareholderEquity
            | CashAndCashEquivalents
            | CashAndShortTermInvestments
            | ShortTermInvestments
            | CurrentNetReceivables
            | Inventory
            | Goodwill
            | IntangibleAssets
            | IntangibleAssetsExcludingGoodwill
            | ShortTermDebt
            | LongTermDebt
            | ShortLongTermDebtTotal
            | CommonStockSharesOutstanding
            | PropertyPlantEquipment
            | RetainedEarnings => StatementKind::BalanceSheet,

            OperatingCashflow
            | CapitalExpenditures
            | NetIncome
            | DividendPayout
            | DividendPayoutCommonStock
            | DepreciationDepletionAndAmortization
            | CashflowFromInvestment
            | CashflowFromFinancing
            | ProfitLoss => StatementKind::CashFlow,

            ReportedEps | EstimatedEps | Surprise | SurprisePercentage => StatementKind::Earnings,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use Field::*;
        match self {
            TotalAssets => "total_assets",
            TotalCurrentAssets => "total_current_assets",
            TotalCurrentLiabilities => "total_current_liabilities",
            TotalLiabilities => "total_liabilities",
            TotalShareholderEquity => "total_shareholder_equity",
            CashAndCashEquivalents => "cash_and_cash_equivalents",
            CashAndShortTermInvestments => "cash_and_short_term_investments",
            ShortTermInvestments => "short_term_investments",
            CurrentNetReceivables => "current_net_receivables",
            Inventory => "inventory",
            Goodwill => "goodwill",
            IntangibleAssets => "intangible_assets",
            IntangibleAssetsExcludingGoodwill => "intangible_assets_excluding_goodwill",
            ShortTermDebt => "short_term_debt",
            LongTermDebt => "long_term_debt",
            ShortLongTermDebtTotal => "short_long_term_debt_total",
            CommonStockSharesOutstanding => "common_stock_shares_outstanding",
            PropertyPlantEquipment => "property_plant_equipment",
            RetainedEarnings => "retained_earnings",
            OperatingCashflow => "operating_cashflow",
            CapitalExpenditures => "capital_expenditures",
            NetIncome => "net_income",
            DividendPayout => "dividend_payout",
            DividendPayoutCommonStock => "dividend_payout_common_stock",
            DepreciationDepletionAndAmortization => "depreciation_depletion_and_amortization",
            CashflowFromInvestment => "cashflow_from_investment",
            CashflowFromFinancing => "cashflow_from_financing",
            ProfitLoss => "profit_loss",
            ReportedEps => "reported_eps",
            EstimatedEps => "estimated_eps",
            Surprise => "surprise",
            SurprisePercentage => "surprise_percentage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reporting interval of a statement.
///
/// A field missing from `values` and a field mapped to `None` are both unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub fiscal_date_ending: Option<NaiveDate>,
    #[serde(default)]
    pub reported_currency: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<Field, Option<f64>>,
}

impl Period {
    pub fn new(fiscal_date_ending: NaiveDate) -> Self {
        Self {
            fiscal_date_ending: Some(fiscal_date_ending),
            reported_currency: Some("USD".to_string()),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter, mostly used when assembling histories by hand.
    pub fn with(mut self, field: Field, value: impl Into<Option<f64>>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        self.values.get(&field).copied().flatten()
    }
}

/// Annual and quarterly periods of one statement, most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementHistory {
    pub kind: StatementKind,
    #[serde(default)]
    pub annual: Vec<Period>,
    /// Providers do not always publish quarterly reports.
    #[serde(default)]
    pub quarterly: Option<Vec<Period>>,
}

impl StatementHistory {
    pub fn empty(kind: StatementKind) -> Self {
        Self {
            kind,
            annual: Vec::new(),
            quarterly: None,
        }
    }

    pub fn periods(&self, period_kind: PeriodKind) -> &[Period] {
        match period_kind {
            PeriodKind::Annual => &self.annual,
            PeriodKind::Quarterly => self.quarterly.as_deref().unwrap_or(&[]),
        }
    }

    /// Most recent fiscal date across annual and quarterly periods.
    pub fn latest_fiscal_date(&self) -> Option<NaiveDate> {
        self.annual
            .iter()
            .chain(self.quarterly.iter().flatten())
            .filter_map(|p| p.fiscal_date_ending)
            .max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "A")]
    Acquisition,
    #[serde(rename = "D")]
    Disposal,
}

/// Insider transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTransaction {
    pub transaction_date: NaiveDate,
    pub acquisition_or_disposal: TransactionType,
    pub shares: f64,
    pub share_price: f64,
    #[serde(default)]
    pub executive_title: Option<String>,
}

/// Static company overview fields published by the data provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    /// Provider's ticker, which may differ from the requested symbol for share classes
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub market_capitalization: Option<f64>,
    #[serde(default)]
    pub revenue_ttm: Option<f64>,
    #[serde(default)]
    pub gross_profit_ttm: Option<f64>,
    #[serde(default)]
    pub profit_margin: Option<f64>,
    #[serde(default)]
    pub operating_margin_ttm: Option<f64>,
}

/// Complete statement history for one ticker. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerHistory {
    pub symbol: String,
    #[serde(default)]
    pub overview: CompanyOverview,
    pub balance_sheet: StatementHistory,
    pub cash_flow: StatementHistory,
    pub earnings: StatementHistory,
    #[serde(default)]
    pub insider_transactions: Vec<InsiderTransaction>,
}

impl TickerHistory {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            overview: CompanyOverview::default(),
            balance_sheet: StatementHistory::empty(StatementKind::BalanceSheet),
            cash_flow: StatementHistory::empty(StatementKind::CashFlow),
            earnings: StatementHistory::empty(StatementKind::Earnings),
            insider_transactions: Vec::new(),
        }
    }

    pub fn statement(&self, kind: StatementKind) -> &StatementHistory {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::CashFlow => &self.cash_flow,
            StatementKind::Earnings => &self.earnings,
        }
    }

    /// Most recent fiscal date across every statement type.
    pub fn latest_fiscal_date(&self) -> Option<NaiveDate> {
        [&self.balance_sheet, &self.cash_flow, &self.earnings]
            .iter()
            .filter_map(|s| s.latest_fiscal_date())
            .max()
    }
}

/// Lookback rule applied to insider transactions. Echoed in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsiderWindow {
    /// The N most recent transactions by date
    LastTransactions(usize),
    /// Transactions dated within the last N days of the evaluation date
    LastDays(i64),
}

impl fmt::Display for InsiderWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsiderWindow::LastTransactions(n) => write!(f, "last {} transactions", n),
            InsiderWindow::LastDays(d) => write!(f, "last {} days", d),
        }
    }
}

/// One computed metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub id: String,
    pub raw: Option<f64>,
    pub normalized: Option<f64>,
    /// Fraction (0.0 to 1.0) of constituent inputs that were present
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MetricResult {
    pub fn is_known(&self) -> bool {
        self.raw.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessBand {
    Current,
    Acceptable,
    Stale,
}

impl FreshnessBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessBand::Current => "Current",
            FreshnessBand::Acceptable => "Acceptable",
            FreshnessBand::Stale => "Stale",
        }
    }
}

/// Age of the most recent fiscal period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freshness {
    pub latest_fiscal_date: Option<NaiveDate>,
    pub age_days: Option<i64>,
    pub score: Option<f64>,
    pub band: Option<FreshnessBand>,
}

/// Full output of one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub config_version: String,
    pub metrics: BTreeMap<String, MetricResult>,
    pub freshness: Freshness,
    /// Weighted share of known metrics, 0 to 100
    pub overall_confidence: f64,
    pub known_metrics: usize,
    pub total_metrics: usize,
    pub insider_window: InsiderWindow,
}

impl MetricsReport {
    pub fn get(&self, id: &str) -> Option<&MetricResult> {
        self.metrics.get(id)
    }

    pub fn raw(&self, id: &str) -> Option<f64> {
        self.metrics.get(id).and_then(|m| m.raw)
    }

    pub fn normalized(&self, id: &str) -> Option<f64> {
        self.metrics.get(id).and_then(|m| m.normalized)
    }
}

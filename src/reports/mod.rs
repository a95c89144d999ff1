//! Reports module for fintrack
//!
//! Pure aggregation over fetched rows: monthly income/expense series,
//! expense totals per category, cash-flow summaries over a date range,
//! budget and goal progress, and the dashboard overview. Nothing in here
//! talks to the backend.

pub mod category_breakdown;
pub mod monthly;
pub mod overview;
pub mod progress;
pub mod range;
pub mod summary;

pub use category_breakdown::{category_breakdown, CategoryTotal, DEFAULT_TOP_CATEGORIES};
pub use monthly::{monthly_series, MonthlyTotals};
pub use overview::FinancialOverview;
pub use progress::{BudgetProgress, GoalProgress};
pub use range::{DateRange, DateRangePreset};
pub use summary::CashFlowSummary;

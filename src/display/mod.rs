//! Display formatting for terminal output
//!
//! Plain-text tables, detail views and progress bars. Every function takes
//! the currency symbol from settings and returns a `String`; printing is
//! left to the CLI.

pub mod account;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_budget_list, format_goal_list};
pub use category::format_category_list;
pub use dashboard::{format_dashboard, format_profile};
pub use report::{
    format_cash_flow_summary, format_category_breakdown, format_monthly_series, format_overview,
};
pub use transaction::{format_transaction_details, format_transaction_list};

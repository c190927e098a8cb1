//! Farm record keeping: expenses, egg sales, egg production, feed purchases,
//! salaries and users, plus the income statement derived from them.
//!
//! All operations go through [`Engine`], which owns the database connection.
//! Amounts are signed integers in the smallest currency unit.

pub use commands::{
    ExpenseUpdate, FeedUpdate, NewExpense, NewFeedPurchase, NewProduction, NewSalary, NewSale,
    NewUser, ProductionUpdate, SalaryUpdate, SaleUpdate,
};
pub use error::EngineError;
pub use expenses::Expense;
pub use feed::FeedPurchase;
pub use heads::{COGS_HEADS, CostBucket, ExpenseHead, OPEX_HEADS};
pub use income_statement::{
    CogsBreakdown, HeadTotal, IncomeStatement, IncomeStore, OperatingExpenses, ReportEnvelope,
    generate_income_statement,
};
pub use ops::{
    Engine, EngineBuilder, ExpenseFilter, ExpenseSummary, FeedFilter, FeedSummary, NamedTotal,
    ProductionSummary, SalaryFilter, SalarySummary, SaleFilter, SalesSummary,
};
pub use pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PageRequest};
pub use period::{MonthToken, PeriodFilter, RecordFilter};
pub use production::{EGGS_PER_CRATE, ProductionRecord, crates_and_pieces};
pub use sales::Sale;
pub use salaries::Salary;
pub use users::{Actor, Role, User};
pub use util::normalize_farm;

mod commands;
mod error;
mod expenses;
mod feed;
mod heads;
mod income_statement;
mod ops;
mod pagination;
mod period;
mod production;
mod salaries;
mod sales;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

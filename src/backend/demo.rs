//! Sample data for `--demo`
//!
//! Seeds a [`MemoryBackend`] with one user's accounts, categories, about
//! three months of transactions, budgets, savings goals and a profile.
//! Dates are relative to the day the demo starts so the dashboard always
//! has something to show for the current month.

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{Backend, BackendResult, Collection, MemoryBackend, Session, StaticSession};
use crate::models::budget::last_day_of_month;
use crate::models::UserId;

/// Fixed identity of the demo user
pub const DEMO_USER: Uuid = Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0001);
pub const DEMO_EMAIL: &str = "demo@fintrack.example";

/// Session for the demo user
pub fn demo_session() -> StaticSession {
    StaticSession::new(Some(Session {
        user_id: UserId::from_uuid(DEMO_USER),
        access_token: String::new(),
        email: Some(DEMO_EMAIL.to_string()),
        expires_at: None,
    }))
}

/// A backend filled with sample data as of `today`
pub async fn demo_backend(today: NaiveDate) -> BackendResult<MemoryBackend> {
    let backend = MemoryBackend::new();
    seed(&backend, today).await?;
    Ok(backend)
}

struct Ids {
    checking: Uuid,
    savings: Uuid,
    card: Uuid,
    wallet: Uuid,
    salary: Uuid,
    freelance: Uuid,
    groceries: Uuid,
    dining: Uuid,
    rent: Uuid,
    transport: Uuid,
    utilities: Uuid,
    entertainment: Uuid,
    health: Uuid,
}

impl Ids {
    fn new() -> Self {
        Self {
            checking: Uuid::new_v4(),
            savings: Uuid::new_v4(),
            card: Uuid::new_v4(),
            wallet: Uuid::new_v4(),
            salary: Uuid::new_v4(),
            freelance: Uuid::new_v4(),
            groceries: Uuid::new_v4(),
            dining: Uuid::new_v4(),
            rent: Uuid::new_v4(),
            transport: Uuid::new_v4(),
            utilities: Uuid::new_v4(),
            entertainment: Uuid::new_v4(),
            health: Uuid::new_v4(),
        }
    }
}

/// Insert the sample rows into `backend`
pub async fn seed(backend: &MemoryBackend, today: NaiveDate) -> BackendResult<()> {
    let ids = Ids::new();
    let user = DEMO_USER.to_string();

    backend.insert(Collection::Accounts, accounts(&ids, &user)).await?;
    backend.insert(Collection::Categories, categories(&ids, &user)).await?;
    backend
        .insert(Collection::Transactions, transactions(&ids, &user, today))
        .await?;
    backend
        .insert(Collection::Budgets, budgets(&ids, &user, today))
        .await?;
    backend
        .insert(Collection::SavingsGoals, goals(&user, today))
        .await?;
    backend
        .insert(
            Collection::Profiles,
            vec![json!({
                "user_id": user,
                "full_name": "Demo User",
                "email": DEMO_EMAIL,
                "timezone": "UTC",
                "currency": "USD",
            })],
        )
        .await?;
    Ok(())
}

fn accounts(ids: &Ids, user: &str) -> Vec<Value> {
    vec![
        json!({"id": ids.checking.to_string(), "user_id": user, "name": "Checking", "type": "bank", "balance": 3240.18}),
        json!({"id": ids.savings.to_string(), "user_id": user, "name": "Savings", "type": "bank", "balance": 12500.00}),
        json!({"id": ids.card.to_string(), "user_id": user, "name": "Visa", "type": "credit_card", "balance": -642.35}),
        json!({"id": ids.wallet.to_string(), "user_id": user, "name": "Wallet", "type": "cash", "balance": 86.50}),
        json!({"user_id": user, "name": "Old Brokerage", "type": "investment", "balance": 0, "is_active": false}),
    ]
}

fn categories(ids: &Ids, user: &str) -> Vec<Value> {
    let rows = [
        (ids.salary, "Salary", "income", "#22c55e"),
        (ids.freelance, "Freelance", "income", "#10b981"),
        (ids.groceries, "Groceries", "expense", "#ef4444"),
        (ids.dining, "Dining Out", "expense", "#f97316"),
        (ids.rent, "Rent", "expense", "#8b5cf6"),
        (ids.transport, "Transport", "expense", "#3b82f6"),
        (ids.utilities, "Utilities", "expense", "#eab308"),
        (ids.entertainment, "Entertainment", "expense", "#ec4899"),
        (ids.health, "Health", "expense", "#14b8a6"),
    ];
    rows.iter()
        .map(|(id, name, ty, color)| {
            json!({
                "id": id.to_string(),
                "user_id": user,
                "name": name,
                "type": ty,
                "color": color,
                "is_default": true,
            })
        })
        .collect()
}

/// The same calendar day in an earlier month, clamped to the month's end
fn day_in_month(today: NaiveDate, months_back: u32, day: u32) -> NaiveDate {
    let mut first = today.with_day(1).unwrap_or(today);
    for _ in 0..months_back {
        first = first
            .pred_opt()
            .and_then(|d| d.with_day(1))
            .unwrap_or(first);
    }
    let last = last_day_of_month(first);
    first.with_day(day).unwrap_or(last).min(last)
}

fn transactions(ids: &Ids, user: &str, today: NaiveDate) -> Vec<Value> {
    // (category, account, dollars, day of month, description)
    let monthly: [(Uuid, Uuid, f64, u32, &str); 10] = [
        (ids.salary, ids.checking, 4200.00, 1, "Monthly salary"),
        (ids.rent, ids.checking, -1450.00, 2, "Rent"),
        (ids.utilities, ids.checking, -128.40, 5, "Electricity and water"),
        (ids.groceries, ids.card, -96.12, 4, "Supermarket"),
        (ids.groceries, ids.wallet, -23.80, 9, "Farmers market"),
        (ids.transport, ids.card, -60.00, 7, "Transit pass"),
        (ids.dining, ids.card, -42.75, 8, "Dinner with friends"),
        (ids.groceries, ids.card, -118.64, 12, "Supermarket"),
        (ids.entertainment, ids.card, -15.99, 14, "Streaming subscription"),
        (ids.dining, ids.wallet, -12.40, 3, "Lunch"),
    ];

    let mut rows = Vec::new();
    for months_back in (0..3).rev() {
        for (category, account, amount, day, description) in monthly {
            let date = day_in_month(today, months_back, day);
            if date > today {
                continue;
            }
            rows.push(entry(user, account, category, amount, date, description));
        }
    }

    let older = today - Duration::days(40);
    rows.push(entry(user, ids.checking, ids.freelance, 850.00, older, "Website project"));
    rows.push(entry(user, ids.card, ids.health, -64.20, older, "Pharmacy"));

    // One transfer per month into savings
    for months_back in (0..3).rev() {
        let date = day_in_month(today, months_back, 1);
        rows.push(json!({
            "user_id": user, "account_id": ids.checking.to_string(),
            "to_account_id": ids.savings.to_string(), "amount": -500.00, "type": "transfer",
            "transaction_date": date.to_string(), "description": "Transfer to Savings: Monthly saving",
        }));
        rows.push(json!({
            "user_id": user, "account_id": ids.savings.to_string(),
            "to_account_id": ids.checking.to_string(), "amount": 500.00, "type": "transfer",
            "transaction_date": date.to_string(), "description": "Transfer from Checking: Monthly saving",
        }));
    }
    rows
}

fn entry(
    user: &str,
    account: Uuid,
    category: Uuid,
    amount: f64,
    date: NaiveDate,
    description: &str,
) -> Value {
    json!({
        "user_id": user,
        "account_id": account.to_string(),
        "category_id": category.to_string(),
        "amount": amount,
        "type": if amount < 0.0 { "expense" } else { "income" },
        "transaction_date": date.to_string(),
        "description": description,
    })
}

fn budgets(ids: &Ids, user: &str, today: NaiveDate) -> Vec<Value> {
    let start = today.with_day(1).unwrap_or(today).to_string();
    let end = last_day_of_month(today).to_string();
    [
        ("Groceries", ids.groceries, 400.00),
        ("Eating out", ids.dining, 50.00),
        ("Fun money", ids.entertainment, 80.00),
    ]
    .iter()
    .map(|(name, category, amount)| {
        json!({
            "user_id": user,
            "name": name,
            "category_id": category.to_string(),
            "amount": amount,
            "period_start": start,
            "period_end": end,
        })
    })
    .collect()
}

fn goals(user: &str, today: NaiveDate) -> Vec<Value> {
    vec![
        json!({
            "user_id": user, "name": "Emergency fund", "target_amount": 10000.00,
            "current_amount": 6200.00, "description": "Six months of expenses",
            "target_date": (today + Duration::days(240)).to_string(),
        }),
        json!({
            "user_id": user, "name": "Summer trip", "target_amount": 2500.00,
            "current_amount": 900.00, "target_date": (today + Duration::days(120)).to_string(),
        }),
        json!({
            "user_id": user, "name": "New laptop", "target_amount": 1800.00,
            "current_amount": null,
        }),
    ]
}

//! Monthly balance arithmetic.
//!
//! Pure reductions over already-loaded rows; the handlers fetch users, fixed
//! expenses, and the month's expenses once and derive everything here:
//!
//! `remaining = (contributions + extra income) - fixed - variable - rollover out`

use serde::Serialize;
use uuid::Uuid;

use models::expense::{self, ExpenseType};
use models::user;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub contributions_cents: i64,
    pub extra_income_cents: i64,
    pub total_income_cents: i64,
    pub total_fixed_cents: i64,
    pub total_variable_cents: i64,
    pub rollover_out_cents: i64,
    pub remaining_cents: i64,
    /// Income left after fixed costs; the budget the variable spend burns.
    pub disposable_cents: i64,
}

impl MonthTotals {
    /// Share of the disposable budget already spent on variable expenses.
    pub fn spent_pct(&self) -> f64 {
        if self.disposable_cents > 0 {
            self.total_variable_cents as f64 / self.disposable_cents as f64 * 100.0
        } else {
            0.0
        }
    }
}

fn sum_of(expenses: &[expense::Model], ty: ExpenseType) -> i64 {
    expenses.iter().filter(|e| e.is_type(ty)).map(|e| e.amount_cents).sum()
}

/// `fixed` holds the recurring FIXED expenses; `monthly` holds the month's
/// VARIABLE / INCOME / ROLLOVER rows.
pub fn month_totals(
    users: &[user::Model],
    fixed: &[expense::Model],
    monthly: &[expense::Model],
) -> MonthTotals {
    let contributions_cents: i64 = users.iter().map(|u| u.amount_cents).sum();
    let extra_income_cents = sum_of(monthly, ExpenseType::Income);
    let total_income_cents = contributions_cents + extra_income_cents;
    let total_fixed_cents: i64 = fixed.iter().map(|e| e.amount_cents).sum();
    let total_variable_cents = sum_of(monthly, ExpenseType::Variable);
    let rollover_out_cents = sum_of(monthly, ExpenseType::Rollover);

    MonthTotals {
        contributions_cents,
        extra_income_cents,
        total_income_cents,
        total_fixed_cents,
        total_variable_cents,
        rollover_out_cents,
        remaining_cents: total_income_cents
            - total_fixed_cents
            - total_variable_cents
            - rollover_out_cents,
        disposable_cents: total_income_cents - total_fixed_cents,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub total_cents: i64,
    pub share_pct: f64,
}

/// Actual spend (FIXED + in-month VARIABLE) grouped by category, zero totals
/// dropped, largest first. INCOME and ROLLOVER rows never count as spend.
pub fn category_breakdown(
    fixed: &[expense::Model],
    monthly: &[expense::Model],
) -> Vec<CategoryTotal> {
    let mut totals: Vec<(Uuid, i64)> = Vec::new();
    let spend = fixed
        .iter()
        .filter(|e| e.is_type(ExpenseType::Fixed))
        .chain(monthly.iter().filter(|e| e.is_type(ExpenseType::Variable)));
    for e in spend {
        match totals.iter_mut().find(|(id, _)| *id == e.category_id) {
            Some((_, total)) => *total += e.amount_cents,
            None => totals.push((e.category_id, e.amount_cents)),
        }
    }
    totals.retain(|(_, total)| *total > 0);
    // largest first; id as tie-breaker keeps the order stable
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let grand_total: i64 = totals.iter().map(|(_, t)| t).sum();
    totals
        .into_iter()
        .map(|(category_id, total_cents)| CategoryTotal {
            category_id,
            total_cents,
            share_pct: if grand_total > 0 {
                total_cents as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSpend {
    pub user_id: Uuid,
    pub contribution_cents: i64,
    pub spent_cents: i64,
    pub remaining_cents: i64,
    pub spent_pct: f64,
}

/// Per-user variable spend for the month, measured against each user's
/// monthly contribution.
pub fn user_breakdown(users: &[user::Model], monthly: &[expense::Model]) -> Vec<UserSpend> {
    users
        .iter()
        .map(|u| {
            let spent_cents: i64 = monthly
                .iter()
                .filter(|e| e.paid_by_id == u.id && e.is_type(ExpenseType::Variable))
                .map(|e| e.amount_cents)
                .sum();
            UserSpend {
                user_id: u.id,
                contribution_cents: u.amount_cents,
                spent_cents,
                remaining_cents: u.amount_cents - spent_cents,
                spent_pct: if u.amount_cents > 0 {
                    spent_cents as f64 / u.amount_cents as f64 * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mk_user(amount_cents: i64) -> user::Model {
        let now = Utc::now().into();
        user::Model {
            id: Uuid::new_v4(),
            name: "Persona".into(),
            amount_cents,
            color: "indigo".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn mk_expense(ty: ExpenseType, amount_cents: i64) -> expense::Model {
        let now = Utc::now().into();
        expense::Model {
            id: Uuid::new_v4(),
            description: "x".into(),
            amount_cents,
            date: now,
            expense_type: ty.as_str().into(),
            category_id: Uuid::new_v4(),
            paid_by_id: Uuid::new_v4(),
            payment_method_id: None,
            created_at: now,
        }
    }

    #[test]
    fn remaining_balance_formula() {
        let users = vec![mk_user(100_000), mk_user(50_000)];
        let fixed = vec![mk_expense(ExpenseType::Fixed, 40_000)];
        let monthly = vec![
            mk_expense(ExpenseType::Variable, 30_000),
            mk_expense(ExpenseType::Income, 20_000),
            mk_expense(ExpenseType::Rollover, 10_000),
        ];

        let t = month_totals(&users, &fixed, &monthly);
        assert_eq!(t.contributions_cents, 150_000);
        assert_eq!(t.extra_income_cents, 20_000);
        assert_eq!(t.total_income_cents, 170_000);
        assert_eq!(t.total_fixed_cents, 40_000);
        assert_eq!(t.total_variable_cents, 30_000);
        assert_eq!(t.rollover_out_cents, 10_000);
        // 170000 - 40000 - 30000 - 10000
        assert_eq!(t.remaining_cents, 90_000);
        assert_eq!(t.disposable_cents, 130_000);
    }

    #[test]
    fn remaining_can_go_negative() {
        let users = vec![mk_user(10_000)];
        let fixed = vec![mk_expense(ExpenseType::Fixed, 25_000)];
        let t = month_totals(&users, &fixed, &[]);
        assert_eq!(t.remaining_cents, -15_000);
        assert_eq!(t.spent_pct(), 0.0); // disposable <= 0
    }

    #[test]
    fn spent_pct_measures_variable_against_disposable() {
        let users = vec![mk_user(100_000)];
        let fixed = vec![mk_expense(ExpenseType::Fixed, 50_000)];
        let monthly = vec![mk_expense(ExpenseType::Variable, 25_000)];
        let t = month_totals(&users, &fixed, &monthly);
        assert!((t.spent_pct() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_inputs_yield_zero_totals() {
        let t = month_totals(&[], &[], &[]);
        assert_eq!(t, MonthTotals::default());
    }

    #[test]
    fn category_breakdown_groups_and_sorts() {
        let cat_a = Uuid::new_v4();
        let cat_b = Uuid::new_v4();

        let mut f1 = mk_expense(ExpenseType::Fixed, 10_000);
        f1.category_id = cat_a;
        let mut v1 = mk_expense(ExpenseType::Variable, 30_000);
        v1.category_id = cat_b;
        let mut v2 = mk_expense(ExpenseType::Variable, 5_000);
        v2.category_id = cat_a;
        // income and rollover must not show up as spend
        let mut inc = mk_expense(ExpenseType::Income, 99_000);
        inc.category_id = cat_b;
        let mut ro = mk_expense(ExpenseType::Rollover, 99_000);
        ro.category_id = cat_a;

        let breakdown = category_breakdown(&[f1], &[v1, v2, inc, ro]);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category_id, cat_b);
        assert_eq!(breakdown[0].total_cents, 30_000);
        assert_eq!(breakdown[1].category_id, cat_a);
        assert_eq!(breakdown[1].total_cents, 15_000);
        let pct_sum: f64 = breakdown.iter().map(|c| c.share_pct).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn user_breakdown_counts_only_own_variable_spend() {
        let u1 = mk_user(50_000);
        let u2 = mk_user(0);

        let mut spent = mk_expense(ExpenseType::Variable, 20_000);
        spent.paid_by_id = u1.id;
        let mut other = mk_expense(ExpenseType::Variable, 7_000);
        other.paid_by_id = u2.id;
        let mut income = mk_expense(ExpenseType::Income, 9_000);
        income.paid_by_id = u1.id;

        let stats = user_breakdown(&[u1.clone(), u2.clone()], &[spent, other, income]);
        assert_eq!(stats[0].spent_cents, 20_000);
        assert_eq!(stats[0].remaining_cents, 30_000);
        assert!((stats[0].spent_pct - 40.0).abs() < f64::EPSILON);
        // zero contribution never divides
        assert_eq!(stats[1].spent_cents, 7_000);
        assert_eq!(stats[1].spent_pct, 0.0);
    }
}

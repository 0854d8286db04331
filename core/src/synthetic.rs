//! Synthetic bank-customer dataset with a known churn structure.
//!
//! Produces the prepared table shape (identifier columns already absent)
//! with every required column. Churn probability per customer:
//!   base 8%
//!   + 14% in Germany
//!   +  8% when inactive
//!   + 15% over age 45, another 10% over 55
//!   + 50% holding 3 or 4 products, − 4% holding exactly 2
//!   +  4% with a non-zero balance
//!   clamped to [1%, 95%].

use crate::{
    error::{InsightsError, InsightsResult},
    rng::{DatasetRng, Stream},
    stats::round_to,
    table::{Column, CustomerTable},
};

const GEOGRAPHIES: [(&str, f64); 3] = [("France", 0.50), ("Germany", 0.25), ("Spain", 0.25)];
const GENDERS: [(&str, f64); 2] = [("Male", 0.55), ("Female", 0.45)];
const PRODUCT_COUNTS: [(f64, f64); 4] = [(1.0, 0.50), (2.0, 0.46), (3.0, 0.03), (4.0, 0.01)];

const ZERO_BALANCE_SHARE: f64 = 0.36;
const CARD_HOLDER_SHARE: f64 = 0.70;
const ACTIVE_MEMBER_SHARE: f64 = 0.52;

struct Customer {
    credit_score: f64,
    geography:    &'static str,
    gender:       &'static str,
    age:          f64,
    tenure:       f64,
    balance:      f64,
    products:     f64,
    has_card:     f64,
    active:       f64,
    salary:       f64,
    exited:       f64,
}

fn churn_probability(c: &Customer) -> f64 {
    let mut p: f64 = 0.08;
    if c.geography == "Germany" {
        p += 0.14;
    }
    if c.active == 0.0 {
        p += 0.08;
    }
    if c.age > 45.0 {
        p += 0.15;
    }
    if c.age > 55.0 {
        p += 0.10;
    }
    if c.products >= 3.0 {
        p += 0.50;
    } else if c.products == 2.0 {
        p -= 0.04;
    }
    if c.balance > 0.0 {
        p += 0.04;
    }
    p.clamp(0.01, 0.95)
}

/// Generate `rows` customers from `seed`. The same seed always yields the
/// same table.
pub fn generate(seed: u64, rows: usize) -> InsightsResult<CustomerTable> {
    if rows == 0 {
        return Err(InsightsError::EmptyDataset);
    }

    let mut demo = DatasetRng::new(seed, Stream::Demographics);
    let mut accounts = DatasetRng::new(seed, Stream::Accounts);
    let mut outcome = DatasetRng::new(seed, Stream::Outcome);

    let customers: Vec<Customer> = (0..rows)
        .map(|_| {
            let mut c = Customer {
                credit_score: demo.normal(650.0, 96.0).clamp(350.0, 850.0).round(),
                geography:    demo.weighted(&GEOGRAPHIES).copied().unwrap_or("France"),
                gender:       demo.weighted(&GENDERS).copied().unwrap_or("Male"),
                age:          demo.normal(39.0, 10.0).clamp(18.0, 92.0).round(),
                tenure:       accounts.next_u64_below(11) as f64,
                balance:      0.0,
                products:     accounts.weighted(&PRODUCT_COUNTS).copied().unwrap_or(1.0),
                has_card:     f64::from(u8::from(accounts.chance(CARD_HOLDER_SHARE))),
                active:       f64::from(u8::from(accounts.chance(ACTIVE_MEMBER_SHARE))),
                salary:       round_to(accounts.uniform(11.58, 199_992.48), 2),
                exited:       0.0,
            };
            if !accounts.chance(ZERO_BALANCE_SHARE) {
                c.balance = round_to(accounts.normal(120_000.0, 30_000.0).max(1_000.0), 2);
            }
            c.exited = f64::from(u8::from(outcome.chance(churn_probability(&c))));
            c
        })
        .collect();

    log::debug!("synthetic: generated {rows} customers from seed {seed}");

    let numeric = |f: fn(&Customer) -> f64| customers.iter().map(f).collect::<Vec<_>>();
    CustomerTable::from_columns(vec![
        Column::numeric("CreditScore", numeric(|c| c.credit_score)),
        Column::categorical("Geography", customers.iter().map(|c| c.geography)),
        Column::categorical("Gender", customers.iter().map(|c| c.gender)),
        Column::numeric("Age", numeric(|c| c.age)),
        Column::numeric("Tenure", numeric(|c| c.tenure)),
        Column::numeric("Balance", numeric(|c| c.balance)),
        Column::numeric("NumOfProducts", numeric(|c| c.products)),
        Column::numeric("HasCrCard", numeric(|c| c.has_card)),
        Column::numeric("IsActiveMember", numeric(|c| c.active)),
        Column::numeric("EstimatedSalary", numeric(|c| c.salary)),
        Column::numeric("Exited", numeric(|c| c.exited)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            credit_score: 650.0,
            geography:    "France",
            gender:       "Male",
            age:          30.0,
            tenure:       5.0,
            balance:      0.0,
            products:     1.0,
            has_card:     1.0,
            active:       1.0,
            salary:       50_000.0,
            exited:       0.0,
        }
    }

    #[test]
    fn base_profile_churns_at_base_rate() {
        assert!((churn_probability(&customer()) - 0.08).abs() < 1e-12);
    }

    #[test]
    fn stacked_drivers_clamp_at_ceiling() {
        let c = Customer {
            geography: "Germany",
            active: 0.0,
            age: 60.0,
            products: 3.0,
            balance: 120_000.0,
            ..customer()
        };
        assert_eq!(churn_probability(&c), 0.95);
    }
}

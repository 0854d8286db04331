#![allow(dead_code)]

use churn_insights_core::table::{Column, CustomerTable};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One customer profile; `TableBuilder::add` repeats it.
#[derive(Debug, Clone)]
pub struct Customer {
    pub credit_score: f64,
    pub geography:    &'static str,
    pub gender:       &'static str,
    pub age:          f64,
    pub tenure:       f64,
    pub balance:      f64,
    pub products:     f64,
    pub has_card:     f64,
    pub active:       f64,
    pub salary:       f64,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            credit_score: 650.0,
            geography:    "France",
            gender:       "Male",
            age:          30.0,
            tenure:       5.0,
            balance:      60_000.0,
            products:     1.0,
            has_card:     1.0,
            active:       1.0,
            salary:       50_000.0,
        }
    }
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<(Customer, f64)>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` copies of `customer`, the first `churned` of them exited.
    pub fn add(mut self, count: usize, churned: usize, customer: Customer) -> Self {
        assert!(churned <= count, "churned {churned} exceeds count {count}");
        for i in 0..count {
            let exited = if i < churned { 1.0 } else { 0.0 };
            self.rows.push((customer.clone(), exited));
        }
        self
    }

    pub fn build(self) -> CustomerTable {
        let col = |f: fn(&Customer) -> f64| self.rows.iter().map(|(c, _)| f(c)).collect::<Vec<_>>();
        CustomerTable::from_columns(vec![
            Column::numeric("CreditScore", col(|c| c.credit_score)),
            Column::categorical("Geography", self.rows.iter().map(|(c, _)| c.geography)),
            Column::categorical("Gender", self.rows.iter().map(|(c, _)| c.gender)),
            Column::numeric("Age", col(|c| c.age)),
            Column::numeric("Tenure", col(|c| c.tenure)),
            Column::numeric("Balance", col(|c| c.balance)),
            Column::numeric("NumOfProducts", col(|c| c.products)),
            Column::numeric("HasCrCard", col(|c| c.has_card)),
            Column::numeric("IsActiveMember", col(|c| c.active)),
            Column::numeric("EstimatedSalary", col(|c| c.salary)),
            Column::numeric("Exited", self.rows.iter().map(|(_, y)| *y).collect()),
        ])
        .expect("builder columns are aligned")
    }
}

/// 700 French customers churning at 10%, 300 German at 20%.
pub fn two_country_table() -> CustomerTable {
    TableBuilder::new()
        .add(700, 70, Customer::default())
        .add(300, 60, Customer { geography: "Germany", ..Customer::default() })
        .build()
}

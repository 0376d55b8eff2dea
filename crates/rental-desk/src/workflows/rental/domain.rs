//! Value types for customers, titles and rentals, plus the views served over HTTP.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted rentals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RentalId(pub String);

impl std::fmt::Display for RentalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Customer requesting a rental. Identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Catalog snapshot of a rentable title at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub stock: u32,
    pub unit_price: Decimal,
}

impl Item {
    pub fn new(name: impl Into<String>, stock: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            stock,
            unit_price,
        }
    }
}

/// Inbound request shape. Both fields may be absent so the workflow can reject them
/// with the matching failure instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRequest {
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub items: Option<Vec<Item>>,
}

/// Lifecycle of a persisted rental. Rejected requests are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    Active,
    Returned,
}

impl RentalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Returned => "returned",
        }
    }
}

/// Completed rental as owned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub rental_id: RentalId,
    pub customer: Customer,
    pub items: Vec<Item>,
    pub total_charge: Decimal,
    pub rental_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: RentalStatus,
}

impl Rental {
    pub fn is_pending(&self) -> bool {
        self.status == RentalStatus::Active
    }

    /// A rental is overdue only while pending and once `today` is past the due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_pending() && today > self.due_date
    }

    pub fn view(&self, today: NaiveDate) -> RentalView {
        RentalView {
            rental_id: self.rental_id.clone(),
            customer: self.customer.name.clone(),
            items: self.items.iter().map(|item| item.name.clone()).collect(),
            total_charge: self.total_charge,
            rental_date: self.rental_date,
            due_date: self.due_date,
            status: self.status.label(),
            overdue: self.is_overdue(today),
        }
    }
}

/// Flattened representation of a rental for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalView {
    pub rental_id: RentalId,
    pub customer: String,
    pub items: Vec<String>,
    pub total_charge: Decimal,
    pub rental_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: &'static str,
    pub overdue: bool,
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::{Customer, Item, Rental, RentalId, RentalRequest, RentalStatus};
use super::due_date::{DueDatePolicy, BASE_RENTAL_DAYS};
use super::pricing::PricingPolicy;
use super::repository::{RentalRepository, RepositoryError};
use super::screening::{CreditCheck, CreditCheckError, ItemCatalog, SnapshotCatalog};

/// Workflow composing eligibility checks, pricing, due dates and persistence.
pub struct RentalWorkflow<R, C> {
    repository: Arc<R>,
    credit: Arc<C>,
    catalog: Arc<dyn ItemCatalog>,
    clock: Arc<dyn Clock>,
    pricing: PricingPolicy,
    due_dates: DueDatePolicy,
}

static RENTAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_rental_id() -> RentalId {
    let id = RENTAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RentalId(format!("loc-{id:06}"))
}

/// Last stage a new rental cleared before it was turned away.
///
/// Validation has no stage of its own: its failures leave the request at `Requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStage {
    Requested,
    Priced,
    CreditCleared,
}

impl<R, C> RentalWorkflow<R, C>
where
    R: RentalRepository + 'static,
    C: CreditCheck + 'static,
{
    pub fn new(repository: Arc<R>, credit: Arc<C>) -> Self {
        Self {
            repository,
            credit,
            catalog: Arc::new(SnapshotCatalog),
            clock: Arc::new(SystemClock),
            pricing: PricingPolicy,
            due_dates: DueDatePolicy,
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn ItemCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Business date the workflow stamps on new rentals.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Convenience entry point for deserialized requests.
    pub fn submit(&self, request: RentalRequest) -> Result<Rental, RentalError> {
        self.rent(request.customer, request.items)
    }

    /// Validate, price, date and persist a new rental.
    ///
    /// Checks run in a fixed order and stop at the first failure: customer, items, stock,
    /// credit. Nothing is persisted unless every check passes.
    pub fn rent(
        &self,
        customer: Option<Customer>,
        items: Option<Vec<Item>>,
    ) -> Result<Rental, RentalError> {
        let result = self.run_pipeline(customer, items);
        match &result {
            Ok(rental) => info!(
                rental_id = %rental.rental_id,
                customer = %rental.customer.name,
                total = %rental.total_charge,
                due_date = %rental.due_date,
                "rental persisted"
            ),
            Err(err) => warn!(
                reason = err.reason_code(),
                stage = ?err.rejected_at(),
                error = %err,
                "rental rejected"
            ),
        }
        result
    }

    fn run_pipeline(
        &self,
        customer: Option<Customer>,
        items: Option<Vec<Item>>,
    ) -> Result<Rental, RentalError> {
        let customer = customer.ok_or(RentalError::MissingCustomer)?;
        let items = items
            .filter(|items| !items.is_empty())
            .ok_or(RentalError::MissingItems)?;

        if let Some(item) = items.iter().find(|item| self.catalog.stock_of(item) == 0) {
            return Err(RentalError::OutOfStock { item: item.clone() });
        }
        debug!(customer = %customer.name, items = items.len(), "rental request validated");

        let quote = self.pricing.quote(&items);
        let rental_date = self.clock.today();
        let due_date = self
            .due_dates
            .compute_due_date(rental_date, BASE_RENTAL_DAYS);

        let blacklisted = self
            .credit
            .has_negative_credit(&customer)
            .map_err(RentalError::CreditServiceUnavailable)?;
        if blacklisted {
            return Err(RentalError::CustomerBlacklisted);
        }

        let rental = Rental {
            rental_id: next_rental_id(),
            customer,
            items,
            total_charge: quote.total,
            rental_date,
            due_date,
            status: RentalStatus::Active,
        };

        let stored = self.repository.persist(rental)?;
        Ok(stored)
    }

    /// Re-price and push out the due date of an existing rental.
    ///
    /// The rental restarts today and is due `additional_days` later with no weekend shift.
    /// Stock and credit are not checked again. Returned rentals cannot be extended.
    pub fn extend(&self, rental: &Rental, additional_days: u32) -> Result<Rental, RentalError> {
        if rental.status == RentalStatus::Returned {
            return Err(RentalError::AlreadyReturned(rental.rental_id.clone()));
        }

        let rental_date = self.clock.today();
        let due_date = rental_date
            .checked_add_days(Days::new(u64::from(additional_days)))
            .ok_or(RentalError::InvalidExtension { additional_days })?;
        let extended = Rental {
            total_charge: self.pricing.compute_total(&rental.items),
            rental_date,
            due_date,
            ..rental.clone()
        };

        let stored = self.repository.persist(extended)?;
        info!(
            rental_id = %stored.rental_id,
            additional_days,
            due_date = %stored.due_date,
            "rental extended"
        );
        Ok(stored)
    }

    /// Close an active rental.
    pub fn return_rental(&self, rental_id: &RentalId) -> Result<Rental, RentalError> {
        let mut rental = self.get(rental_id)?;
        if rental.status == RentalStatus::Returned {
            return Err(RentalError::AlreadyReturned(rental_id.clone()));
        }

        rental.status = RentalStatus::Returned;
        let stored = self.repository.persist(rental)?;
        info!(rental_id = %stored.rental_id, "rental returned");
        Ok(stored)
    }

    pub fn get(&self, rental_id: &RentalId) -> Result<Rental, RentalError> {
        self.repository
            .fetch(rental_id)?
            .ok_or_else(|| RentalError::RentalNotFound(rental_id.clone()))
    }
}

/// Failure raised by the rental workflow.
///
/// The messages of the eligibility variants are shown to counter staff verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error("Usuario vazio")]
    MissingCustomer,
    #[error("Filme vazio")]
    MissingItems,
    #[error("Filme sem estoque: {}", .item.name)]
    OutOfStock { item: Item },
    #[error("Usuario Negativado")]
    CustomerBlacklisted,
    #[error("SPC fora do ar, tente novamente.")]
    CreditServiceUnavailable(#[source] CreditCheckError),
    #[error("rental storage failure: {0}")]
    StorageFailure(#[from] RepositoryError),
    #[error("rental {0} not found")]
    RentalNotFound(RentalId),
    #[error("rental {0} was already returned")]
    AlreadyReturned(RentalId),
    #[error("cannot extend a rental by {additional_days} days")]
    InvalidExtension { additional_days: u32 },
}

impl RentalError {
    pub const fn reason_code(&self) -> &'static str {
        match self {
            RentalError::MissingCustomer => "missing_customer",
            RentalError::MissingItems => "missing_items",
            RentalError::OutOfStock { .. } => "out_of_stock",
            RentalError::CustomerBlacklisted => "customer_blacklisted",
            RentalError::CreditServiceUnavailable(_) => "credit_service_unavailable",
            RentalError::StorageFailure(_) => "storage_failure",
            RentalError::RentalNotFound(_) => "rental_not_found",
            RentalError::AlreadyReturned(_) => "already_returned",
            RentalError::InvalidExtension { .. } => "invalid_extension",
        }
    }

    /// Stage of a new rental at which this failure stopped it, if it came from `rent`.
    pub const fn rejected_at(&self) -> Option<RentalStage> {
        match self {
            RentalError::MissingCustomer
            | RentalError::MissingItems
            | RentalError::OutOfStock { .. } => Some(RentalStage::Requested),
            RentalError::CustomerBlacklisted | RentalError::CreditServiceUnavailable(_) => {
                Some(RentalStage::Priced)
            }
            RentalError::StorageFailure(_) => Some(RentalStage::CreditCleared),
            RentalError::RentalNotFound(_)
            | RentalError::AlreadyReturned(_)
            | RentalError::InvalidExtension { .. } => None,
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, RentalError::CreditServiceUnavailable(_))
    }
}

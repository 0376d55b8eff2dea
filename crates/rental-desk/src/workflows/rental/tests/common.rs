use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::workflows::rental::clock::FixedClock;
use crate::workflows::rental::domain::{Customer, Item, Rental, RentalId, RentalStatus};
use crate::workflows::rental::notifier::OverdueNotifier;
use crate::workflows::rental::repository::{
    NotificationError, NotificationSender, RentalRepository, RepositoryError,
};
use crate::workflows::rental::router::RentalDesk;
use crate::workflows::rental::screening::{CreditCheck, CreditCheckError};
use crate::workflows::rental::service::RentalWorkflow;

/// Wednesday.
pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 12).expect("valid date")
}

pub(super) fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn following_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 17).expect("valid date")
}

pub(super) fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub(super) struct CustomerBuilder {
    name: String,
}

pub(super) fn a_customer() -> CustomerBuilder {
    CustomerBuilder {
        name: "Usuario 1".to_string(),
    }
}

impl CustomerBuilder {
    pub(super) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(super) fn build(self) -> Customer {
        Customer::new(self.name)
    }
}

pub(super) struct ItemBuilder {
    name: String,
    stock: u32,
    unit_price: Decimal,
}

pub(super) fn an_item() -> ItemBuilder {
    ItemBuilder {
        name: "Filme 1".to_string(),
        stock: 2,
        unit_price: dec!(4.00),
    }
}

pub(super) fn an_item_out_of_stock() -> ItemBuilder {
    an_item().with_stock(0)
}

impl ItemBuilder {
    pub(super) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(super) fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub(super) fn priced(mut self, unit_price: Decimal) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub(super) fn build(self) -> Item {
        Item::new(self.name, self.stock, self.unit_price)
    }
}

/// `count` titles at the same price, named "Filme 1".."Filme n".
pub(super) fn items_priced(count: usize, unit_price: Decimal) -> Vec<Item> {
    (1..=count)
        .map(|n| an_item().named(&format!("Filme {n}")).priced(unit_price).build())
        .collect()
}

static BUILDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(super) struct RentalBuilder {
    rental: Rental,
}

pub(super) fn a_rental() -> RentalBuilder {
    let id = BUILDER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RentalBuilder {
        rental: Rental {
            rental_id: RentalId(format!("test-{id:06}")),
            customer: a_customer().build(),
            items: vec![an_item().build()],
            total_charge: dec!(4.00),
            rental_date: today(),
            due_date: days_from_today(1),
            status: RentalStatus::Active,
        },
    }
}

impl RentalBuilder {
    pub(super) fn for_customer(mut self, customer: &Customer) -> Self {
        self.rental.customer = customer.clone();
        self
    }

    pub(super) fn with_items(mut self, items: Vec<Item>) -> Self {
        self.rental.items = items;
        self
    }

    pub(super) fn with_total(mut self, total: Decimal) -> Self {
        self.rental.total_charge = total;
        self
    }

    /// Rented four days ago, due two days ago.
    pub(super) fn overdue(mut self) -> Self {
        self.rental.rental_date = days_from_today(-4);
        self.rental.due_date = days_from_today(-2);
        self
    }

    pub(super) fn returned(mut self) -> Self {
        self.rental.status = RentalStatus::Returned;
        self
    }

    pub(super) fn build(self) -> Rental {
        self.rental
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<BTreeMap<RentalId, Rental>>>,
    persisted: Arc<Mutex<Vec<Rental>>>,
}

impl MemoryRepository {
    pub(super) fn with_rentals(rentals: Vec<Rental>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for rental in rentals {
                guard.insert(rental.rental_id.clone(), rental);
            }
        }
        repository
    }

    /// Every rental handed to `persist`, in call order.
    pub(super) fn persisted(&self) -> Vec<Rental> {
        self.persisted.lock().expect("capture mutex poisoned").clone()
    }
}

impl RentalRepository for MemoryRepository {
    fn persist(&self, rental: Rental) -> Result<Rental, RepositoryError> {
        self.persisted
            .lock()
            .expect("capture mutex poisoned")
            .push(rental.clone());
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(rental.rental_id.clone(), rental.clone());
        Ok(rental)
    }

    fn fetch(&self, id: &RentalId) -> Result<Option<Rental>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_pending(&self) -> Result<Vec<Rental>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|rental| rental.is_pending())
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl RentalRepository for UnavailableRepository {
    fn persist(&self, _rental: Rental) -> Result<Rental, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RentalId) -> Result<Option<Rental>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_pending(&self) -> Result<Vec<Rental>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) enum CreditAnswer {
    Clear,
    Blacklisted,
    Unavailable,
    TimedOut,
}

/// Canned credit bureau that records who it was asked about.
pub(super) struct StubCreditCheck {
    answer: CreditAnswer,
    calls: Mutex<Vec<Customer>>,
}

impl StubCreditCheck {
    pub(super) fn answering(answer: CreditAnswer) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn clear() -> Self {
        Self::answering(CreditAnswer::Clear)
    }

    pub(super) fn calls(&self) -> Vec<Customer> {
        self.calls.lock().expect("credit mutex poisoned").clone()
    }
}

impl CreditCheck for StubCreditCheck {
    fn has_negative_credit(&self, customer: &Customer) -> Result<bool, CreditCheckError> {
        self.calls
            .lock()
            .expect("credit mutex poisoned")
            .push(customer.clone());
        match self.answer {
            CreditAnswer::Clear => Ok(false),
            CreditAnswer::Blacklisted => Ok(true),
            CreditAnswer::Unavailable => {
                Err(CreditCheckError::Unreachable("Falha catastrofica".to_string()))
            }
            CreditAnswer::TimedOut => Err(CreditCheckError::Timeout(3_000)),
        }
    }
}

/// Notice sender that records every call and fails for configured customers.
#[derive(Default)]
pub(super) struct RecordingSender {
    calls: Mutex<Vec<Customer>>,
    failing: Vec<String>,
}

impl RecordingSender {
    pub(super) fn failing_for(names: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub(super) fn calls(&self) -> Vec<Customer> {
        self.calls.lock().expect("sender mutex poisoned").clone()
    }

    pub(super) fn calls_for(&self, customer: &Customer) -> usize {
        self.calls()
            .iter()
            .filter(|called| *called == customer)
            .count()
    }
}

impl NotificationSender for RecordingSender {
    fn notify(&self, customer: &Customer) -> Result<(), NotificationError> {
        self.calls
            .lock()
            .expect("sender mutex poisoned")
            .push(customer.clone());
        if self.failing.contains(&customer.name) {
            return Err(NotificationError::Transport("smtp relay refused".to_string()));
        }
        Ok(())
    }
}

pub(super) fn build_workflow(
    credit: StubCreditCheck,
) -> (
    RentalWorkflow<MemoryRepository, StubCreditCheck>,
    Arc<MemoryRepository>,
    Arc<StubCreditCheck>,
) {
    build_workflow_on(today(), credit)
}

pub(super) fn build_workflow_on(
    date: NaiveDate,
    credit: StubCreditCheck,
) -> (
    RentalWorkflow<MemoryRepository, StubCreditCheck>,
    Arc<MemoryRepository>,
    Arc<StubCreditCheck>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let credit = Arc::new(credit);
    let workflow = RentalWorkflow::new(repository.clone(), credit.clone())
        .with_clock(Arc::new(FixedClock(date)));
    (workflow, repository, credit)
}

pub(super) fn build_notifier(
    repository: MemoryRepository,
    sender: RecordingSender,
) -> (
    OverdueNotifier<MemoryRepository, RecordingSender>,
    Arc<RecordingSender>,
) {
    let sender = Arc::new(sender);
    let notifier = OverdueNotifier::new(Arc::new(repository), sender.clone())
        .with_clock(Arc::new(FixedClock(today())));
    (notifier, sender)
}

pub(super) fn build_desk(
    repository: MemoryRepository,
    credit: StubCreditCheck,
) -> Arc<RentalDesk<MemoryRepository, StubCreditCheck, RecordingSender>> {
    let repository = Arc::new(repository);
    let clock = Arc::new(FixedClock(today()));
    let workflow = RentalWorkflow::new(repository.clone(), Arc::new(credit))
        .with_clock(clock.clone());
    let notifier = OverdueNotifier::new(repository, Arc::new(RecordingSender::default()))
        .with_clock(clock);
    Arc::new(RentalDesk { workflow, notifier })
}

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rental_desk::config::RentalConfig;
use rental_desk::workflows::rental::{
    Clock, CreditCheck, CreditCheckError, Customer, FixedClock, Item, ItemCatalog,
    NotificationError, NotificationSender, OverdueNotifier, Rental, RentalDesk, RentalId,
    RentalRepository, RentalWorkflow, RepositoryError, SystemClock,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Desk =
    RentalDesk<InMemoryRentalRepository, ConfiguredCreditCheck, LoggingNotificationSender>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryRentalRepository {
    records: Arc<Mutex<BTreeMap<RentalId, Rental>>>,
}

impl RentalRepository for InMemoryRentalRepository {
    fn persist(&self, rental: Rental) -> Result<Rental, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("rental store poisoned".to_string()))?;
        guard.insert(rental.rental_id.clone(), rental.clone());
        Ok(rental)
    }

    fn fetch(&self, id: &RentalId) -> Result<Option<Rental>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("rental store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn fetch_pending(&self) -> Result<Vec<Rental>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("rental store poisoned".to_string()))?;
        Ok(guard
            .values()
            .filter(|rental| rental.is_pending())
            .cloned()
            .collect())
    }
}

/// Shelf counts for known titles; unknown titles fall back to the request snapshot.
#[derive(Debug, Default, Clone)]
pub(crate) struct ShelfCatalog {
    shelf: HashMap<String, u32>,
}

impl ShelfCatalog {
    pub(crate) fn stocked(titles: &[(&str, u32)]) -> Self {
        Self {
            shelf: titles
                .iter()
                .map(|(name, stock)| (name.to_string(), *stock))
                .collect(),
        }
    }
}

impl ItemCatalog for ShelfCatalog {
    fn stock_of(&self, item: &Item) -> u32 {
        self.shelf.get(&item.name).copied().unwrap_or(item.stock)
    }
}

/// Credit check backed by the configured blacklist.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfiguredCreditCheck {
    blacklist: HashSet<String>,
}

impl ConfiguredCreditCheck {
    pub(crate) fn from_config(config: &RentalConfig) -> Self {
        Self {
            blacklist: config.blacklist.iter().cloned().collect(),
        }
    }
}

impl CreditCheck for ConfiguredCreditCheck {
    fn has_negative_credit(&self, customer: &Customer) -> Result<bool, CreditCheckError> {
        Ok(self.blacklist.contains(&customer.name))
    }
}

/// Notice sender that writes each notice to the log instead of an e-mail relay.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingNotificationSender;

impl NotificationSender for LoggingNotificationSender {
    fn notify(&self, customer: &Customer) -> Result<(), NotificationError> {
        info!(customer = %customer.name, "overdue notice sent");
        Ok(())
    }
}

pub(crate) fn clock_from(config: &RentalConfig) -> Arc<dyn Clock> {
    match config.business_date {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    }
}

pub(crate) fn default_shelf() -> ShelfCatalog {
    ShelfCatalog::stocked(&[
        ("Central do Brasil", 3),
        ("Cidade de Deus", 2),
        ("O Auto da Compadecida", 4),
        ("Tropa de Elite", 0),
    ])
}

/// Wire the in-memory adapters into a desk. The repository handle is returned so callers
/// can seed or inspect it.
pub(crate) fn build_desk(config: &RentalConfig) -> (Arc<Desk>, Arc<InMemoryRentalRepository>) {
    let repository = Arc::new(InMemoryRentalRepository::default());
    let clock = clock_from(config);

    let workflow = RentalWorkflow::new(
        repository.clone(),
        Arc::new(ConfiguredCreditCheck::from_config(config)),
    )
    .with_catalog(Arc::new(default_shelf()))
    .with_clock(clock.clone());
    let notifier = OverdueNotifier::new(
        repository.clone(),
        Arc::new(LoggingNotificationSender),
    )
    .with_clock(clock);

    (Arc::new(RentalDesk { workflow, notifier }), repository)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

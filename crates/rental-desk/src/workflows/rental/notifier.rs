use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::RentalId;
use super::repository::{NotificationSender, RentalRepository, RepositoryError};

/// Batch job that sends an overdue notice for every pending rental past its due date.
///
/// Notices are sent per overdue rental, so a customer holding two late rentals hears about
/// both. A failed send is recorded and the batch moves on; nothing is retried in the same
/// pass.
pub struct OverdueNotifier<R, N> {
    repository: Arc<R>,
    sender: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<R, N> OverdueNotifier<R, N>
where
    R: RentalRepository + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(repository: Arc<R>, sender: Arc<N>) -> Self {
        Self {
            repository,
            sender,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn notify_overdue(&self) -> Result<NotificationReport, RepositoryError> {
        let today = self.clock.today();
        let pending = self.repository.fetch_pending()?;

        let mut report = NotificationReport {
            business_date: today,
            scanned: pending.len(),
            ..NotificationReport::default()
        };

        for rental in pending.iter().filter(|rental| rental.is_overdue(today)) {
            report.overdue += 1;
            match self.sender.notify(&rental.customer) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(
                        rental_id = %rental.rental_id,
                        customer = %rental.customer.name,
                        error = %err,
                        "overdue notice failed"
                    );
                    report.failed.push(FailedNotice {
                        rental_id: rental.rental_id.clone(),
                        customer: rental.customer.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            business_date = %today,
            scanned = report.scanned,
            overdue = report.overdue,
            delivered = report.delivered,
            failed = report.failed.len(),
            "overdue notice batch finished"
        );
        Ok(report)
    }
}

/// Summary of one notifier pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationReport {
    pub business_date: NaiveDate,
    pub scanned: usize,
    pub overdue: usize,
    pub delivered: usize,
    pub failed: Vec<FailedNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedNotice {
    pub rental_id: RentalId,
    pub customer: String,
    pub error: String,
}

//! Persistence and outbound notice seams shared by the workflow and the overdue batch.

use super::domain::{Customer, Rental, RentalId};

/// Storage abstraction so the workflow and the overdue batch can be exercised in isolation.
///
/// `persist` is an upsert keyed by [`RentalId`] and must be all-or-nothing: on error no
/// part of the rental may be visible to later reads.
pub trait RentalRepository: Send + Sync {
    fn persist(&self, rental: Rental) -> Result<Rental, RepositoryError>;
    fn fetch(&self, id: &RentalId) -> Result<Option<Rental>, RepositoryError>;
    fn fetch_pending(&self) -> Result<Vec<Rental>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound overdue notice hook (e-mail or similar adapters).
pub trait NotificationSender: Send + Sync {
    fn notify(&self, customer: &Customer) -> Result<(), NotificationError>;
}

/// Notice dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

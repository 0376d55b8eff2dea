//! Movie rental desk: eligibility checks, rank-based pricing, due dates and the overdue
//! notice batch.
//!
//! Every collaborator outside the pricing and due-date rules (catalog, credit bureau,
//! storage, notice transport, clock) is a trait so embedding applications supply their
//! own adapters.

pub mod clock;
pub mod domain;
pub mod due_date;
pub mod notifier;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod screening;
pub mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{Customer, Item, Rental, RentalId, RentalRequest, RentalStatus, RentalView};
pub use due_date::{DueDatePolicy, BASE_RENTAL_DAYS, REST_DAY, RETURN_DAY};
pub use notifier::{FailedNotice, NotificationReport, OverdueNotifier};
pub use pricing::{PriceQuote, PricedLine, PricingPolicy, RANK_DISCOUNT_SCHEDULE};
pub use repository::{NotificationError, NotificationSender, RentalRepository, RepositoryError};
pub use router::{rental_router, ExtensionRequest, RentalDesk};
pub use screening::{CreditCheck, CreditCheckError, ItemCatalog, SnapshotCatalog};
pub use service::{RentalError, RentalStage, RentalWorkflow};

use super::domain::{Customer, Item};

/// Reports how many copies of a title can be handed out.
pub trait ItemCatalog: Send + Sync {
    fn stock_of(&self, item: &Item) -> u32;
}

/// Catalog that trusts the stock carried on the requested item snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotCatalog;

impl ItemCatalog for SnapshotCatalog {
    fn stock_of(&self, item: &Item) -> u32 {
        item.stock
    }
}

/// Credit bureau lookup consulted before a rental is priced.
pub trait CreditCheck: Send + Sync {
    fn has_negative_credit(&self, customer: &Customer) -> Result<bool, CreditCheckError>;
}

/// Transient failure talking to the credit bureau.
#[derive(Debug, thiserror::Error)]
pub enum CreditCheckError {
    #[error("credit bureau unreachable: {0}")]
    Unreachable(String),
    #[error("credit bureau timed out after {0} ms")]
    Timeout(u64),
}

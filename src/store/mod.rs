//! # Store Module
//!
//! The item store capability consumed by the handlers, plus its two
//! implementations.
//!
//! - [`ItemStore`] - five async operations: put, get, scan, delete and
//!   conditional update
//! - [`UpdateExpressionBuilder`] - compiles a partial update into a
//!   placeholder-only `SET` expression guarded by an existence condition
//! - [`MemoryStore`] - ordered in-process store for tests and local runs
//! - [`DynamoItemStore`] - Amazon DynamoDB table keyed by `id`
//!
//! Every operation is a single atomic call against the backing store; the
//! handlers never retry.

mod dynamo;
mod error;
mod expression;
mod memory;

pub use dynamo::{DynamoConfig, DynamoItemStore};
pub use error::StoreError;
pub use expression::{UpdateExpressionBuilder, UpdateInstruction};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::model::Item;

/// Persistent item storage, keyed by the `id` attribute.
///
/// Implementations must make each call atomic for the item it touches, and
/// must evaluate the existence condition of [`ItemStore::update`] atomically
/// with the mutation.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Store a complete item unconditionally, replacing any item with the
    /// same id.
    async fn put(&self, item: &Item) -> Result<(), StoreError>;

    /// Fetch an item by id. `Ok(None)` when absent.
    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Every item in the collection, in store order.
    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    /// Remove an item. Removing an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Apply a partial update to an existing item and return the complete
    /// post-update item.
    ///
    /// Fails with [`StoreError::ConditionFailed`] when no item has `id`; in
    /// that case nothing is written.
    async fn update(&self, id: &str, instruction: &UpdateInstruction)
        -> Result<Item, StoreError>;
}

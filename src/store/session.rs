//! Session holder
//!
//! The logged-in user is kept in a single-value slot in the data
//! directory. There is exactly one session; logging in overwrites it
//! and logging out clears it.

use crate::error::Result;
use crate::store::collections;
use crate::store::models::User;
use crate::store::CollectionStore;

#[derive(Debug, Clone)]
pub struct SessionStore {
    store: CollectionStore,
}

impl SessionStore {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    /// Returns the user currently logged in, if any.
    pub async fn current_user(&self) -> Result<Option<User>> {
        self.store.read_slot(collections::CURRENT_USER).await
    }

    pub async fn set_current_user(&self, user: &User) -> Result<()> {
        self.store.write_slot(collections::CURRENT_USER, user).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear_slot(collections::CURRENT_USER).await
    }
}

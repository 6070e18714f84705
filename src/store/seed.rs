//! First-run initialization
//!
//! Creates the data directory and seeds the two demo accounts when the
//! user collection is empty. Safe to call on every startup.

use crate::config;
use crate::error::Result;
use crate::store::models::{Role, User};
use crate::store::{collections, generate_id, CollectionStore};

pub async fn initialize_store(store: &CollectionStore) -> Result<()> {
    store.initialize().await?;

    let users: Vec<User> = store.read_collection(collections::USERS).await?;
    if !users.is_empty() {
        tracing::debug!("Store already seeded, {} users present", users.len());
        return Ok(());
    }

    tracing::info!("Seeding demo accounts");
    let demo_users = vec![
        User {
            id: generate_id(),
            email: config::DEMO_HR_EMAIL.to_string(),
            password: config::DEMO_HR_PASSWORD.to_string(),
            role: Role::Hr,
            name: "HR Admin".to_string(),
            department: Some("Human Resources".to_string()),
            is_active: Some(true),
            progress: None,
        },
        User {
            id: generate_id(),
            email: config::DEMO_EMPLOYEE_EMAIL.to_string(),
            password: config::DEMO_EMPLOYEE_PASSWORD.to_string(),
            role: Role::Employee,
            name: "Demo Employee".to_string(),
            department: Some("Engineering".to_string()),
            is_active: Some(true),
            progress: None,
        },
    ];
    store.write_collection(collections::USERS, &demo_users).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn seeds_demo_accounts_once() {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());

        initialize_store(&store).await.unwrap();
        let users: Vec<User> = store.read_collection(collections::USERS).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.email == config::DEMO_HR_EMAIL));
        assert!(users.iter().any(|u| u.email == config::DEMO_EMPLOYEE_EMAIL));

        // second run leaves the collection untouched
        initialize_store(&store).await.unwrap();
        let again: Vec<User> = store.read_collection(collections::USERS).await.unwrap();
        assert_eq!(again.len(), 2);
    }

    #[tokio::test]
    async fn does_not_reseed_a_non_empty_collection() {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();

        let existing = vec![User {
            id: generate_id(),
            email: "someone@company.com".to_string(),
            password: "pw".to_string(),
            role: Role::Admin,
            name: "Existing".to_string(),
            department: None,
            is_active: Some(true),
            progress: None,
        }];
        store.write_collection(collections::USERS, &existing).await.unwrap();

        initialize_store(&store).await.unwrap();
        let users: Vec<User> = store.read_collection(collections::USERS).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "someone@company.com");
    }
}

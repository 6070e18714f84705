//! User repository

use crate::error::Result;
use crate::store::models::{NewUser, Role, User, UserPatch};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct UserRepository {
    store: CollectionStore,
}

impl UserRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<User>> {
        self.store.read_collection(collections::USERS).await
    }

    async fn save(&self, users: &[User]) -> Result<()> {
        self.store.write_collection(collections::USERS, users).await
    }

    pub async fn create(&self, input: NewUser) -> Result<User> {
        let mut users = self.load().await?;

        let user = User {
            id: generate_id(),
            email: input.email,
            password: input.password,
            role: input.role,
            name: input.name,
            department: input.department,
            is_active: Some(true),
            progress: None,
        };
        users.push(user.clone());
        self.save(&users).await?;

        tracing::debug!("Created user: {}", user.id);
        Ok(user)
    }

    pub async fn get_all(&self) -> Result<Vec<User>> {
        self.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Exact email and password match, as stored.
    pub async fn find_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let users = self.load().await?;
        Ok(users
            .into_iter()
            .find(|u| u.email == email && u.password == password))
    }

    pub async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        let users = self.load().await?;
        Ok(users.into_iter().filter(|u| u.role == role).collect())
    }

    /// Merges the patch into the record. Returns `None` without
    /// writing when the id does not exist.
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let mut users = self.load().await?;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password) = patch.password {
            user.password = password;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(department) = patch.department {
            user.department = Some(department);
        }
        if let Some(is_active) = patch.is_active {
            user.is_active = Some(is_active);
        }
        if let Some(progress) = patch.progress {
            user.progress = Some(progress);
        }

        let updated = user.clone();
        self.save(&users).await?;

        tracing::debug!("Updated user: {}", id);
        Ok(Some(updated))
    }

    /// Removes the record with the given id. Deleting a missing id is
    /// a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut users = self.load().await?;
        let before = users.len();
        users.retain(|u| u.id != id);

        if users.len() != before {
            self.save(&users).await?;
            tracing::debug!("Deleted user: {}", id);
        }
        Ok(())
    }
}

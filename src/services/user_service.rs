use crate::auth::{hash_password, verify_password};
use crate::models::{CreateUserForm, Role, ServiceError, User, UserProfile};
use crate::repositories::{StaffRepository, UserRepository};
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 6;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    staff: Arc<dyn StaffRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, staff: Arc<dyn StaffRepository>) -> Self {
        Self { repository, staff }
    }

    /// Creates the first administrator when the account table is empty.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> Result<bool, ServiceError> {
        if self.repository.count().await? > 0 {
            return Ok(false);
        }

        let hash = hash_password(password)?;
        self.repository.create(username, &hash, Role::Admin, None).await?;
        tracing::info!("Created bootstrap administrator account '{}'", username);
        Ok(true)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self.repository.find_by_username(username.trim()).await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => {
                tracing::info!("User {} logged in as {}", user.username, user.role);
                Ok(user)
            }
            _ => {
                tracing::warn!("Failed login attempt for '{}'", username);
                Err(ServiceError::AuthenticationError("Invalid credentials".to_string()))
            }
        }
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserProfile, ServiceError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::AuthenticationError("Account no longer exists".to_string()))?;

        Ok(UserProfile::from_user(&user))
    }

    pub async fn create_user(&self, form: &CreateUserForm) -> Result<UserProfile, ServiceError> {
        let username = form.username.trim();
        if username.is_empty() {
            return Err(ServiceError::ValidationError("Username is required".to_string()));
        }
        if form.password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if let Some(staff_id) = form.staff_id {
            if self.staff.find_by_id(staff_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("Staff member {} not found", staff_id)));
            }
        }
        if self.repository.find_by_username(username).await?.is_some() {
            return Err(ServiceError::Conflict(format!("Username {} is already taken", username)));
        }

        let hash = hash_password(&form.password)?;
        let user = self
            .repository
            .create(username, &hash, form.role, form.staff_id)
            .await?;

        tracing::info!("Created account {} with role {}", user.username, user.role);
        Ok(UserProfile::from_user(&user))
    }
}

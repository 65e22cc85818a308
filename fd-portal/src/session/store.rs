use std::sync::Arc;

use super::storage::{KeyValueStorage, StorageError};
use crate::models::auth::AuthPayload;
use crate::models::session::{Session, UserInfo};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_INFO_KEY: &str = "userInfo";
pub const CUSTOMER_NUMBER_KEY: &str = "customerNumber";

/// Every key owned by the session; `clear` removes exactly these.
pub const SESSION_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_INFO_KEY,
    CUSTOMER_NUMBER_KEY,
];

/// Typed view of the session over a key/value storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.get_non_empty(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StorageError> {
        self.get_non_empty(REFRESH_TOKEN_KEY)
    }

    pub fn user_info(&self) -> Result<Option<UserInfo>, StorageError> {
        match self.get_non_empty(USER_INFO_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Value {
                    key: USER_INFO_KEY.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub fn customer_number(&self) -> Result<Option<String>, StorageError> {
        self.get_non_empty(CUSTOMER_NUMBER_KEY)
    }

    /// The persisted session, or `None` when no access token is stored.
    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        let Some(access_token) = self.access_token()? else {
            return Ok(None);
        };

        Ok(Some(Session {
            access_token,
            refresh_token: self.refresh_token()?,
            user: self.user_info()?.unwrap_or_default(),
            customer_number: self.customer_number()?,
        }))
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &session.access_token)?;
        self.set_optional(REFRESH_TOKEN_KEY, session.refresh_token.as_deref())?;
        self.set_user_info(&session.user)?;
        self.set_optional(CUSTOMER_NUMBER_KEY, session.customer_number.as_deref())
    }

    /// Applies a refresh response in place: the access token always changes,
    /// the refresh token and user only when the server sent new ones.
    pub fn apply_refresh(&self, payload: &AuthPayload) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &payload.access_token)?;
        if let Some(refresh_token) = payload.refresh_token.as_deref() {
            self.storage.set(REFRESH_TOKEN_KEY, refresh_token)?;
        }
        if let Some(user) = &payload.user {
            self.set_user_info(user)?;
        }
        if let Some(customer_number) = payload.customer_number.as_deref() {
            self.storage.set(CUSTOMER_NUMBER_KEY, customer_number)?;
        }
        Ok(())
    }

    pub fn set_customer_number(&self, customer_number: &str) -> Result<(), StorageError> {
        self.storage.set(CUSTOMER_NUMBER_KEY, customer_number)
    }

    /// Removes all session keys. Every key is attempted even if an earlier
    /// removal fails; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                tracing::error!(key, error = %e, "Failed to remove session key");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn set_user_info(&self, user: &UserInfo) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user).map_err(|source| StorageError::Value {
            key: USER_INFO_KEY.to_string(),
            source,
        })?;
        self.storage.set(USER_INFO_KEY, &raw)
    }

    fn set_optional(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        }
    }

    fn get_non_empty(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get(key)?.filter(|value| !value.is_empty()))
    }
}

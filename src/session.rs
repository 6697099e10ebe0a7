//! Bearer-token handling and the authenticated pages.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::api::StorefrontApi;
use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, Booking, Listing, LoginData, RegisterData, User};
use crate::quote::{BookingForm, Quote};

/// Keeps the bearer token between runs in a plain file.
pub struct TokenStore {
    path: PathBuf,
    token: Option<String>,
}

impl TokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let token = Self::load_from_file(&path);

        Self { path, token }
    }

    fn load_from_file(path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn save(&mut self, token: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token)
            .with_context(|| format!("Failed to write token to {}", self.path.display()))?;
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Removes the token file; the in-memory token is dropped only once the
    /// file is gone
    pub fn clear(&mut self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        self.token = None;
        Ok(())
    }
}

/// A booking that the API accepted, with the quote it was priced from.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub booking: Booking,
    pub quote: Quote,
}

/// Pages that need the stored token. A missing token fails before any
/// request is made; a 401 clears the token so the next run asks for a login.
pub struct Session<A: StorefrontApi> {
    api: A,
    store: TokenStore,
}

impl<A: StorefrontApi> Session<A> {
    pub fn new(api: A, store: TokenStore) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let data = LoginData {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self.api.login(&data).await?;
        self.remember(auth)
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        let data = RegisterData {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth = self.api.register(&data).await?;
        self.remember(auth)
    }

    /// The login only counts once the token is on disk
    fn remember(&mut self, auth: AuthResponse) -> Result<User> {
        self.store.save(&auth.token).map_err(ApiError::Storage)?;
        tracing::info!("Logged in as {}", auth.user.email);
        Ok(auth.user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.clear().map_err(ApiError::Storage)?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Bookings of the logged-in user (the dashboard)
    pub async fn bookings(&mut self) -> Result<Vec<Booking>> {
        let token = self.token()?;
        let result = self.api.bookings(&token).await;
        self.check_auth(result)
    }

    /// Validates and prices the form, then submits the booking once
    pub async fn book(&mut self, listing: &Listing, form: &BookingForm) -> Result<Confirmation> {
        let (quote, request) = form.to_request(listing)?;
        let token = self.token()?;

        tracing::info!(
            "Booking {} for {} nights, total {}",
            listing.id,
            quote.nights,
            quote.total
        );

        let result = self.api.create_booking(&token, &request).await;
        let booking = self.check_auth(result)?;

        Ok(Confirmation { booking, quote })
    }

    fn token(&self) -> Result<String> {
        self.store
            .token()
            .map(str::to_string)
            .ok_or(ApiError::Unauthorized)
    }

    fn check_auth<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ApiError::Unauthorized) = &result {
            if let Err(e) = self.store.clear() {
                tracing::warn!("Could not clear rejected token: {:#}", e);
            }
        }
        result
    }
}

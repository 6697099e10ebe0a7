use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, Booking, BookingRequest, Listing, LoginData, RegisterData};

/// The external storefront API. Pages only talk to this trait so they can
/// be driven by a fake in tests.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /listings`
    async fn listings(&self) -> Result<Vec<Listing>>;

    /// `GET /listings/{id}`
    async fn listing(&self, id: &str) -> Result<Listing>;

    /// `POST /bookings`, bearer-authenticated
    async fn create_booking(&self, token: &str, request: &BookingRequest) -> Result<Booking>;

    /// `GET /bookings`, bearer-authenticated
    async fn bookings(&self, token: &str) -> Result<Vec<Booking>>;

    /// `POST /auth/login`
    async fn login(&self, data: &LoginData) -> Result<AuthResponse>;

    /// `POST /auth/register`
    async fn register(&self, data: &RegisterData) -> Result<AuthResponse>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `StorefrontApi` over HTTP with JSON bodies.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, fallback: &str) -> Result<T> {
        let response = request.send().await?;
        read_response(response, fallback).await
    }
}

/// Maps a response onto the error taxonomy: 401 means the session is gone,
/// other failures carry the body's `message` or the fallback.
async fn read_response<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("API rejected the bearer token");
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        tracing::debug!("API returned {}: {}", status, message);
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl StorefrontApi for HttpApi {
    async fn listings(&self) -> Result<Vec<Listing>> {
        tracing::debug!("GET /listings");
        self.send(self.client.get(self.url("/listings")), "Failed to load listings")
            .await
    }

    async fn listing(&self, id: &str) -> Result<Listing> {
        let path = format!("/listings/{}", urlencoding::encode(id));
        tracing::debug!("GET {}", path);
        self.send(self.client.get(self.url(&path)), "Failed to load listing")
            .await
    }

    async fn create_booking(&self, token: &str, request: &BookingRequest) -> Result<Booking> {
        tracing::debug!("POST /bookings for listing {}", request.listing);
        let builder = self
            .client
            .post(self.url("/bookings"))
            .bearer_auth(token)
            .json(request);
        self.send(builder, "Booking failed").await
    }

    async fn bookings(&self, token: &str) -> Result<Vec<Booking>> {
        tracing::debug!("GET /bookings");
        let builder = self.client.get(self.url("/bookings")).bearer_auth(token);
        self.send(builder, "Failed to load bookings").await
    }

    async fn login(&self, data: &LoginData) -> Result<AuthResponse> {
        tracing::debug!("POST /auth/login");
        let builder = self.client.post(self.url("/auth/login")).json(data);
        self.send(builder, "Login failed").await
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse> {
        tracing::debug!("POST /auth/register");
        let builder = self.client.post(self.url("/auth/register")).json(data);
        self.send(builder, "Registration failed").await
    }
}

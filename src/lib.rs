//! Client core of a property-booking storefront: listing search, stay
//! quotes and a typed client for the storefront's JSON API.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod http_client;
pub mod models;
pub mod quote;
pub mod session;

pub use api::{HttpApi, StorefrontApi};
pub use catalog::{filter, Catalog, FilterCriteria, FilterError, LoadState, LocationFilter, PriceRange, ALL_LOCATIONS};
pub use config::Config;
pub use error::ApiError;
pub use models::{Booking, BookingRequest, BookingStatus, Listing, ListingRef, User};
pub use quote::{quote, BookingForm, Quote, QuoteError};
pub use session::{Session, TokenStore};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Shown when a listing carries no images.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x250.png?text=No+Image";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A bookable property, fetched read-only from the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub max_guests: u32,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// First image, or the placeholder when the listing has none
    pub fn cover_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// One-line card used by the listings page
    pub fn format_card(&self) -> String {
        format!(
            "[{}] {} | {} | ₹{}/night",
            self.id,
            self.title,
            self.location,
            format_inr(self.price)
        )
    }

    /// Full detail view of a listing
    pub fn format_details(&self) -> String {
        let mut message = format!("{}\n", self.title);
        message.push_str(&format!("📍 {}\n\n", self.location));

        if !self.description.is_empty() {
            message.push_str(&format!("{}\n\n", self.description));
        }

        message.push_str(&format!("₹{}/night\n", format_inr(self.price)));
        message.push_str(&format!("👥 Max Guests: {}\n", self.max_guests));
        message.push_str(&format!("🛏️ Bedrooms: {}\n", self.bedrooms));
        message.push_str(&format!("🚿 Bathrooms: {}\n", self.bathrooms));

        if !self.amenities.is_empty() {
            message.push_str(&format!("Amenities: {}\n", self.amenities.join(", ")));
        }

        message.push_str(&format!("🖼️ {}\n", self.cover_image()));

        if let Some(host) = &self.host {
            message.push_str(&format!("\nHosted by {}", host.name));
            if let Some(created_at) = host.created_at {
                message.push_str(&format!(" (member since {})", created_at.format("%Y")));
            }
        }

        message
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// The guest of a booking arrives either populated or as a bare id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GuestRef {
    User(User),
    Id(String),
}

/// The listing of a booking, populated or as a bare id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListingRef {
    Listing(Box<Listing>),
    Id(String),
}

impl ListingRef {
    pub fn id(&self) -> &str {
        match self {
            ListingRef::Listing(listing) => &listing.id,
            ListingRef::Id(id) => id,
        }
    }

    pub fn listing(&self) -> Option<&Listing> {
        match self {
            ListingRef::Listing(listing) => Some(listing.as_ref()),
            ListingRef::Id(_) => None,
        }
    }
}

impl From<Listing> for ListingRef {
    fn from(listing: Listing) -> Self {
        ListingRef::Listing(Box::new(listing))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub listing: ListingRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestRef>,
    #[serde(alias = "checkIn", with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(alias = "checkOut", with = "calendar_date")]
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Nights between start and end, checkout day excluded
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Stored total, or nightly price times nights when the API omits it.
    /// `None` when neither the total nor the listing's price was sent.
    pub fn total(&self) -> Option<f64> {
        self.total_price.or_else(|| {
            self.listing
                .listing()
                .map(|listing| listing.price * self.nights() as f64)
        })
    }

    pub fn format_dashboard_entry(&self) -> String {
        let heading = match self.listing.listing() {
            Some(listing) => format!("{} ({})", listing.title, listing.location),
            None => format!("listing {}", self.listing.id()),
        };
        let total = self
            .total()
            .map(|total| format!("₹{}", format_inr(total)))
            .unwrap_or_else(|| "total unavailable".to_string());

        format!(
            "[{}] {}\n  {} → {} | {} nights | {} | {}",
            self.id,
            heading,
            self.start_date.format("%d %b %Y"),
            self.end_date.format("%d %b %Y"),
            self.nights(),
            total,
            self.status.as_str().to_uppercase()
        )
    }
}

/// Payload of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub listing: String,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Formats an amount with Indian digit grouping (`12,34,567`), dropping
/// the fraction when it is zero.
pub fn format_inr(amount: f64) -> String {
    let negative = amount < 0.0;
    let amount = amount.abs();
    let whole = amount.trunc() as u64;
    let fraction = ((amount - amount.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let sign = if negative { "-" } else { "" };
    match fraction {
        0 => format!("{}{}", sign, grouped),
        100 => format!("{}{}", sign, format_inr(whole as f64 + 1.0)),
        f => format!("{}{}.{:02}", sign, grouped, f),
    }
}

/// Dates travel as ISO strings; the API may send either a plain date or a
/// full timestamp, and only the calendar day is kept.
mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.date_naive())
            .map_err(|e| de::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }
}

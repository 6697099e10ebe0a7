use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;
use thiserror::Error;

use crate::models::{BookingRequest, Listing};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("check-out ({check_out}) must be after check-in ({check_in})")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("{guests} guests exceeds the maximum of {max_guests} for this listing")]
    GuestCountExceeded { guests: u32, max_guests: u32 },

    #[error("please select both check-in and check-out dates")]
    MissingDates,

    #[error("at least one guest is required")]
    NoGuests,
}

/// Nights stayed and the resulting price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub nights: i64,
    pub total: f64,
}

/// Prices a stay. Dates are calendar days and the checkout day is not a night.
pub fn quote(
    nightly_price: f64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: u32,
    max_guests: u32,
) -> Result<Quote, QuoteError> {
    if check_out <= check_in {
        return Err(QuoteError::InvalidDateRange { check_in, check_out });
    }

    if guests > max_guests {
        return Err(QuoteError::GuestCountExceeded { guests, max_guests });
    }

    let nights = (check_out - check_in).num_days();

    Ok(Quote {
        nights,
        total: nightly_price * nights as f64,
    })
}

/// Same as [`quote`] for timestamps; the time of day is dropped first.
pub fn quote_datetimes<Tz: TimeZone>(
    nightly_price: f64,
    check_in: &DateTime<Tz>,
    check_out: &DateTime<Tz>,
    guests: u32,
    max_guests: u32,
) -> Result<Quote, QuoteError> {
    quote(
        nightly_price,
        check_in.date_naive(),
        check_out.date_naive(),
        guests,
        max_guests,
    )
}

/// State of the booking form on a listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u32,
}

impl BookingForm {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate, guests: u32) -> Self {
        Self {
            check_in: Some(check_in),
            check_out: Some(check_out),
            guests,
        }
    }

    /// Validates the form against a listing and prices it
    pub fn quote_for(&self, listing: &Listing) -> Result<Quote, QuoteError> {
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(QuoteError::MissingDates),
        };

        if self.guests == 0 {
            return Err(QuoteError::NoGuests);
        }

        quote(listing.price, check_in, check_out, self.guests, listing.max_guests)
    }

    /// Builds the `POST /bookings` payload, carrying the computed total
    pub fn to_request(&self, listing: &Listing) -> Result<(Quote, BookingRequest), QuoteError> {
        let quote = self.quote_for(listing)?;
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(QuoteError::MissingDates),
        };

        let request = BookingRequest {
            listing: listing.id.clone(),
            start_date: check_in,
            end_date: check_out,
            guests: self.guests,
            total_price: quote.total,
        };

        Ok((quote, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listing(price: f64, max_guests: u32) -> Listing {
        Listing {
            id: "l1".to_string(),
            title: "Cottage".to_string(),
            description: String::new(),
            price,
            location: "Manali".to_string(),
            amenities: vec![],
            images: vec![],
            max_guests,
            bedrooms: 1,
            bathrooms: 1,
            host: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_three_night_stay() {
        let q = quote(2000.0, date(2024, 1, 1), date(2024, 1, 4), 2, 4).unwrap();
        assert_eq!(q, Quote { nights: 3, total: 6000.0 });
    }

    #[test]
    fn test_same_day_checkout_is_invalid() {
        let err = quote(2000.0, date(2024, 1, 1), date(2024, 1, 1), 1, 4).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_checkout_before_checkin_is_invalid() {
        let err = quote(2000.0, date(2024, 1, 5), date(2024, 1, 1), 1, 4).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_too_many_guests() {
        let err = quote(2000.0, date(2024, 1, 1), date(2024, 1, 4), 5, 4).unwrap_err();
        assert_eq!(err, QuoteError::GuestCountExceeded { guests: 5, max_guests: 4 });
    }

    #[test]
    fn test_exactly_max_guests_is_allowed() {
        assert!(quote(2000.0, date(2024, 1, 1), date(2024, 1, 2), 4, 4).is_ok());
    }

    #[test]
    fn test_stay_across_month_and_leap_day() {
        let q = quote(1500.0, date(2024, 2, 27), date(2024, 3, 2), 1, 2).unwrap();
        assert_eq!(q.nights, 4);
        assert_eq!(q.total, 6000.0);
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        let check_in = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2024, 1, 4, 1, 0, 0).unwrap();
        let q = quote_datetimes(2000.0, &check_in, &check_out, 1, 2).unwrap();
        assert_eq!(q.nights, 3);
    }

    #[test]
    fn test_form_requires_both_dates() {
        let form = BookingForm {
            check_in: Some(date(2024, 1, 1)),
            check_out: None,
            guests: 1,
        };
        assert_eq!(form.quote_for(&listing(2000.0, 4)), Err(QuoteError::MissingDates));
    }

    #[test]
    fn test_form_requires_a_guest() {
        let form = BookingForm::new(date(2024, 1, 1), date(2024, 1, 2), 0);
        assert_eq!(form.quote_for(&listing(2000.0, 4)), Err(QuoteError::NoGuests));
    }

    #[test]
    fn test_form_builds_request_with_total() {
        let form = BookingForm::new(date(2024, 1, 1), date(2024, 1, 4), 2);
        let (q, request) = form.to_request(&listing(2000.0, 4)).unwrap();
        assert_eq!(q.nights, 3);
        assert_eq!(request.listing, "l1");
        assert_eq!(request.total_price, 6000.0);
        assert_eq!(request.guests, 2);
    }
}

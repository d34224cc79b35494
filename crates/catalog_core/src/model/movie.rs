//! Movie domain model.
//!
//! # Invariants
//! - `ReleaseDate` ordering is chronological: year, then month, then day.
//! - `rating` lives in `1..=RATING_MAX`; `0` means unset.

use super::text_matches;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Storage-assigned movie identity.
pub type MovieId = i64;

/// Highest accepted movie rating.
pub const RATING_MAX: u8 = 5;

/// Calendar release date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ReleaseDate {
    /// Day of month. Serialized as `date` to match external payloads.
    #[serde(rename = "date")]
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl ReleaseDate {
    pub fn new(day: u8, month: u8, year: u16) -> Self {
        Self { day, month, year }
    }

    /// All three components are non-zero.
    pub fn is_set(&self) -> bool {
        self.day != 0 && self.month != 0 && self.year != 0
    }

    /// The date exists in the Gregorian calendar, leap days included.
    pub fn is_calendar_valid(&self) -> bool {
        (1..=9999).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=days_in_month(self.year, self.month)).contains(&self.day)
    }

    /// Parses the canonical `YYYY-MM-DD` form.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.splitn(3, '-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let day = parts.next()?.parse().ok()?;
        Some(Self { day, month, year })
    }

    fn sort_key(&self) -> (u16, u8, u8) {
        (self.year, self.month, self.day)
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl Ord for ReleaseDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ReleaseDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ReleaseDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Creation payload for a movie. Identity is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewMovie {
    pub name: String,
    pub release_date: ReleaseDate,
    pub country: String,
    pub genre: String,
    pub rating: u8,
}

/// Persisted movie record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub release_date: ReleaseDate,
    pub country: String,
    pub genre: String,
    pub rating: u8,
}

/// Partial update payload. Only `Some` fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovieUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<ReleaseDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl NewMovie {
    pub fn new(
        name: impl Into<String>,
        release_date: ReleaseDate,
        country: impl Into<String>,
        genre: impl Into<String>,
        rating: u8,
    ) -> Self {
        Self {
            name: name.into(),
            release_date,
            country: country.into(),
            genre: genre.into(),
            rating,
        }
    }

    /// Binds a storage-assigned id to this payload.
    pub fn with_id(self, id: MovieId) -> Movie {
        Movie {
            id,
            name: self.name,
            release_date: self.release_date,
            country: self.country,
            genre: self.genre,
            rating: self.rating,
        }
    }

    /// Lists required fields that are empty or zero.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if !self.release_date.is_set() {
            missing.push("release_date");
        }
        if self.country.trim().is_empty() {
            missing.push("country");
        }
        if self.genre.trim().is_empty() {
            missing.push("genre");
        }
        if self.rating == 0 {
            missing.push("rating");
        }
        missing
    }
}

impl Movie {
    /// Returns whether this stored movie is equivalent to `probe`.
    ///
    /// Text fields use containment; date and rating must be equal.
    pub fn matches(&self, probe: &NewMovie) -> bool {
        text_matches(&self.name, &probe.name)
            && self.release_date == probe.release_date
            && text_matches(&self.country, &probe.country)
            && text_matches(&self.genre, &probe.genre)
            && self.rating == probe.rating
    }

    pub fn to_new(&self) -> NewMovie {
        NewMovie {
            name: self.name.clone(),
            release_date: self.release_date,
            country: self.country.clone(),
            genre: self.genre.clone(),
            rating: self.rating,
        }
    }
}

impl MovieUpdate {
    /// Overwrites fields of `movie` that are present in this payload.
    pub fn apply_to(&self, movie: &mut Movie) {
        if let Some(name) = &self.name {
            movie.name = name.clone();
        }
        if let Some(release_date) = self.release_date {
            movie.release_date = release_date;
        }
        if let Some(country) = &self.country {
            movie.country = country.clone();
        }
        if let Some(genre) = &self.genre {
            movie.genre = genre.clone();
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
    }
}

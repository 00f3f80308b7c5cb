//! Season identifiers group one generation run's output.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::SeasonError;

/// Identifies a season, eg `2025_S3_v1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SeasonId(String);

impl SeasonId {
    /// The season for the ISO week containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let week = date.iso_week();
        Self(format!("{}_S{}_v1", week.year(), week.week()))
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Document collection holding this season's cards.
    pub fn collection_path(&self) -> String {
        format!("seasons/{}/cards", self.0)
    }
}

/// Parses a season id given on the command line. It becomes one path
/// segment of `seasons/{season}/cards`, so separators and `..` are refused.
impl FromStr for SeasonId {
    type Err = SeasonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SeasonError::Empty);
        }
        if value.contains(['/', '\\']) || value.contains("..") {
            return Err(SeasonError::InvalidPath(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

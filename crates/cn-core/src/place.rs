//! Canonical place record shared by facilities and amenities.

use std::collections::BTreeMap;

use crate::GeoPoint;

/// Anything that can be ranked by distance.
///
/// Returning `None` excludes the record from every ranking; callers never
/// see an error for a record with unusable coordinates.
pub trait Located {
    fn location(&self) -> Option<GeoPoint>;
}

/// One normalized row from a facility, restaurant, leisure, or bus-stop
/// dataset.
///
/// Immutable once loaded.  `location` is `None` when the source row had
/// missing or invalid coordinates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    pub id:         String,
    pub name:       String,
    pub category:   String,
    pub location:   Option<GeoPoint>,
    /// Every non-canonical source column, e.g. `address` or `district`.
    pub attributes: BTreeMap<String, String>,
}

/// A care facility (welfare centre, clinic, senior centre, …).
pub type Facility = Place;

/// A restaurant, leisure site, or bus stop.  Which one is determined by the
/// dataset it was loaded from.
pub type AmenityRecord = Place;

impl Place {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        location: Option<GeoPoint>,
    ) -> Self {
        Self {
            id:         id.into(),
            name:       name.into(),
            category:   category.into(),
            location,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter, mostly for fixtures.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl Located for Place {
    #[inline]
    fn location(&self) -> Option<GeoPoint> {
        self.location.filter(|p| p.is_valid())
    }
}

impl Located for GeoPoint {
    #[inline]
    fn location(&self) -> Option<GeoPoint> {
        Some(*self).filter(|p| p.is_valid())
    }
}

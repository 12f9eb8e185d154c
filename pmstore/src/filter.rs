//! Exact-match coordinate filtering.

use crate::record::Record;

/// Criteria for [`crate::RecordStore::filter`].
///
/// Each provided coordinate must equal the record's value exactly; both
/// criteria are combined with AND. An empty filter matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordFilter {
    /// Required latitude.
    pub latitude: Option<f64>,
    /// Required longitude.
    pub longitude: Option<f64>,
}

impl RecordFilter {
    /// Create a filter from optional coordinates.
    pub fn new(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none()
    }

    /// Check a record against the filter.
    pub fn matches(&self, record: &Record) -> bool {
        let lat_ok = match self.latitude {
            Some(lat) => record.latitude == Some(lat),
            None => true,
        };
        let lon_ok = match self.longitude {
            Some(lon) => record.longitude == Some(lon),
            None => true,
        };
        lat_ok && lon_ok
    }
}

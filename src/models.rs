//! Data model types shared across the scanner, cache, and query layers.
//!
//! All serialized types use camelCase field names so that disk cache blobs
//! and JSON responses keep the wire format the surrounding web tier already
//! consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-availability flags derived from a CSV header line.
///
/// These are substring checks against the lower-cased header, not a
/// column-aware parse: a header containing "email" anywhere sets
/// `has_email`. Good enough for marketing copy, not billing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFlags {
    pub has_email: bool,
    pub has_phone: bool,
    pub has_website: bool,
    #[serde(default)]
    pub has_facebook: bool,
    #[serde(default)]
    pub has_instagram: bool,
    #[serde(default)]
    pub has_linkedin: bool,
}

impl FieldFlags {
    /// Derive flags from a raw header line (case-insensitive substring
    /// containment)
    pub fn from_header(header: &str) -> Self {
        let h = header.to_lowercase();
        Self {
            has_email: h.contains("email"),
            has_phone: h.contains("phone"),
            has_website: h.contains("website") || h.contains("url"),
            has_facebook: h.contains("facebook"),
            has_instagram: h.contains("instagram"),
            has_linkedin: h.contains("linkedin"),
        }
    }

    /// Merge flags from another file covering the same category
    pub fn merge(&mut self, other: FieldFlags) {
        self.has_email |= other.has_email;
        self.has_phone |= other.has_phone;
        self.has_website |= other.has_website;
        self.has_facebook |= other.has_facebook;
        self.has_instagram |= other.has_instagram;
        self.has_linkedin |= other.has_linkedin;
    }
}

/// Aggregate statistics for one business category within a location scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Raw category name, as in the file name (e.g. "truck_dealers")
    pub name: String,
    /// Human display name (e.g. "Truck Dealers")
    pub display_name: String,
    /// Number of data records attributed to this category
    pub records: u64,
    #[serde(flatten)]
    pub flags: FieldFlags,
    /// Source file name, present on the unfiltered per-country listing
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_name: Option<String>,
    /// Source file size in bytes, present on the unfiltered listing
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_size: Option<u64>,
    /// Human-formatted file size
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_size_formatted: Option<String>,
}

/// A persisted JSON document holding the full category list for one
/// location scope (a country, a state, or a state/city pair)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheBlob {
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    pub total_categories: usize,
    pub categories: Vec<CategorySummary>,
    /// Number of CSV files in the country directory at build time.
    /// Present only on per-country blobs, where it is the freshness guard.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub built_at: Option<DateTime<Utc>>,
}

/// One available country, derived from the top-level directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub code: String,
    pub name: String,
    pub total_categories: usize,
    pub folder_name: String,
}

/// Pagination envelope attached to every paged response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Build the pagination envelope for a total item count.
    ///
    /// `total_pages = ceil(total / limit)`; `has_next_page = page <
    /// total_pages`; `has_prev_page = page > 1`. Assumes page and limit
    /// have already been coerced to positive values.
    pub fn new(total: u64, page: usize, limit: usize) -> Self {
        let total_pages = (total as usize).div_ceil(limit);
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Response payload for category listing and filtered count queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    pub total_categories: u64,
    pub categories: Vec<CategorySummary>,
    pub pagination: Pagination,
}

/// One parsed CSV row, keyed by header column name
pub type CsvRecord = BTreeMap<String, String>;

/// Response payload for full-row data retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsResponse {
    pub country: String,
    pub category: String,
    pub data: Vec<CsvRecord>,
    pub pagination: Pagination,
}

/// Per-country roll-up used by the cross-country stats summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryStats {
    pub code: String,
    pub name: String,
    pub total_records: u64,
    pub total_categories: usize,
    pub total_size: String,
    pub top_categories: Vec<CategorySummary>,
}

/// Cross-country stats summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_countries: usize,
    pub total_categories: usize,
    pub total_records: u64,
    pub countries: Vec<CountryStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_flags_from_header() {
        let flags = FieldFlags::from_header("Name,Email,Phone Number,Website");
        assert!(flags.has_email);
        assert!(flags.has_phone);
        assert!(flags.has_website);
        assert!(!flags.has_facebook);

        let flags = FieldFlags::from_header("name,url,facebook_page");
        assert!(!flags.has_email);
        assert!(flags.has_website);
        assert!(flags.has_facebook);
    }

    #[test]
    fn test_field_flags_merge() {
        let mut a = FieldFlags::from_header("name,email");
        let b = FieldFlags::from_header("name,phone");
        a.merge(b);
        assert!(a.has_email);
        assert!(a.has_phone);
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(45, 3, 20);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);

        let p = Pagination::new(45, 1, 20);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);

        let p = Pagination::new(0, 1, 20);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = CategorySummary {
            name: "truck_dealers".to_string(),
            display_name: "Truck Dealers".to_string(),
            records: 42,
            flags: FieldFlags::from_header("name,email,phone"),
            file_name: None,
            file_size: None,
            file_size_formatted: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["displayName"], "Truck Dealers");
        assert_eq!(json["hasEmail"], true);
        assert_eq!(json["records"], 42);
        assert!(json.get("fileName").is_none());
    }

    #[test]
    fn test_blob_without_social_flags_still_parses() {
        // Blobs written before the per-social flags existed
        let json = r#"{
            "country": "US",
            "state": "Texas",
            "city": "",
            "totalCategories": 1,
            "categories": [{
                "name": "gyms",
                "displayName": "Gyms",
                "records": 7,
                "hasEmail": true,
                "hasPhone": false,
                "hasWebsite": true
            }]
        }"#;
        let blob: CacheBlob = serde_json::from_str(json).unwrap();
        assert_eq!(blob.categories[0].records, 7);
        assert!(!blob.categories[0].flags.has_facebook);
        assert!(blob.file_count.is_none());
    }
}

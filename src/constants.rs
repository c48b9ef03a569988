//! Application constants for leadstats
//!
//! This module contains directory-naming conventions, the static location
//! universe used by the precomputation workers, country display names, and
//! default values for the cache tiers.

// =============================================================================
// Directory and File Naming Conventions
// =============================================================================

/// Suffix of per-country merged data directories (e.g. "US_Merged")
pub const MERGED_DIR_SUFFIX: &str = "_Merged";

/// Name of the disk cache directory under the data root
pub const CACHE_DIR_NAME: &str = ".cache";

/// File extension of category files
pub const CSV_EXTENSION: &str = "csv";

// =============================================================================
// Cache Defaults
// =============================================================================

/// Memory-tier TTL in seconds
pub const MEMORY_TTL_SECS: u64 = 45 * 60;

/// Number of files scanned concurrently on the on-demand path
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 50;

/// Chunk size for streaming scans, in bytes
pub const DEFAULT_SCAN_CHUNK_SIZE: usize = 128 * 1024;

/// Default page size for paginated responses
pub const DEFAULT_PAGE_LIMIT: usize = 20;

// =============================================================================
// Location Universe
// =============================================================================

/// Target states for the static-list precomputation mode.
///
/// Every category file in a country's merged directory is scanned once
/// against this whole set; rows are attributed to the first state whose
/// name appears in the row text.
pub const TARGET_STATES: &[&str] = &[
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
    "Washington DC",
    "Puerto Rico",
];

/// State abbreviation to display name, for unmerged trees whose state
/// directories use two-letter codes (e.g. "CA" -> "California")
pub const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("DC", "Washington DC"),
];

/// Country code to display name for the countries the scraper covers
pub const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("UK", "United Kingdom"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("IN", "India"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("JP", "Japan"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
];

/// Resolve a state directory name to its display name.
///
/// Two-letter codes are looked up in the abbreviation table; anything else
/// is taken to already be a display name.
pub fn resolve_state_name(dir_name: &str) -> String {
    let upper = dir_name.to_uppercase();
    STATE_ABBREVIATIONS
        .iter()
        .find(|(code, _)| *code == upper)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| dir_name.to_string())
}

/// Resolve a country code to its display name, falling back to the
/// upper-cased code for unknown countries.
pub fn country_display_name(code: &str) -> String {
    let upper = code.to_uppercase();
    COUNTRY_NAMES
        .iter()
        .find(|(c, _)| *c == upper)
        .map(|(_, name)| name.to_string())
        .unwrap_or(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_state_name() {
        assert_eq!(resolve_state_name("CA"), "California");
        assert_eq!(resolve_state_name("ca"), "California");
        assert_eq!(resolve_state_name("DC"), "Washington DC");
        assert_eq!(resolve_state_name("Texas"), "Texas");
        assert_eq!(resolve_state_name("Yucatan"), "Yucatan");
    }

    #[test]
    fn test_country_display_name() {
        assert_eq!(country_display_name("US"), "United States");
        assert_eq!(country_display_name("us"), "United States");
        assert_eq!(country_display_name("ZZ"), "ZZ");
    }

    #[test]
    fn test_target_states_cover_abbreviations() {
        for (_, name) in STATE_ABBREVIATIONS {
            assert!(
                TARGET_STATES.contains(name),
                "abbreviation target {} missing from TARGET_STATES",
                name
            );
        }
    }
}

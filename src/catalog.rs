//! Filesystem catalog for merged lead data.
//!
//! Knows the on-disk naming conventions (one `{CC}_Merged` directory per
//! country, flat `{category}.csv` files inside) and provides the shallow
//! directory listings the query service and the precompute workers build on.

use crate::constants::{CSV_EXTENSION, MERGED_DIR_SUFFIX, country_display_name};
use crate::models::CountryInfo;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// One category CSV file discovered in a country's merged directory
#[derive(Debug, Clone)]
pub struct CategoryFile {
    /// Full path to the CSV file
    pub path: PathBuf,
    /// Raw category name (file stem, e.g. "truck_dealers")
    pub name: String,
    /// File size in bytes
    pub size: u64,
}

/// Filesystem catalog rooted at the merged data directory
#[derive(Debug, Clone)]
pub struct Catalog {
    data_root: PathBuf,
}

impl Catalog {
    /// Create a catalog for the given data root
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// Root directory holding the per-country folders
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Merged directory for a country code, e.g. "US" -> `{root}/US_Merged`
    pub fn merged_dir(&self, country: &str) -> PathBuf {
        self.data_root
            .join(format!("{}{}", country.to_uppercase(), MERGED_DIR_SUFFIX))
    }

    /// Unmerged source tree for a country code, e.g. "US" -> `{root}/US`
    pub fn unmerged_dir(&self, country: &str) -> PathBuf {
        self.data_root.join(country.to_uppercase())
    }

    /// Path of one category file inside a country's merged directory
    pub fn category_file_path(&self, country: &str, category: &str) -> PathBuf {
        self.merged_dir(country).join(format!("{category}.csv"))
    }

    /// List every country that has a merged directory, with its category
    /// file count
    pub async fn list_countries(&self) -> Result<Vec<CountryInfo>> {
        if !self.data_root.exists() {
            return Err(Error::not_found(format!(
                "data root {}",
                self.data_root.display()
            )));
        }

        let mut countries = Vec::new();
        let mut dir = fs::read_dir(&self.data_root).await?;

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let folder_name = entry.file_name().to_string_lossy().into_owned();
            let Some(code) = folder_name.strip_suffix(MERGED_DIR_SUFFIX) else {
                continue;
            };

            let total_categories = count_csv_files(&entry.path()).await?;
            countries.push(CountryInfo {
                code: code.to_string(),
                name: country_display_name(code),
                total_categories,
                folder_name,
            });
        }

        countries.sort_by(|a, b| a.code.cmp(&b.code));
        debug!("Found {} merged country directories", countries.len());
        Ok(countries)
    }

    /// List the category CSV files in a country's merged directory.
    ///
    /// Returns `Error::NotFound` when the country has no merged directory.
    pub async fn list_category_files(&self, country: &str) -> Result<Vec<CategoryFile>> {
        let merged = self.merged_dir(country);
        if !merged.exists() {
            return Err(Error::not_found(format!("merged data for {country}")));
        }

        let mut files = Vec::new();
        let mut dir = fs::read_dir(&merged).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !is_csv_file(&path) {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let size = entry.metadata().await.map(|m| m.len()).unwrap_or(0);
            files.push(CategoryFile { path, name, size });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Found {} category files in {}",
            files.len(),
            merged.display()
        );
        Ok(files)
    }

    /// Count the CSV files in a country's merged directory.
    ///
    /// This is the freshness guard input for the per-country cache blob.
    pub async fn count_category_files(&self, country: &str) -> Result<usize> {
        let merged = self.merged_dir(country);
        if !merged.exists() {
            return Err(Error::not_found(format!("merged data for {country}")));
        }
        count_csv_files(&merged).await
    }
}

/// Count CSV files directly inside a directory (non-recursive)
async fn count_csv_files(dir: &Path) -> Result<usize> {
    let mut count = 0;
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if is_csv_file(&entry.path()) {
            count += 1;
        }
    }
    Ok(count)
}

/// Check if a path is a CSV file
pub fn is_csv_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CSV_EXTENSION)
}

/// Format a raw category name for display, e.g. "truck_dealers" ->
/// "Truck Dealers"
pub fn format_category_name(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a byte count as a human-readable size
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn create_test_root(temp: &TempDir) -> PathBuf {
        let root = temp.path().to_path_buf();
        let us = root.join("US_Merged");
        std_fs::create_dir_all(&us).unwrap();
        std_fs::write(us.join("restaurants.csv"), "name,phone\nJoe's,555\n").unwrap();
        std_fs::write(us.join("schools.csv"), "name,email\n").unwrap();
        std_fs::write(us.join("notes.txt"), "ignored").unwrap();

        let uk = root.join("UK_Merged");
        std_fs::create_dir_all(&uk).unwrap();
        std_fs::write(uk.join("pubs.csv"), "name\n").unwrap();

        // Unmerged tree and stray files must not show up as countries
        std_fs::create_dir_all(root.join("US")).unwrap();
        std_fs::write(root.join("readme.md"), "x").unwrap();
        root
    }

    #[tokio::test]
    async fn test_list_countries() {
        let temp = TempDir::new().unwrap();
        let root = create_test_root(&temp);
        let catalog = Catalog::new(root);

        let countries = catalog.list_countries().await.unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].code, "UK");
        assert_eq!(countries[0].name, "United Kingdom");
        assert_eq!(countries[0].total_categories, 1);
        assert_eq!(countries[1].code, "US");
        assert_eq!(countries[1].total_categories, 2);
    }

    #[tokio::test]
    async fn test_list_category_files_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let root = create_test_root(&temp);
        let catalog = Catalog::new(root);

        let files = catalog.list_category_files("us").await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "restaurants");
        assert_eq!(files[1].name, "schools");
        assert!(files[0].size > 0);
    }

    #[tokio::test]
    async fn test_missing_country_is_not_found() {
        let temp = TempDir::new().unwrap();
        let catalog = Catalog::new(temp.path());

        let result = catalog.list_category_files("FR").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_count_category_files() {
        let temp = TempDir::new().unwrap();
        let root = create_test_root(&temp);
        let catalog = Catalog::new(root.clone());

        assert_eq!(catalog.count_category_files("US").await.unwrap(), 2);

        std_fs::write(root.join("US_Merged").join("gyms.csv"), "name\n").unwrap();
        assert_eq!(catalog.count_category_files("US").await.unwrap(), 3);
    }

    #[test]
    fn test_format_category_name() {
        assert_eq!(format_category_name("truck_dealers"), "Truck Dealers");
        assert_eq!(format_category_name("gyms"), "Gyms");
        assert_eq!(format_category_name("bed_and_breakfast"), "Bed And Breakfast");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_is_csv_file() {
        assert!(is_csv_file(Path::new("restaurants.csv")));
        assert!(!is_csv_file(Path::new("restaurants.txt")));
        assert!(!is_csv_file(Path::new("restaurants")));
    }
}

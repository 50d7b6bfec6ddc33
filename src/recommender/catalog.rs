use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading a catalog snapshot
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to parse CSV catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog record {0} has no hotel name")]
    MissingName(usize),
}

/// Raw hotel record as found in the hotel dataset
///
/// Field names follow the dataset columns, so either the CSV export or a JSON
/// dump of the hotels collection can be loaded as-is.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HotelRecord {
    #[serde(rename = "HotelName", default)]
    pub name: Option<String>,
    #[serde(rename = "countyName", default)]
    pub region: Option<String>,
    #[serde(rename = "cityName", default)]
    pub city: Option<String>,
    #[serde(rename = "HotelRating", default)]
    pub rating: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "HotelFacilities", default)]
    pub facilities: Option<String>,
    #[serde(rename = "Attractions", default)]
    pub attractions: Option<String>,
    /// Pre-computed similarity text; derived from the other fields when absent
    #[serde(default)]
    pub combined: Option<String>,
}

impl HotelRecord {
    /// Text used as the similarity signal for this record
    fn combined_text(&self) -> String {
        if let Some(combined) = self.combined.as_deref().map(str::trim) {
            if !combined.is_empty() {
                return combined.to_string();
            }
        }

        [
            &self.region,
            &self.city,
            &self.rating,
            &self.address,
            &self.facilities,
            &self.attractions,
        ]
        .iter()
        .filter_map(|field| field.as_deref().map(str::trim))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// One entry of a loaded catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Row position, only meaningful within the load generation that assigned it
    pub position: usize,
    pub name: String,
    pub region: String,
    pub city: String,
    pub rating: String,
    pub address: String,
    pub combined_text: String,
}

impl CatalogItem {
    /// Creates an item with only a name and similarity text
    pub fn new(position: usize, name: impl Into<String>, combined_text: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            region: String::new(),
            city: String::new(),
            rating: String::new(),
            address: String::new(),
            combined_text: combined_text.into(),
        }
    }
}

/// Immutable snapshot of the recommendation catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Loads a catalog file: CSV when the extension is `.csv`, JSON otherwise
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            let file = std::fs::File::open(path)?;
            return Self::from_csv(file);
        }

        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses a catalog from CSV with a header row of dataset column names.
    ///
    /// Headers and fields are trimmed, empty fields count as missing and
    /// unknown columns are ignored.
    pub fn from_csv(reader: impl std::io::Read) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let records = reader
            .deserialize()
            .collect::<Result<Vec<HotelRecord>, csv::Error>>()?;
        Self::from_records(records)
    }

    /// Parses a catalog from a JSON array of hotel records
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<HotelRecord> = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    /// Builds a catalog, assigning positions in record order
    pub fn from_records(records: Vec<HotelRecord>) -> Result<Self, CatalogError> {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| -> Result<CatalogItem, CatalogError> {
                let name = record
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or(CatalogError::MissingName(position))?
                    .to_string();
                let combined_text = record.combined_text();

                Ok(CatalogItem {
                    position,
                    name,
                    region: record.region.unwrap_or_default(),
                    city: record.city.unwrap_or_default(),
                    rating: record.rating.unwrap_or_default(),
                    address: record.address.unwrap_or_default(),
                    combined_text,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { items })
    }

    /// Builds a catalog from already-shaped items, renumbering positions
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| CatalogItem { position, ..item })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_uses_combined_field() {
        let raw = r#"[
            {"HotelName": "Alpha Inn", "countyName": "Morocco", "cityName": "Agadir",
             "HotelRating": "FourStar", "Address": "1 Beach Rd", "combined": "beach resort pool"}
        ]"#;

        let catalog = Catalog::from_json(raw).unwrap();
        assert_eq!(catalog.len(), 1);

        let item = &catalog.items()[0];
        assert_eq!(item.position, 0);
        assert_eq!(item.name, "Alpha Inn");
        assert_eq!(item.region, "Morocco");
        assert_eq!(item.city, "Agadir");
        assert_eq!(item.rating, "FourStar");
        assert_eq!(item.combined_text, "beach resort pool");
    }

    #[test]
    fn test_from_json_derives_combined_text() {
        let raw = r#"[
            {"HotelName": "Beta Lodge", "countyName": "Morocco", "cityName": "Ifrane",
             "HotelRating": "ThreeStar", "Address": null, "HotelFacilities": "Spa, Sauna"}
        ]"#;

        let catalog = Catalog::from_json(raw).unwrap();
        let item = &catalog.items()[0];
        assert_eq!(item.address, "");
        assert_eq!(item.combined_text, "Morocco Ifrane ThreeStar Spa, Sauna");
    }

    #[test]
    fn test_from_json_rejects_missing_name() {
        let raw = r#"[{"HotelName": "Ok"}, {"cityName": "Rabat"}]"#;
        let err = Catalog::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::MissingName(1)));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_from_csv_reads_dataset_columns() {
        let raw = "countyCode, countyName, cityName, HotelCode, HotelName, HotelRating, Address, Attractions, HotelFacilities\n\
                   MA,Morocco,Agadir,1001, Alpha Inn ,FourStar,1 Beach Rd,,\"Pool, Spa\"\n\
                   MA,Morocco,Ifrane,1002,Beta Lodge,ThreeStar,,Cedar forest,Sauna\n";

        let catalog = Catalog::from_csv(raw.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let alpha = &catalog.items()[0];
        assert_eq!(alpha.name, "Alpha Inn");
        assert_eq!(alpha.city, "Agadir");
        assert_eq!(alpha.combined_text, "Morocco Agadir FourStar 1 Beach Rd Pool, Spa");

        let beta = &catalog.items()[1];
        assert_eq!(beta.position, 1);
        assert_eq!(beta.address, "");
        assert_eq!(beta.combined_text, "Morocco Ifrane ThreeStar Sauna Cedar forest");
    }

    #[test]
    fn test_from_csv_rejects_missing_name() {
        let raw = "HotelName,cityName\nAlpha Inn,Agadir\n,Rabat\n";
        let err = Catalog::from_csv(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingName(1)));
    }

    #[test]
    fn test_from_path_picks_format_by_extension() {
        let dir = std::env::temp_dir();
        let csv_path = dir.join(format!("catalog-{}.csv", uuid::Uuid::new_v4()));
        let json_path = dir.join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&csv_path, "HotelName,combined\nAlpha Inn,beach resort\n").unwrap();
        std::fs::write(&json_path, r#"[{"HotelName": "Beta Lodge", "combined": "spa"}]"#).unwrap();

        assert_eq!(Catalog::from_path(&csv_path).unwrap().items()[0].name, "Alpha Inn");
        assert_eq!(Catalog::from_path(&json_path).unwrap().items()[0].name, "Beta Lodge");

        std::fs::remove_file(csv_path).ok();
        std::fs::remove_file(json_path).ok();
    }

    #[test]
    fn test_from_items_renumbers_positions() {
        let catalog = Catalog::from_items(vec![
            CatalogItem::new(7, "A", "x"),
            CatalogItem::new(3, "B", "y"),
        ]);
        let positions: Vec<usize> = catalog.items().iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }
}

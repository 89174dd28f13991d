//! Loading of the trading post table.
//!
//! The table is comma-delimited with the header
//! `Nom,Autres Noms,Longitude,Latitude,Empire,start_year,end_year`.
//! Rows that fail validation are skipped and reported rather than loaded
//! with nonsense coordinates or years.

use std::collections::HashSet;
use std::io;

use serde::Deserialize;

use crate::error::{PostError, TableError};
use crate::models::{PostKey, TradingPost, Year};

const REQUIRED_COLUMNS: [&str; 6] = [
    "Nom",
    "Longitude",
    "Latitude",
    "Empire",
    "start_year",
    "end_year",
];

#[derive(Debug, Deserialize)]
struct PostRow {
    #[serde(rename = "Nom", default)]
    name: Option<String>,
    #[serde(rename = "Autres Noms", default)]
    alt_names: Option<String>,
    #[serde(rename = "Longitude", default)]
    lon: Option<String>,
    #[serde(rename = "Latitude", default)]
    lat: Option<String>,
    #[serde(rename = "Empire", default)]
    empire: Option<String>,
    #[serde(default)]
    start_year: Option<String>,
    #[serde(default)]
    end_year: Option<String>,
}

impl TryFrom<PostRow> for TradingPost {
    type Error = PostError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let name = required_text(row.name, "Nom")?;
        let empire = required_text(row.empire, "Empire")?;
        let lon: f64 = required_number(row.lon, "Longitude")?;
        let lat: f64 = required_number(row.lat, "Latitude")?;
        let start_year: Year = required_number(row.start_year, "start_year")?;
        let end_year: Year = required_number(row.end_year, "end_year")?;

        if !(-180.0..=180.0).contains(&lon) {
            return Err(PostError::LongitudeOutOfRange(lon));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(PostError::LatitudeOutOfRange(lat));
        }
        if start_year > end_year {
            return Err(PostError::InvertedRange {
                start: start_year,
                end: end_year,
            });
        }

        Ok(TradingPost {
            name,
            alt_names: row
                .alt_names
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            lon,
            lat,
            empire,
            start_year,
            end_year,
        })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, PostError> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(PostError::Missing(field))
}

fn required_number<T: std::str::FromStr>(
    value: Option<String>,
    field: &'static str,
) -> Result<T, PostError> {
    let text = required_text(value, field)?;
    text.parse::<T>()
        .map_err(|_| PostError::NotNumeric { field, value: text })
}

/// A row that was left out of the table, with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub error: PostError,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTable {
    pub posts: Vec<TradingPost>,
    pub skipped: Vec<SkippedRow>,
}

/// Read the trading post table. Only a missing column or an unreadable
/// header fails the whole table; bad rows end up in `skipped`.
pub fn read_posts<R: io::Read>(reader: R) -> Result<PostTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(TableError::MissingColumn(column));
        }
    }

    let mut table = PostTable::default();
    let mut seen: HashSet<PostKey> = HashSet::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                table.skip(line, PostError::Malformed(err.to_string()));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let parsed = record
            .deserialize::<PostRow>(Some(&headers))
            .map_err(|err| PostError::Malformed(err.to_string()))
            .and_then(TradingPost::try_from);

        match parsed {
            Ok(post) => {
                let key = post.key();
                if seen.contains(&key) {
                    table.skip(line, PostError::Duplicate(key));
                } else {
                    seen.insert(key);
                    table.posts.push(post);
                }
            }
            Err(error) => table.skip(line, error),
        }
    }

    Ok(table)
}

pub fn parse_posts(text: &str) -> Result<PostTable, TableError> {
    read_posts(text.as_bytes())
}

impl PostTable {
    fn skip(&mut self, line: u64, error: PostError) {
        tracing::debug!(line, %error, "Skipping trading post row");
        self.skipped.push(SkippedRow { line, error });
    }
}

/// Distinct empires in order of first appearance.
pub fn empires(posts: &[TradingPost]) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .filter(|p| seen.insert(p.empire.as_str()))
        .map(|p| p.empire.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Nom,Autres Noms,Longitude,Latitude,Empire,start_year,end_year\n";

    #[test]
    fn test_parse_valid_rows() {
        let text = format!(
            "{HEADER}Goa,Velha Goa,73.91,15.50,Portugal,1510,1961\n\
             Batavia,,106.81,-6.13,Dutch,1619,1949\n"
        );
        let table = parse_posts(&text).unwrap();
        assert!(table.skipped.is_empty());
        assert_eq!(table.posts.len(), 2);

        let goa = &table.posts[0];
        assert_eq!(goa.name, "Goa");
        assert_eq!(goa.alt_names.as_deref(), Some("Velha Goa"));
        assert!((goa.lon - 73.91).abs() < 1e-9);
        assert!((goa.lat - 15.50).abs() < 1e-9);
        assert_eq!(goa.start_year, 1510);
        assert_eq!(goa.end_year, 1961);

        assert_eq!(table.posts[1].alt_names, None);
    }

    #[test]
    fn test_quoted_alternate_names_with_commas() {
        let text = format!("{HEADER}Surat,\"Suratte, Soorat\",72.83,21.17,England,1612,1858\n");
        let table = parse_posts(&text).unwrap();
        assert_eq!(
            table.posts[0].alt_names.as_deref(),
            Some("Suratte, Soorat")
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_reported() {
        let text = format!(
            "{HEADER}Goa,,73.91,15.50,Portugal,1510,1961\n\
             Nowhere,,abc,15.50,Portugal,1510,1961\n\
             Later,,10.0,10.0,Portugal,1700,1600\n\
             ,,10.0,10.0,Portugal,1500,1600\n\
             Elmina,,-1.35,5.08,Portugal,1482,1637\n"
        );
        let table = parse_posts(&text).unwrap();
        let names: Vec<&str> = table.posts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Goa", "Elmina"]);
        assert_eq!(table.skipped.len(), 3);

        assert_eq!(table.skipped[0].line, 3);
        assert_eq!(
            table.skipped[0].error,
            PostError::NotNumeric {
                field: "Longitude",
                value: "abc".to_string()
            }
        );
        assert_eq!(
            table.skipped[1].error,
            PostError::InvertedRange {
                start: 1700,
                end: 1600
            }
        );
        assert_eq!(table.skipped[2].error, PostError::Missing("Nom"));
    }

    #[test]
    fn test_out_of_range_coordinates_are_skipped() {
        let text = format!(
            "{HEADER}Swapped,,15.50,173.91,Portugal,1510,1961\n\
             Far,,200.0,10.0,Portugal,1510,1961\n"
        );
        let table = parse_posts(&text).unwrap();
        assert!(table.posts.is_empty());
        assert_eq!(
            table.skipped[0].error,
            PostError::LatitudeOutOfRange(173.91)
        );
        assert_eq!(table.skipped[1].error, PostError::LongitudeOutOfRange(200.0));
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let text = format!(
            "{HEADER}Cochin,,76.26,9.93,Portugal,1503,1663\n\
             Cochin,,76.26,9.93,Dutch,1663,1795\n\
             Cochin,,76.27,9.94,Portugal,1500,1502\n"
        );
        let table = parse_posts(&text).unwrap();
        assert_eq!(table.posts.len(), 2);
        assert_eq!(table.posts[0].start_year, 1503);
        assert_eq!(table.skipped.len(), 1);
        assert!(matches!(table.skipped[0].error, PostError::Duplicate(_)));
        assert!(table.skipped[0].to_string().starts_with("line 4:"));
    }

    #[test]
    fn test_short_row_is_reported_missing() {
        let text = format!("{HEADER}Goa,,73.91,15.50,Portugal\n");
        let table = parse_posts(&text).unwrap();
        assert!(table.posts.is_empty());
        assert_eq!(table.skipped[0].error, PostError::Missing("start_year"));
    }

    #[test]
    fn test_missing_column_fails_table() {
        let text = "Nom,Longitude,Latitude,Empire,start_year\nGoa,73.91,15.50,Portugal,1510\n";
        let err = parse_posts(text).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn("end_year")));
    }

    #[test]
    fn test_alternate_names_column_is_optional() {
        let text = "Nom,Longitude,Latitude,Empire,start_year,end_year\nGoa,73.91,15.50,Portugal,1510,1961\n";
        let table = parse_posts(text).unwrap();
        assert_eq!(table.posts.len(), 1);
        assert_eq!(table.posts[0].alt_names, None);
    }

    #[test]
    fn test_empires_in_first_appearance_order() {
        let text = format!(
            "{HEADER}A,,0,0,Portugal,1500,1600\n\
             B,,0,0,Dutch,1600,1700\n\
             C,,0,0,Portugal,1600,1700\n\
             D,,0,0,France,1700,1800\n"
        );
        let table = parse_posts(&text).unwrap();
        assert_eq!(empires(&table.posts), vec!["Portugal", "Dutch", "France"]);
    }
}

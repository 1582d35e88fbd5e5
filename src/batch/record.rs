//! Plant list rows and their mapping onto label parameters

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::LabelError;
use crate::types::{ContentSet, RawLabelParams, ShowFlags, PROGRESS_SLOTS};

lazy_static! {
    static ref RE_SINGLE_QUOTED: Regex = Regex::new(r"'([^']*)'").unwrap();
    static ref RE_DOUBLE_QUOTED: Regex = Regex::new(r#""([^"]*)""#).unwrap();
    static ref RE_UNSAFE_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref RE_SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// Columns every plant list must have
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Common Name",
    "Scientific Name",
    "Water",
    "Light",
    "Dry between Waterings",
    "Spike",
    "Holes",
];

/// Columns that fall back to defaults when absent
pub const OPTIONAL_COLUMNS: [&str; 3] = ["Nickname", "Width", "Height"];

/// Water/light level used when the cell is blank
pub const DEFAULT_LEVEL: u8 = 2;

/// One row of the plant list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantRecord {
    #[serde(rename = "Nickname", default)]
    pub nickname: Option<String>,
    #[serde(rename = "Common Name")]
    pub common_name: String,
    #[serde(rename = "Scientific Name", default)]
    pub scientific_name: Option<String>,
    #[serde(rename = "Water", default)]
    pub water: Option<f64>,
    #[serde(rename = "Light", default)]
    pub light: Option<f64>,
    #[serde(rename = "Dry between Waterings", default)]
    pub dry_between_waterings: Option<String>,
    #[serde(rename = "Spike", default)]
    pub spike: Option<String>,
    #[serde(rename = "Holes", default)]
    pub holes: Option<String>,
    #[serde(rename = "Width", default)]
    pub width: Option<f64>,
    #[serde(rename = "Height", default)]
    pub height: Option<f64>,
}

impl PlantRecord {
    /// Label parameters and content for this row.
    ///
    /// `defaults` supplies everything the row does not override.
    pub fn to_label(
        &self,
        defaults: &RawLabelParams,
    ) -> Result<(RawLabelParams, ContentSet), LabelError> {
        let (common_name, nickname) = match self.nickname.as_deref().map(str::trim) {
            Some(nick) if !nick.is_empty() => {
                (self.common_name.trim().to_string(), nick.to_string())
            }
            _ => extract_nickname(&self.common_name),
        };

        let content = ContentSet {
            common_name,
            scientific_name: self
                .scientific_name
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
            nickname,
            water_level: level("water_level", self.water)?,
            light_level: level("light_level", self.light)?,
            show: ShowFlags {
                dry_soil: parse_bool(self.dry_between_waterings.as_deref()),
                spike: parse_bool(self.spike.as_deref()),
                holes: parse_bool(self.holes.as_deref()),
                ..ShowFlags::default()
            },
        };

        let params = RawLabelParams {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            ..defaults.clone()
        };

        Ok((params, content))
    }
}

fn level(field: &'static str, value: Option<f64>) -> Result<u8, LabelError> {
    match value {
        None => Ok(DEFAULT_LEVEL),
        Some(v) if v >= 0.0 && v <= f64::from(PROGRESS_SLOTS) => Ok(v.trunc() as u8),
        Some(v) => Err(LabelError::InvalidContent {
            field,
            reason: format!("must be between 0 and {} (got {})", PROGRESS_SLOTS, v),
        }),
    }
}

/// `TRUE`/`FALSE` in any case, or a number (non-zero = true).
/// Blank and unrecognised values are false.
pub fn parse_bool(value: Option<&str>) -> bool {
    let Some(value) = value.map(str::trim) else {
        return false;
    };
    match value.to_uppercase().as_str() {
        "TRUE" => true,
        "FALSE" => false,
        other => other.parse::<f64>().map(|n| n != 0.0).unwrap_or(false),
    }
}

/// Split a quoted nickname out of a common name.
///
/// `Maranta 'Lemon Lime'` → (`Maranta`, `Lemon Lime`). Single quotes win
/// over double quotes; without quotes the nickname is empty.
pub fn extract_nickname(common_name: &str) -> (String, String) {
    for re in [&*RE_SINGLE_QUOTED, &*RE_DOUBLE_QUOTED] {
        if let Some(caps) = re.captures(common_name) {
            let nickname = caps[1].trim().to_string();
            let base = re.replace_all(common_name, "").trim().to_string();
            return (base, nickname);
        }
    }
    (common_name.trim().to_string(), String::new())
}

/// File stem for a plant: word characters only, `_` between words
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = RE_UNSAFE_CHARS.replace_all(name, "");
    let joined = RE_SEPARATORS.replace_all(&cleaned, "_");
    joined.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_quoted_nickname() {
        let (base, nick) = extract_nickname("Maranta 'Lemon Lime'");
        assert_eq!(base, "Maranta");
        assert_eq!(nick, "Lemon Lime");
    }

    #[test]
    fn test_extract_double_quoted_nickname() {
        let (base, nick) = extract_nickname("Philodendron \"Brasil\" Vine");
        assert_eq!(base, "Philodendron  Vine");
        assert_eq!(nick, "Brasil");
    }

    #[test]
    fn test_no_nickname() {
        assert_eq!(
            extract_nickname("Snake Plant"),
            ("Snake Plant".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(Some("TRUE")));
        assert!(parse_bool(Some(" true ")));
        assert!(parse_bool(Some("1")));
        assert!(parse_bool(Some("2.5")));
        assert!(!parse_bool(Some("FALSE")));
        assert!(!parse_bool(Some("0")));
        assert!(!parse_bool(Some("yes")));
        assert!(!parse_bool(None));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Maranta 'Lemon Lime'"), "Maranta_Lemon_Lime");
        assert_eq!(sanitize_filename("Bird-of-Paradise (Orange)"), "Bird_of_Paradise_Orange");
        assert_eq!(sanitize_filename("  -Aloe-  "), "Aloe");
    }

    #[test]
    fn test_record_defaults_and_overrides() {
        let record = PlantRecord {
            common_name: "Prayer Plant 'Lemon Lime'".to_string(),
            scientific_name: Some("Maranta leuconeura".to_string()),
            water: Some(3.0),
            light: None,
            spike: Some("TRUE".to_string()),
            width: Some(100.0),
            ..Default::default()
        };
        let (params, content) = record.to_label(&RawLabelParams::default()).unwrap();
        assert_eq!(params.width, 100.0);
        assert_eq!(params.height, 30.0);
        assert_eq!(content.common_name, "Prayer Plant");
        assert_eq!(content.nickname, "Lemon Lime");
        assert_eq!(content.water_level, 3);
        assert_eq!(content.light_level, DEFAULT_LEVEL);
        assert!(content.show.spike);
        assert!(!content.show.holes);
        assert!(!content.show.dry_soil);
    }

    #[test]
    fn test_nickname_column_wins() {
        let record = PlantRecord {
            nickname: Some("Goldie".to_string()),
            common_name: "Golden Pothos 'Marble'".to_string(),
            ..Default::default()
        };
        let (_, content) = record.to_label(&RawLabelParams::default()).unwrap();
        assert_eq!(content.nickname, "Goldie");
        assert_eq!(content.common_name, "Golden Pothos 'Marble'");
    }

    #[test]
    fn test_level_out_of_range() {
        let record = PlantRecord {
            common_name: "Cactus".to_string(),
            water: Some(9.0),
            ..Default::default()
        };
        assert!(matches!(
            record.to_label(&RawLabelParams::default()),
            Err(LabelError::InvalidContent { field: "water_level", .. })
        ));
    }
}

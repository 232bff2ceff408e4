//! Tolerant field decoders for records written by looser store clients.
//!
//! Web forms that share the store submit numbers as text, stops as one
//! comma-separated string, and untouched optional inputs as `""`. Listing
//! must still decode those records, so these helpers accept every shape and
//! normalise it to the typed value.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Split comma-separated text into trimmed, non-empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListWire {
    Entries(Vec<String>),
    Text(String),
}

/// Decode a list sent as an array, as comma-separated text, or as `null`.
pub(crate) fn list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ListWire>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ListWire::Entries(entries)) => entries,
        Some(ListWire::Text(text)) => split_list(&text),
    })
}

/// Decode an optional value, treating `null` and blank text as absent.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => text.parse().map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberWire<T> {
    Number(T),
    Text(String),
}

/// Decode a number sent either as a JSON number or as numeric text.
pub(crate) fn number_or_text<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match NumberWire::<T>::deserialize(deserializer)? {
        NumberWire::Number(value) => Ok(value),
        NumberWire::Text(text) => text.trim().parse().map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeOfDay;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "list_or_text")]
        stops: Vec<String>,
        #[serde(default, deserialize_with = "blank_as_none")]
        at: Option<TimeOfDay>,
        #[serde(deserialize_with = "number_or_text")]
        seats: u32,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).expect("sample decodes")
    }

    #[rstest]
    #[case::array(r#"{"stops":["Hebbal","Yelahanka"],"seats":1}"#)]
    #[case::text(r#"{"stops":"Hebbal, Yelahanka","seats":1}"#)]
    #[case::text_with_gaps(r#"{"stops":" Hebbal,, Yelahanka ","seats":1}"#)]
    fn stops_decode_from_every_shape(#[case] json: &str) {
        assert_eq!(sample(json).stops, vec!["Hebbal", "Yelahanka"]);
    }

    #[rstest]
    #[case::null(r#"{"stops":null,"seats":1}"#)]
    #[case::blank(r#"{"stops":"","seats":1}"#)]
    #[case::missing(r#"{"seats":1}"#)]
    fn absent_stops_decode_empty(#[case] json: &str) {
        assert!(sample(json).stops.is_empty());
    }

    #[rstest]
    #[case::blank(r#"{"at":"","seats":1}"#, None)]
    #[case::spaces(r#"{"at":"  ","seats":1}"#, None)]
    #[case::null(r#"{"at":null,"seats":1}"#, None)]
    #[case::time(r#"{"at":"07:45","seats":1}"#, Some("07:45"))]
    fn optional_times_treat_blank_as_absent(#[case] json: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            sample(json).at.map(|time| time.to_string()).as_deref(),
            expected
        );
    }

    #[test]
    fn malformed_optional_times_still_fail() {
        assert!(serde_json::from_str::<Sample>(r#"{"at":"late","seats":1}"#).is_err());
    }

    #[rstest]
    #[case::number(r#"{"seats":40}"#)]
    #[case::text(r#"{"seats":"40"}"#)]
    #[case::padded_text(r#"{"seats":" 40 "}"#)]
    fn numbers_decode_from_text(#[case] json: &str) {
        assert_eq!(sample(json).seats, 40);
    }

    #[test]
    fn split_list_drops_blank_entries() {
        assert_eq!(split_list(" a , ,b,"), vec!["a", "b"]);
        assert!(split_list("  ").is_empty());
    }
}

use crate::error::{AtlasError, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Four-digit-year formats accepted by [`parse_day_first`], tried in order.
///
/// ISO dates come first so files written by the splitter read back unchanged;
/// every other format puts the day before the month. `true` marks formats
/// whose year leads the text.
const LONG_YEAR_FORMATS: [(&str, bool); 7] = [
    ("%Y-%m-%d", true),
    ("%d-%m-%Y", false),
    ("%d/%m/%Y", false),
    ("%d.%m.%Y", false),
    ("%d %b %Y", false),
    ("%d-%b-%Y", false),
    ("%Y/%m/%d", true),
];

/// Two-digit years: 00-68 land in the 2000s, 69-99 in the 1900s
const SHORT_YEAR_FORMATS: [&str; 5] = ["%d-%m-%y", "%d/%m/%y", "%d.%m.%y", "%d %b %y", "%d-%b-%y"];

/// Parse a date written day-first (e.g. `05-03-1995` is 5 March 1995)
///
/// # Examples
/// ```
/// use basmati_atlas::utils::parse_day_first;
/// use chrono::NaiveDate;
///
/// let date = parse_day_first("05-03-1995").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(1995, 3, 5).unwrap());
///
/// let short = parse_day_first("05-03-95").unwrap();
/// assert_eq!(short, date);
/// ```
pub fn parse_day_first(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();

    // Timestamps such as "1995-03-05 00:00:00" keep only their date part
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);

    for candidate in [trimmed, date_part] {
        if let Some(date) = parse_candidate(candidate) {
            return Ok(date);
        }
    }

    Err(AtlasError::DateParse(text.to_string()))
}

fn parse_candidate(candidate: &str) -> Option<NaiveDate> {
    // %Y happily reads "95" as year 95, so the year field must be four digits
    for (format, year_first) in LONG_YEAR_FORMATS {
        let year_digits = if year_first {
            candidate.chars().take_while(char::is_ascii_digit).count()
        } else {
            candidate.chars().rev().take_while(char::is_ascii_digit).count()
        };
        if year_digits != 4 {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
            return Some(date);
        }
    }

    SHORT_YEAR_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
}

/// Serde adapter for CSV `Date` columns
pub fn deserialize_day_first<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day_first(&raw).map_err(serde::de::Error::custom)
}

/// Add one calendar year, clamping 29 February to 28 February
pub fn add_one_year(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(date)
}

//! Filename encoding shared by the splitter and the file indexes.
//!
//! Files are named `State_District_Block_Variable[_sinceYYYY][_Percentile].ext`.
//! Two decodings exist:
//!
//! - **variable** names (`Met/`, `Market/`): everything after the block is the
//!   variable segment, which may contain underscores and may end in a
//!   `sinceYYYY` qualifier.
//! - **quality** names (`Quality/`): token 3 is the quality parameter and the
//!   optional token 4 is a percentile bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{AtlasError, Result};
use crate::models::region::{district_block_key, RegionKey};
use crate::utils::constants::{
    MIN_FILENAME_TOKENS, SINCE_PREFIX, TEMP_ABBREVIATION, TEMP_FULL, TOKEN_SEPARATOR,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub state: String,
    pub district: String,
    pub block: String,
    /// Variable or quality parameter as written in the filename, without the `since` token
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<String>,
    pub extension: String,
}

impl FileDescriptor {
    pub fn new(key: &RegionKey, variable: &str, extension: &str) -> Self {
        Self {
            state: key.state.clone(),
            district: key.district.clone(),
            block: key.block.clone(),
            variable: variable.to_string(),
            since: None,
            percentile: None,
            extension: extension.to_string(),
        }
    }

    pub fn with_since(mut self, year: i32) -> Self {
        self.since = Some(year);
        self
    }

    pub fn with_percentile(mut self, percentile: &str) -> Self {
        self.percentile = Some(percentile.to_string());
        self
    }

    /// Decode a `Met/` or `Market/` style filename
    pub fn decode_variable(file_name: &str) -> Result<Self> {
        let (stem, extension) = split_extension(file_name);
        let tokens = tokenize(file_name, stem)?;

        let segment = tokens[3..].join("_");
        let (variable, since) = split_since(&segment);

        Ok(Self {
            state: tokens[0].to_string(),
            district: tokens[1].to_string(),
            block: tokens[2].to_string(),
            variable,
            since,
            percentile: None,
            extension: extension.to_string(),
        })
    }

    /// Decode a `Quality/` style filename
    pub fn decode_quality(file_name: &str) -> Result<Self> {
        let (stem, extension) = split_extension(file_name);
        let tokens = tokenize(file_name, stem)?;

        if tokens.len() > 5 {
            debug!(
                "Ignoring trailing tokens {:?} in quality filename {}",
                &tokens[5..],
                file_name
            );
        }

        Ok(Self {
            state: tokens[0].to_string(),
            district: tokens[1].to_string(),
            block: tokens[2].to_string(),
            variable: tokens[3].to_string(),
            since: None,
            percentile: tokens.get(4).map(|p| p.to_string()),
            extension: extension.to_string(),
        })
    }

    /// Encode as a `Met/` or `Market/` filename; fails for components that
    /// [`decode_variable`](Self::decode_variable) could not read back unchanged
    pub fn encode(&self) -> Result<String> {
        self.check_common()?;
        check_component(&self.variable, true)?;

        if let Some(percentile) = &self.percentile {
            return Err(AtlasError::InvalidComponent {
                component: percentile.clone(),
                reason: "percentiles only appear in quality names".to_string(),
            });
        }

        match self.since {
            Some(year) if year < 0 => Err(AtlasError::InvalidComponent {
                component: year.to_string(),
                reason: "since-year must be non-negative".to_string(),
            }),
            Some(year) => Ok(self.join(Some(&format!("{}{}", SINCE_PREFIX, year)))),
            None if split_since(&self.variable).1.is_some() => {
                Err(AtlasError::InvalidComponent {
                    component: self.variable.clone(),
                    reason: "variable ends in a since-year token".to_string(),
                })
            }
            None => Ok(self.join(None)),
        }
    }

    /// Encode as a `Quality/` filename; the parameter must be a single token
    pub fn encode_quality(&self) -> Result<String> {
        self.check_common()?;
        check_component(&self.variable, false)?;

        if let Some(year) = self.since {
            return Err(AtlasError::InvalidComponent {
                component: year.to_string(),
                reason: "quality names cannot carry a since-year".to_string(),
            });
        }
        if let Some(percentile) = &self.percentile {
            check_component(percentile, false)?;
        }

        Ok(self.join(self.percentile.as_deref()))
    }

    fn check_common(&self) -> Result<()> {
        for component in [&self.state, &self.district, &self.block] {
            check_component(component, false)?;
        }

        if self.extension.is_empty() || self.extension.contains('.') {
            return Err(AtlasError::InvalidComponent {
                component: self.extension.clone(),
                reason: "extension must be a single non-empty suffix".to_string(),
            });
        }
        Ok(())
    }

    fn join(&self, suffix: Option<&str>) -> String {
        let mut name = format!(
            "{}_{}_{}_{}",
            self.state, self.district, self.block, self.variable
        );
        if let Some(suffix) = suffix {
            name.push(TOKEN_SEPARATOR);
            name.push_str(suffix);
        }
        name.push('.');
        name.push_str(&self.extension);
        name
    }

    /// Human-readable label, e.g. `MaxTemp` + 2000 -> `"MaxTemperature since 2000"`
    pub fn label(&self) -> String {
        let name = expand_temperature(&self.variable);
        match self.since {
            Some(year) => format!("{} since {}", name, year),
            None => name,
        }
    }

    pub fn region_key(&self) -> RegionKey {
        RegionKey::new(&self.state, &self.district, &self.block)
    }

    pub fn district_block(&self) -> String {
        district_block_key(&self.district, &self.block)
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.region_key(), self.label())?;
        if let Some(percentile) = &self.percentile {
            write!(f, " @ {}", percentile)?;
        }
        Ok(())
    }
}

fn split_extension(file_name: &str) -> (&str, &str) {
    file_name.rsplit_once('.').unwrap_or((file_name, ""))
}

fn tokenize<'a>(file_name: &str, stem: &'a str) -> Result<Vec<&'a str>> {
    let tokens: Vec<&str> = stem.split(TOKEN_SEPARATOR).collect();
    if tokens.len() < MIN_FILENAME_TOKENS {
        return Err(AtlasError::InvalidFilename(format!(
            "'{}' has {} underscore-separated tokens, expected at least {}",
            file_name,
            tokens.len(),
            MIN_FILENAME_TOKENS
        )));
    }
    Ok(tokens)
}

/// Split a trailing `sinceYYYY` sub-token off a variable segment.
///
/// Only a non-empty run of ASCII digits counts as a year; anything else stays
/// part of the variable name.
fn split_since(segment: &str) -> (String, Option<i32>) {
    if let Some((head, last)) = segment.rsplit_once(TOKEN_SEPARATOR) {
        if let Some(digits) = last.strip_prefix(SINCE_PREFIX) {
            let is_year = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
            match digits.parse::<i32>() {
                Ok(year) if is_year && !head.is_empty() => {
                    return (head.to_string(), Some(year));
                }
                _ => warn!(
                    "Keeping non-numeric since qualifier '{}' as part of variable '{}'",
                    last, segment
                ),
            }
        }
    }
    (segment.to_string(), None)
}

/// Replace the first `Temp` with `Temperature` unless it is already spelled out
fn expand_temperature(name: &str) -> String {
    match name.find(TEMP_ABBREVIATION) {
        Some(pos) if !name[pos..].starts_with(TEMP_FULL) => {
            name.replacen(TEMP_ABBREVIATION, TEMP_FULL, 1)
        }
        _ => name.to_string(),
    }
}

fn check_component(component: &str, allow_separator: bool) -> Result<()> {
    if component.is_empty() {
        return Err(AtlasError::InvalidComponent {
            component: component.to_string(),
            reason: "empty".to_string(),
        });
    }
    if !allow_separator && component.contains(TOKEN_SEPARATOR) {
        return Err(AtlasError::InvalidComponent {
            component: component.to_string(),
            reason: format!("contains '{}'", TOKEN_SEPARATOR),
        });
    }
    if component.contains(['/', '\\']) {
        return Err(AtlasError::InvalidComponent {
            component: component.to_string(),
            reason: "contains a path separator".to_string(),
        });
    }
    Ok(())
}

// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// The bundled collections a quote can come from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCollection {
    V1,
    V2,
}

impl SourceCollection {
    /// All collections, in the order they are merged.
    pub const ALL: [SourceCollection; 2] = [SourceCollection::V1, SourceCollection::V2];

    pub fn tag(self) -> &'static str {
        match self {
            SourceCollection::V1 => "v1",
            SourceCollection::V2 => "v2",
        }
    }
}

impl Display for SourceCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Identifies a quote across sessions. Derived from the collection tag and
/// the quote's position in that collection, so it is stable as long as the
/// data files are.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    pub fn new(source: SourceCollection, index: usize) -> Self {
        Self(format!("{}-{}", source.tag(), index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw entry from a data file: `[text, favourite, flagged]`, where the
/// flags are `0` or `1`.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(try_from = "(String, u8, u8)")]
pub struct QuoteRecord {
    pub text: String,
    pub favourite: bool,
    pub flagged: bool,
}

impl QuoteRecord {
    pub fn new(text: impl Into<String>, favourite: bool, flagged: bool) -> Self {
        Self {
            text: text.into(),
            favourite,
            flagged,
        }
    }
}

fn parse_flag(value: u8) -> Fallible<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => fail(format!("invalid flag value: {value}")),
    }
}

impl TryFrom<(String, u8, u8)> for QuoteRecord {
    type Error = ErrorReport;

    fn try_from((text, favourite, flagged): (String, u8, u8)) -> Result<Self, Self::Error> {
        Ok(Self {
            text,
            favourite: parse_flag(favourite)?,
            flagged: parse_flag(flagged)?,
        })
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    id: QuoteId,
    text: String,
    is_favourite: bool,
    is_flagged: bool,
    source: SourceCollection,
}

impl Quote {
    pub fn from_record(source: SourceCollection, index: usize, record: QuoteRecord) -> Self {
        Self {
            id: QuoteId::new(source, index),
            text: record.text,
            is_favourite: record.favourite,
            is_flagged: record.flagged,
            source,
        }
    }

    pub fn id(&self) -> &QuoteId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_favourite(&self) -> bool {
        self.is_favourite
    }

    pub fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub fn source(&self) -> SourceCollection {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        assert_eq!(QuoteId::new(SourceCollection::V1, 0).as_str(), "v1-0");
        assert_eq!(QuoteId::new(SourceCollection::V2, 17).to_string(), "v2-17");
    }

    #[test]
    fn test_record_from_json() -> Fallible<()> {
        let record: QuoteRecord = serde_json::from_str(r#"["Hello.", 1, 0]"#)?;
        assert_eq!(record, QuoteRecord::new("Hello.", true, false));
        Ok(())
    }

    #[test]
    fn test_record_rejects_bad_flag() {
        let result: Result<QuoteRecord, _> = serde_json::from_str(r#"["Hello.", 2, 0]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_record() {
        let quote = Quote::from_record(
            SourceCollection::V2,
            3,
            QuoteRecord::new("text", false, true),
        );
        assert_eq!(quote.id().as_str(), "v2-3");
        assert_eq!(quote.text(), "text");
        assert!(!quote.is_favourite());
        assert!(quote.is_flagged());
        assert_eq!(quote.source(), SourceCollection::V2);
    }

    #[test]
    fn test_id_serializes_as_string() -> Fallible<()> {
        let json = serde_json::to_string(&QuoteId::new(SourceCollection::V1, 4))?;
        assert_eq!(json, r#""v1-4""#);
        Ok(())
    }
}

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

use std::path::PathBuf;
use std::time::Instant;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::quote::Quote;
use crate::types::quote::QuoteRecord;
use crate::types::quote::SourceCollection;

/// Built-in data used when the real collections cannot be loaded: three `v1`
/// quotes (one favourite, one flagged) and two plain `v2` quotes.
pub const FALLBACK_V1: [(&str, bool, bool); 3] = [
    ("Sample quote 1", false, false),
    ("Sample quote 2", true, false),
    ("Sample NSFW quote", false, true),
];

pub const FALLBACK_V2: [(&str, bool, bool); 2] = [
    ("Sample v2 quote 1", false, false),
    ("Sample v2 quote 2", false, false),
];

/// Where the quote collections are read from.
#[derive(Clone, Debug)]
pub enum DatasetSource {
    /// The collections compiled into the binary.
    Bundled,
    /// A directory containing one `<tag>.json` file per collection.
    Directory(PathBuf),
}

/// The merged, normalized quote collections.
#[derive(Clone, Debug)]
pub struct Dataset {
    quotes: Vec<Quote>,
    fallback: bool,
}

impl Dataset {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            fallback: false,
        }
    }

    /// The built-in sample set.
    pub fn fallback() -> Self {
        let mut quotes = Vec::new();
        for (source, records) in [
            (SourceCollection::V1, &FALLBACK_V1[..]),
            (SourceCollection::V2, &FALLBACK_V2[..]),
        ] {
            let records = records
                .iter()
                .map(|(text, favourite, flagged)| QuoteRecord::new(*text, *favourite, *flagged));
            quotes.extend(normalize(source, records));
        }
        Self {
            quotes,
            fallback: true,
        }
    }

    #[cfg(test)]
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn into_quotes(self) -> Vec<Quote> {
        self.quotes
    }

    /// Whether this is the built-in sample set rather than the real data.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Load every collection from `source`, in `SourceCollection::ALL` order.
pub async fn load_dataset(source: &DatasetSource) -> Fallible<Vec<Quote>> {
    let mut quotes = Vec::new();
    for collection in SourceCollection::ALL {
        let records = match source {
            DatasetSource::Bundled => parse_collection(collection, bundled(collection))?,
            DatasetSource::Directory(directory) => {
                let path = directory.join(format!("{}.json", collection.tag()));
                if !path.exists() {
                    return fail(format!("collection file does not exist: {}", path.display()));
                }
                let content = tokio::fs::read_to_string(&path).await?;
                parse_collection(collection, &content)?
            }
        };
        quotes.extend(normalize(collection, records));
    }
    Ok(quotes)
}

/// Load the dataset, substituting the built-in sample set on failure.
pub async fn load_or_fallback(source: &DatasetSource) -> Dataset {
    log::debug!("Loading quotes from {source:?}...");
    let start = Instant::now();
    match load_dataset(source).await {
        Ok(quotes) => {
            let duration = start.elapsed().as_millis();
            log::debug!("Loaded {} quotes in {duration}ms.", quotes.len());
            Dataset::new(quotes)
        }
        Err(e) => {
            log::warn!("Failed to load quotes, using the built-in sample set: {e}");
            Dataset::fallback()
        }
    }
}

fn bundled(collection: SourceCollection) -> &'static str {
    match collection {
        SourceCollection::V1 => include_str!("data/v1.json"),
        SourceCollection::V2 => include_str!("data/v2.json"),
    }
}

fn parse_collection(collection: SourceCollection, content: &str) -> Fallible<Vec<QuoteRecord>> {
    serde_json::from_str(content).map_err(|e| {
        ErrorReport::new(format!("malformed `{collection}` collection: {e}"))
    })
}

/// Tag each record with its collection and position-derived id.
fn normalize(
    source: SourceCollection,
    records: impl IntoIterator<Item = QuoteRecord>,
) -> impl Iterator<Item = Quote> {
    records
        .into_iter()
        .enumerate()
        .map(move |(index, record)| Quote::from_record(source, index, record))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_bundled_ids_are_unique() -> Fallible<()> {
        let quotes = load_dataset(&DatasetSource::Bundled).await?;
        assert!(!quotes.is_empty());
        let ids: HashSet<_> = quotes.iter().map(|q| q.id().clone()).collect();
        assert_eq!(ids.len(), quotes.len());
        Ok(())
    }

    #[tokio::test]
    async fn test_bundled_ids_are_stable() -> Fallible<()> {
        let a = load_dataset(&DatasetSource::Bundled).await?;
        let b = load_dataset(&DatasetSource::Bundled).await?;
        assert_eq!(a, b);
        Ok(())
    }

    #[tokio::test]
    async fn test_directory() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("v1.json"), r#"[["a", 0, 0], ["b", 1, 1]]"#)?;
        write(dir.path().join("v2.json"), r#"[["c", 0, 1]]"#)?;
        let quotes = load_dataset(&DatasetSource::Directory(dir.path().to_path_buf())).await?;
        let ids: Vec<&str> = quotes.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["v1-0", "v1-1", "v2-0"]);
        assert!(quotes[1].is_favourite());
        assert!(quotes[1].is_flagged());
        assert_eq!(quotes[2].source(), SourceCollection::V2);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("v1.json"), "[]")?;
        let result = load_dataset(&DatasetSource::Directory(dir.path().to_path_buf())).await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join("v1.json"), r#"[["a", 0]]"#)?;
        write(dir.path().join("v2.json"), "[]")?;
        let dataset = load_or_fallback(&DatasetSource::Directory(dir.path().to_path_buf())).await;
        assert!(dataset.is_fallback());
        assert_eq!(dataset.quotes().len(), 5);
        Ok(())
    }

    #[test]
    fn test_fallback_contents() {
        let dataset = Dataset::fallback();
        let ids: Vec<&str> = dataset.quotes().iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["v1-0", "v1-1", "v1-2", "v2-0", "v2-1"]);
        assert!(dataset.quotes()[1].is_favourite());
        assert!(dataset.quotes()[2].is_flagged());
        assert_eq!(
            dataset.quotes().iter().filter(|q| q.is_flagged()).count(),
            1
        );
    }
}

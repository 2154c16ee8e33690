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

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::manager::Counts;
use crate::types::filter_config::FilterConfig;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub async fn print_deck_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let coll = Collection::open(directory).await?;
    let stats = Stats {
        directory: coll.directory.display().to_string(),
        counts: coll.manager.counts(),
        filters: coll.manager.filters(),
        sample_data: coll.manager.is_fallback(),
    };
    match format {
        StatsFormat::Text => print!("{}", render_text(&stats)),
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

fn render_text(stats: &Stats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Deck: {}\n", stats.directory));
    out.push_str(&format!("Total: {}\n", stats.counts.total));
    out.push_str(&format!("Seen: {}\n", stats.counts.seen));
    out.push_str(&format!("Remaining: {}\n", stats.counts.remaining));
    if stats.sample_data {
        out.push_str("Using the built-in sample quotes.\n");
    }
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    directory: String,
    #[serde(flatten)]
    counts: Counts,
    filters: FilterConfig,
    sample_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Stats {
        Stats {
            directory: "/tmp/deck".to_string(),
            counts: Counts {
                total: 20,
                seen: 3,
                remaining: 15,
            },
            filters: FilterConfig {
                exclude_v1: false,
                exclude_flagged: true,
            },
            sample_data: false,
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&stats()),
            "Deck: /tmp/deck\nTotal: 20\nSeen: 3\nRemaining: 15\n"
        );
    }

    #[test]
    fn test_json_shape() -> Fallible<()> {
        let value = serde_json::to_value(stats())?;
        assert_eq!(value["total"], 20);
        assert_eq!(value["seen"], 3);
        assert_eq!(value["remaining"], 15);
        assert_eq!(value["filters"]["removeNSFWQuotes"], true);
        assert_eq!(value["sampleData"], false);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_existent_directory() {
        let result = print_deck_stats(Some("./derpherp".to_string()), StatsFormat::Json).await;
        assert!(result.is_err());
    }
}

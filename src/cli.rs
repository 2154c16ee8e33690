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

use clap::Parser;

use crate::cmd::filters::set_filters;
use crate::cmd::next::next_quote;
use crate::cmd::restore::restore_quotes;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_deck_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Show a quote that has not been shown before.
    Next {
        /// Path to the deck directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Change which quotes are eligible.
    Filters {
        /// Path to the deck directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Leave out the v1 collection.
        #[arg(long)]
        exclude_v1: Option<bool>,
        /// Leave out flagged quotes.
        #[arg(long)]
        exclude_flagged: Option<bool>,
    },
    /// Forget which quotes have been shown.
    Restore {
        /// Path to the deck directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print deck statistics.
    Stats {
        /// Path to the deck directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Next { directory } => next_quote(directory).await,
        Command::Filters {
            directory,
            exclude_v1,
            exclude_flagged,
        } => set_filters(directory, exclude_v1, exclude_flagged).await,
        Command::Restore { directory } => restore_quotes(directory).await,
        Command::Stats { directory, format } => print_deck_stats(directory, format).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_filters() {
        let cli = Command::try_parse_from([
            "quotedeck",
            "filters",
            "deck",
            "--exclude-flagged",
            "true",
        ]);
        match cli {
            Ok(Command::Filters {
                directory,
                exclude_v1,
                exclude_flagged,
            }) => {
                assert_eq!(directory, Some("deck".to_string()));
                assert_eq!(exclude_v1, None);
                assert_eq!(exclude_flagged, Some(true));
            }
            _ => panic!("expected the filters command"),
        }
    }
}

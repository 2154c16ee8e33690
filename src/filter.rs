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

use std::collections::HashSet;

use crate::types::filter_config::FilterConfig;
use crate::types::quote::Quote;
use crate::types::quote::QuoteId;
use crate::types::quote::SourceCollection;

/// A single predicate a quote must pass to stay eligible.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Filter {
    ExcludeCollection(SourceCollection),
    ExcludeFlagged,
}

impl Filter {
    pub fn keeps(self, quote: &Quote) -> bool {
        match self {
            Filter::ExcludeCollection(source) => quote.source() != source,
            Filter::ExcludeFlagged => !quote.is_flagged(),
        }
    }
}

impl FilterConfig {
    /// The predicates enabled by this config.
    pub fn active_filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if self.exclude_v1 {
            filters.push(Filter::ExcludeCollection(SourceCollection::V1));
        }
        if self.exclude_flagged {
            filters.push(Filter::ExcludeFlagged);
        }
        filters
    }
}

/// The quotes that pass every active filter and have not been seen, in
/// dataset order.
pub fn apply(all: &[Quote], config: &FilterConfig, seen: &HashSet<QuoteId>) -> Vec<Quote> {
    let filters = config.active_filters();
    all.iter()
        .filter(|quote| filters.iter().all(|filter| filter.keeps(quote)))
        .filter(|quote| !seen.contains(quote.id()))
        .cloned()
        .collect()
}

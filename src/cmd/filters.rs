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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::filter_config::FilterConfig;

/// Update the persisted filters. Toggles left as `None` keep their value.
pub async fn set_filters(
    directory: Option<String>,
    exclude_v1: Option<bool>,
    exclude_flagged: Option<bool>,
) -> Fallible<()> {
    let mut coll = Collection::open(directory).await?;
    let current = coll.manager.filters();
    let config = FilterConfig {
        exclude_v1: exclude_v1.unwrap_or(current.exclude_v1),
        exclude_flagged: exclude_flagged.unwrap_or(current.exclude_flagged),
    };
    if config != current {
        coll.manager.update_filters(config);
    }
    println!("Exclude v1 quotes: {}", yes_no(config.exclude_v1));
    println!("Exclude flagged quotes: {}", yes_no(config.exclude_flagged));
    println!("{} quotes remaining.", coll.manager.counts().remaining);
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

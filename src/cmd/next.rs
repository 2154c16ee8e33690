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
use crate::types::quote::Quote;

pub const EXHAUSTED_MESSAGE: &str =
    "No more quotes available!\nAdjust your settings or restore default quotes to see more.";

pub async fn next_quote(directory: Option<String>) -> Fallible<()> {
    let mut coll = Collection::open(directory).await?;
    match coll.manager.draw_next() {
        Some(quote) => {
            log::debug!("Drew {}.", quote.id());
            println!("{}", format_quote(&quote));
        }
        None => println!("{EXHAUSTED_MESSAGE}"),
    }
    Ok(())
}

fn format_quote(quote: &Quote) -> String {
    if quote.is_favourite() {
        format!("★ {}", quote.text())
    } else {
        quote.text().to_string()
    }
}

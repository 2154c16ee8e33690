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

use serde::Deserialize;
use serde::Serialize;

/// The user's filter toggles. Serialized with the key names used by the
/// settings record in the key-value store.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Drop every quote from the `v1` collection.
    #[serde(rename = "excludeV1Quotes")]
    pub exclude_v1: bool,
    /// Drop every quote carrying the content flag.
    #[serde(rename = "removeNSFWQuotes")]
    pub exclude_flagged: bool,
}

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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;

/// Name of the optional config file in a deck directory.
pub const CONFIG_FILE: &str = "quotedeck.toml";

/// Per-directory settings, read from `quotedeck.toml`.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File name of the SQLite store, relative to the deck directory.
    pub database: String,
    /// Directory with `v1.json` and `v2.json`, relative to the deck
    /// directory. The bundled quotes are used when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: "quotedeck.db".to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

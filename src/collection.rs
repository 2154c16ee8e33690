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

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Config;
use crate::dataset::DatasetSource;
use crate::error::Fallible;
use crate::error::fail;
use crate::manager::QuoteManager;
use crate::store::MemoryStore;
use crate::store::SqliteStore;
use crate::store::Store;

/// A deck directory with its settings and a loaded quote manager.
pub struct Collection {
    pub directory: PathBuf,
    pub manager: QuoteManager,
}

impl Collection {
    pub async fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db_path = directory.join(&config.database);
        let store = match SqliteStore::new(&db_path) {
            Ok(store) => Store::new(store),
            Err(e) => {
                log::warn!("Cannot open {}, history will not be saved: {e}", db_path.display());
                Store::new(MemoryStore::new())
            }
        };

        let source = match &config.data_dir {
            Some(data_dir) => DatasetSource::Directory(directory.join(data_dir)),
            None => DatasetSource::Bundled,
        };

        let mut manager = QuoteManager::new(store);
        manager.load(source).await;
        if manager.is_loaded() {
            log::debug!("Quotes ready for {}.", directory.display());
        }

        Ok(Self { directory, manager })
    }
}

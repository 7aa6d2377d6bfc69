// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;

use serde::Deserialize;
use serde::Serialize;

use super::backend::FsBuilder;
use crate::*;

/// Config for file system service support.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct FsConfig {
    /// root dir for backend
    ///
    /// A relative root is resolved against the current working directory.
    pub root: Option<String>,
}

impl Debug for FsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsConfig")
            .field("root", &self.root)
            .finish()
    }
}

impl Configurator for FsConfig {
    type Builder = FsBuilder;

    /// Build config from `file:///path/to/root`.
    ///
    /// The dsn must not carry a host.
    fn from_dsn(dsn: &Dsn) -> Result<Self> {
        if let Some(host) = dsn.name() {
            return Err(
                Error::new(ErrorKind::InvalidUrl, "fs dsn must not carry a host")
                    .with_context("host", host)
                    .with_context("dsn", dsn),
            );
        }

        let mut map = dsn.options().clone();
        map.insert("root".to_string(), dsn.path().to_string());

        Self::from_iter(map)
    }

    fn into_builder(self) -> Self::Builder {
        FsBuilder { config: self }
    }
}

/// Guess content type of given path by its extension.
pub(super) fn guess_content_type(path: &str) -> Option<String> {
    mime_guess::from_path(path).first_raw().map(String::from)
}

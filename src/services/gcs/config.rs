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
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use super::backend::GcsBuilder;
use crate::*;

/// [Google Cloud Storage](https://cloud.google.com/storage) services support.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct GcsConfig {
    /// project id that owns the bucket
    pub project: Option<String>,
    /// bucket name
    pub bucket: String,
    /// root of key prefix, all operations happens under `root`
    pub root: Option<String>,
    /// endpoint URI of GCS service,
    /// default is `https://storage.googleapis.com`
    pub endpoint: Option<String>,
    /// Emulator endpoint, takes the place of `STORAGE_EMULATOR_HOST`.
    ///
    /// Requests against an emulator are never signed.
    pub emulator_host: Option<String>,
    /// A static OAuth2 bearer token, takes the place of
    /// `STORAGE_ACCESS_TOKEN`.
    pub token: Option<String>,
    /// Credentials string for GCS service OAuth2 authentication.
    pub credential: Option<String>,
    /// Local path to credentials file for GCS service OAuth2 authentication.
    pub credential_path: Option<String>,
    /// Service Account for gcs.
    pub service_account: Option<String>,
    /// Scope for gcs.
    pub scope: Option<String>,
    /// Disable loading credentials from `GOOGLE_APPLICATION_CREDENTIALS` and
    /// the well-known gcloud location.
    pub disable_config_load: bool,
    /// Fetch tokens from the GCE metadata server when no credential is found.
    pub enable_vm_metadata: bool,
    /// Location used while creating the bucket.
    pub location: Option<String>,
    /// Storage class used while creating the bucket.
    pub storage_class: Option<String>,
}

impl Debug for GcsConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsConfig")
            .field("project", &self.project)
            .field("bucket", &self.bucket)
            .field("root", &self.root)
            .field("endpoint", &self.endpoint)
            .field("emulator_host", &self.emulator_host)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Configurator for GcsConfig {
    type Builder = GcsBuilder;

    /// Build config from `gcs://<project>/<bucket>[/<key-prefix>]`.
    fn from_dsn(dsn: &Dsn) -> Result<Self> {
        let Some(project) = dsn.name() else {
            return Err(
                Error::new(ErrorKind::InvalidUrl, "gcs dsn must carry a project as host")
                    .with_context("dsn", dsn),
            );
        };

        let mut segments = dsn.segments();
        let Some(bucket) = segments.next() else {
            return Err(
                Error::new(ErrorKind::InvalidUrl, "gcs dsn must carry a bucket")
                    .with_context("dsn", dsn),
            );
        };
        let root = segments.collect::<Vec<_>>().join("/");

        let mut map = dsn.options().clone();
        map.insert("project".to_string(), project.to_string());
        map.insert("bucket".to_string(), bucket.to_string());
        if !root.is_empty() {
            map.insert("root".to_string(), root);
        }

        Self::from_iter(map)
    }

    fn into_builder(self) -> Self::Builder {
        GcsBuilder {
            config: self,
            ..Default::default()
        }
    }
}

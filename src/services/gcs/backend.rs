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
use std::sync::Arc;

use http::Response;
use http::StatusCode;
use log::debug;
use reqsign::GoogleCredentialLoader;
use reqsign::GoogleSigner;
use reqsign::GoogleTokenLoader;

use super::core::*;
use super::error::parse_error;
use super::lister::GcsLister;
use super::writer::GcsWriter;
use crate::raw::*;
use crate::services::GcsConfig;
use crate::*;

const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";
const DEFAULT_GCS_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

/// Env of the emulator endpoint, disables credential resolution entirely.
pub const STORAGE_EMULATOR_HOST: &str = "STORAGE_EMULATOR_HOST";
/// Env of a static OAuth2 bearer token.
pub const STORAGE_ACCESS_TOKEN: &str = "STORAGE_ACCESS_TOKEN";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// [Google Cloud Storage](https://cloud.google.com/storage) services support.
///
/// # Capabilities
///
/// This service can be used to:
///
/// - [x] init (create bucket)
/// - [x] read
/// - [x] write
/// - [x] delete
/// - [x] list
/// - [x] accessor (signed url, requires a service account credential)
///
/// # Credential
///
/// Credential is resolved while building, the first match wins:
///
/// 1. An emulator endpoint (`emulator_host` or `STORAGE_EMULATOR_HOST`):
///    requests are sent there without any authorization.
/// 2. A static token (`token` or `STORAGE_ACCESS_TOKEN`): sent as bearer
///    token.
/// 3. Ambient discovery: `credential`, `credential_path`,
///    `GOOGLE_APPLICATION_CREDENTIALS` or the gcloud well-known file. The
///    VM metadata server is only used if `enable_vm_metadata` is set.
///
/// # Example
///
/// ```no_run
/// use anyhow::Result;
/// use uniblob::services::Gcs;
/// use uniblob::Operator;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let builder = Gcs::default()
///         .project("my-project")
///         .bucket("my-bucket")
///         // All keys live under `data/`.
///         .root("data")
///         .credential_path("/path/to/service-account.json");
///
///     let op: Operator = Operator::new(builder)?;
///
///     Ok(())
/// }
/// ```
#[derive(Default)]
pub struct GcsBuilder {
    pub(super) config: GcsConfig,

    pub(super) env: Option<EnvLookup>,
    pub(super) http_client: Option<HttpClient>,
}

impl Debug for GcsBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("GcsBuilder");

        ds.field("config", &self.config);
        ds.finish_non_exhaustive()
    }
}

impl GcsBuilder {
    /// set the project that owns the bucket
    pub fn project(mut self, project: &str) -> Self {
        self.config.project = if project.is_empty() {
            None
        } else {
            Some(project.to_string())
        };
        self
    }

    /// set the container's name
    pub fn bucket(mut self, bucket: &str) -> Self {
        self.config.bucket = bucket.to_string();
        self
    }

    /// set the key prefix of backend, all keys live under it
    pub fn root(mut self, root: &str) -> Self {
        self.config.root = if root.is_empty() {
            None
        } else {
            Some(root.to_string())
        };
        self
    }

    /// set the endpoint GCS service uses
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        if !endpoint.is_empty() {
            self.config.endpoint = Some(endpoint.to_string())
        };
        self
    }

    /// set the emulator endpoint, `http://` is prepended if it carries
    /// no scheme.
    pub fn emulator_host(mut self, host: &str) -> Self {
        if !host.is_empty() {
            self.config.emulator_host = Some(host.to_string())
        };
        self
    }

    /// Provide the OAuth2 token to use.
    pub fn token(mut self, token: &str) -> Self {
        if !token.is_empty() {
            self.config.token = Some(token.to_string())
        };
        self
    }

    /// set the base64 hashed credentials string used for OAuth2 authentication.
    pub fn credential(mut self, credential: &str) -> Self {
        if !credential.is_empty() {
            self.config.credential = Some(credential.to_string())
        };
        self
    }

    /// set the local path to credentials file which is used for OAuth2 authentication.
    pub fn credential_path(mut self, path: &str) -> Self {
        if !path.is_empty() {
            self.config.credential_path = Some(path.to_string())
        };
        self
    }

    /// set the service account used to fetch token from vm metadata.
    pub fn service_account(mut self, service_account: &str) -> Self {
        if !service_account.is_empty() {
            self.config.service_account = Some(service_account.to_string())
        };
        self
    }

    /// set the GCS service scope
    ///
    /// If not set, we will use `https://www.googleapis.com/auth/devstorage.read_write`.
    pub fn scope(mut self, scope: &str) -> Self {
        if !scope.is_empty() {
            self.config.scope = Some(scope.to_string())
        };
        self
    }

    /// Disable loading credentials from env and the well-known location.
    pub fn disable_config_load(mut self) -> Self {
        self.config.disable_config_load = true;
        self
    }

    /// Fetch tokens from the GCE metadata server when no credential is found.
    pub fn enable_vm_metadata(mut self) -> Self {
        self.config.enable_vm_metadata = true;
        self
    }

    /// set the location of the bucket created by `init`.
    pub fn location(mut self, location: &str) -> Self {
        if !location.is_empty() {
            self.config.location = Some(location.to_string())
        };
        self
    }

    /// set the storage class of the bucket created by `init`.
    pub fn storage_class(mut self, storage_class: &str) -> Self {
        if !storage_class.is_empty() {
            self.config.storage_class = Some(storage_class.to_string())
        };
        self
    }

    /// Specify how environment variables are looked up.
    ///
    /// By default the process env is used.
    pub fn env(mut self, lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        self.env = Some(Arc::new(lookup));
        self
    }

    /// Specify the http client that used by this service.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    fn load_credential(&self, client: &HttpClient, lookup: &EnvLookup) -> Result<(GcsCredential, Option<String>)> {
        let non_empty = |v: &String| !v.is_empty();

        if let Some(host) = self
            .config
            .emulator_host
            .clone()
            .or_else(|| lookup(STORAGE_EMULATOR_HOST))
            .filter(non_empty)
        {
            let endpoint = if host.contains("://") {
                host
            } else {
                format!("http://{host}")
            };
            debug!("backend use emulator {endpoint}");
            return Ok((GcsCredential::Emulator, Some(endpoint)));
        }

        if let Some(token) = self
            .config
            .token
            .clone()
            .or_else(|| lookup(STORAGE_ACCESS_TOKEN))
            .filter(non_empty)
        {
            debug!("backend use static token");
            return Ok((GcsCredential::Token(token), None));
        }

        let mut cred_loader = GoogleCredentialLoader::default();
        if let Some(cred) = &self.config.credential {
            cred_loader = cred_loader.with_content(cred);
        }
        if let Some(path) = &self.config.credential_path {
            cred_loader = cred_loader.with_path(path);
        }
        if self.config.disable_config_load {
            cred_loader = cred_loader
                .with_disable_env()
                .with_disable_well_known_location();
        }

        let credential = cred_loader.load().map_err(new_request_credential_error)?;
        if credential.is_none() && !self.config.enable_vm_metadata {
            return Err(Error::new(
                ErrorKind::CredentialNotFound,
                "no credential found by ambient discovery",
            ));
        }

        let scope = self.config.scope.as_deref().unwrap_or(DEFAULT_GCS_SCOPE);
        let mut token_loader = GoogleTokenLoader::new(scope, client.client())
            .with_disable_vm_metadata(!self.config.enable_vm_metadata);
        if let Some(account) = &self.config.service_account {
            token_loader = token_loader.with_service_account(account);
        }
        if let Some(cred) = &credential {
            token_loader = token_loader.with_credentials(cred.clone());
        }

        debug!("backend use ambient credential");
        Ok((
            GcsCredential::Ambient {
                token_loader,
                credential,
            },
            None,
        ))
    }
}

impl Builder for GcsBuilder {
    const SCHEME: Scheme = Scheme::Gcs;
    type Config = GcsConfig;
    type Accessor = GcsBackend;

    fn build(self) -> Result<Self::Accessor> {
        debug!("backend build started: {:?}", &self);

        let root = normalize_root(&self.config.root.clone().unwrap_or_default());
        debug!("backend use root {root}");

        let bucket = match self.config.bucket.is_empty() {
            false => Ok(self.config.bucket.clone()),
            true => Err(
                Error::new(ErrorKind::InvalidUrl, "bucket is not specified")
                    .with_operation("Builder::build")
                    .with_context("service", Scheme::Gcs),
            ),
        }?;

        let project = match self.config.project.as_deref() {
            Some(project) if !project.is_empty() => Ok(project.to_string()),
            _ => Err(
                Error::new(ErrorKind::InvalidUrl, "project is not specified")
                    .with_operation("Builder::build")
                    .with_context("service", Scheme::Gcs),
            ),
        }?;

        let client = match self.http_client.clone() {
            Some(client) => client,
            None => HttpClient::new()?,
        };

        let lookup: EnvLookup = match self.env.clone() {
            Some(lookup) => lookup,
            None => Arc::new(|k: &str| std::env::var(k).ok()),
        };

        let (credential, emulator) = self.load_credential(&client, &lookup).map_err(|err| {
            err.with_operation("Builder::build")
                .with_context("service", Scheme::Gcs)
        })?;

        let endpoint = emulator
            .or_else(|| self.config.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_GCS_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        debug!("backend use endpoint: {endpoint}");

        let binding = Binding::new(
            Scheme::Gcs,
            format!("gcs://{project}/{bucket}/{}", root.trim_start_matches('/')),
        );

        let mut info = AccessorInfo::new(binding);
        info.set_root(&root)
            .set_name(&bucket)
            .set_capability(Capability {
                init: true,
                read: true,
                write: true,
                delete: true,
                list: true,
                accessor: credential.signable(),
            });

        debug!("backend build finished: {:?}", &info);
        Ok(GcsBackend {
            info,
            core: Arc::new(GcsCore {
                endpoint,
                project,
                bucket,
                root,
                location: self.config.location.clone(),
                storage_class: self.config.storage_class.clone(),
                client,
                signer: GoogleSigner::new("storage"),
                credential,
            }),
        })
    }
}

/// GCS storage backend
#[derive(Clone, Debug)]
pub struct GcsBackend {
    info: AccessorInfo,
    core: Arc<GcsCore>,
}

impl Access for GcsBackend {
    type Reader = HttpBody;
    type Writer = GcsWriter;
    type Lister = GcsLister;

    fn info(&self) -> &AccessorInfo {
        &self.info
    }

    async fn init(&self, _: OpInit) -> Result<()> {
        let resp = self.core.gcs_insert_bucket().await?;

        match resp.status() {
            // Bucket has been created by us or someone else.
            StatusCode::OK | StatusCode::CONFLICT => Ok(()),
            _ => Err(parse_error(resp)),
        }
    }

    async fn read(&self, path: &str, _: OpRead) -> Result<Self::Reader> {
        let resp = self.core.gcs_get_object(path).await?;

        match resp.status() {
            StatusCode::OK => Ok(resp.into_body()),
            _ => {
                let (parts, mut body) = resp.into_parts();
                let bs = oio::Read::read_all(&mut body).await?;
                Err(parse_error(Response::from_parts(parts, bs)))
            }
        }
    }

    async fn write(&self, path: &str, args: OpWrite) -> Result<Self::Writer> {
        Ok(GcsWriter::new(self.core.clone(), path, args))
    }

    async fn delete(&self, path: &str, _: OpDelete) -> Result<()> {
        let resp = self.core.gcs_delete_object(path).await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp))
        }
    }

    async fn list(&self, path: &str, _: &OpList) -> Result<Listing<Self::Lister>> {
        if path == "/" || path.ends_with('/') {
            return Ok(Listing::Container(GcsLister::new(self.core.clone(), path)));
        }

        // A path without `/` names an object if there is one, otherwise
        // it's the prefix `path/`.
        let resp = self.core.gcs_get_object_metadata(path).await?;
        match resp.status() {
            StatusCode::OK => {
                let meta: GetObjectJsonResponse = serde_json::from_slice(resp.body())
                    .map_err(new_json_deserialize_error)?;
                let content_type = if meta.content_type.is_empty() {
                    None
                } else {
                    Some(meta.content_type)
                };
                Ok(Listing::Resource(content_type))
            }
            StatusCode::NOT_FOUND => Ok(Listing::Container(GcsLister::new(
                self.core.clone(),
                &format!("{path}/"),
            ))),
            _ => Err(parse_error(resp)),
        }
    }

    async fn accessor(&self, path: &str, args: OpAccessor) -> Result<String> {
        let resp = self.core.gcs_get_object_metadata(path).await?;
        if !resp.status().is_success() {
            return Err(parse_error(resp));
        }

        // We will not send this request out, just for signing.
        let mut req = self.core.gcs_get_object_xml_request(path)?;
        self.core.sign_query(&mut req, args.expire())?;

        Ok(req.uri().to_string())
    }
}

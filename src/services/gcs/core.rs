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
use std::time::Duration;

use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::header::CONTENT_LENGTH;
use http::header::CONTENT_TYPE;
use http::header::HOST;
use http::HeaderValue;
use http::Request;
use http::Response;
use reqsign::GoogleCredential;
use reqsign::GoogleSigner;
use reqsign::GoogleTokenLoader;
use serde::Deserialize;
use serde::Serialize;

use crate::raw::*;
use crate::*;

/// Where the authorization of requests comes from.
pub(super) enum GcsCredential {
    /// Requests go to an emulator and are never signed.
    Emulator,
    /// A static bearer token.
    Token(String),
    /// Ambient credential discovery.
    ///
    /// `credential` is kept for query signing, it's `None` when tokens come
    /// from the VM metadata server.
    Ambient {
        token_loader: GoogleTokenLoader,
        credential: Option<GoogleCredential>,
    },
}

impl Debug for GcsCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GcsCredential::Emulator => f.write_str("Emulator"),
            GcsCredential::Token(_) => f.write_str("Token(<redacted>)"),
            GcsCredential::Ambient { credential, .. } => f
                .debug_struct("Ambient")
                .field("signable", &credential.is_some())
                .finish(),
        }
    }
}

impl GcsCredential {
    /// Whether urls can be signed by this credential.
    pub fn signable(&self) -> bool {
        matches!(
            self,
            GcsCredential::Ambient {
                credential: Some(_),
                ..
            }
        )
    }
}

pub(super) struct GcsCore {
    pub endpoint: String,
    pub project: String,
    pub bucket: String,
    pub root: String,
    pub location: Option<String>,
    pub storage_class: Option<String>,

    pub client: HttpClient,
    pub signer: GoogleSigner,
    pub credential: GcsCredential,
}

impl Debug for GcsCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsCore")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("bucket", &self.bucket)
            .field("root", &self.root)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl GcsCore {
    pub async fn sign<T>(&self, req: &mut Request<T>) -> Result<()> {
        match &self.credential {
            GcsCredential::Emulator => return Ok(()),
            GcsCredential::Token(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
                    Error::new(ErrorKind::Unexpected, "token is not a valid header value")
                        .set_source(err)
                })?;
                req.headers_mut().insert(AUTHORIZATION, value);
            }
            GcsCredential::Ambient { token_loader, .. } => {
                let token = token_loader
                    .load()
                    .await
                    .map_err(new_request_credential_error)?
                    .ok_or_else(|| {
                        Error::new(ErrorKind::CredentialNotFound, "no valid token found")
                    })?;
                self.signer
                    .sign(req, &token)
                    .map_err(new_request_sign_error)?;
            }
        }

        // Always remove host header, let the client set it based on HTTP
        // version.
        //
        // google server could send RST_STREAM of PROTOCOL_ERROR if our request
        // contains host header.
        req.headers_mut().remove(HOST);

        Ok(())
    }

    pub fn sign_query<T>(&self, req: &mut Request<T>, expire: Duration) -> Result<()> {
        let GcsCredential::Ambient {
            credential: Some(cred),
            ..
        } = &self.credential
        else {
            return Err(Error::new(
                ErrorKind::Unsupported,
                "signing urls requires a service account credential",
            ));
        };

        self.signer
            .sign_query(req, expire, cred)
            .map_err(new_request_sign_error)?;
        req.headers_mut().remove(HOST);

        Ok(())
    }

    #[inline]
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.client.send(req).await
    }
}

impl GcsCore {
    pub fn gcs_get_object_request(&self, path: &str) -> Result<Request<Bytes>> {
        let p = build_abs_path(&self.root, path);

        let url = format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.endpoint,
            self.bucket,
            percent_encode_path(&p)
        );

        Request::get(&url)
            .body(Bytes::new())
            .map_err(new_request_build_error)
    }

    pub async fn gcs_get_object(&self, path: &str) -> Result<Response<HttpBody>> {
        let mut req = self.gcs_get_object_request(path)?;

        self.sign(&mut req).await?;
        self.client.fetch(req).await
    }

    // Only used for signing, gcs only supports query sign over XML API.
    pub fn gcs_get_object_xml_request(&self, path: &str) -> Result<Request<Bytes>> {
        let p = build_abs_path(&self.root, path);

        let url = format!(
            "{}/{}/{}",
            self.endpoint,
            self.bucket,
            percent_encode_path(&p)
        );

        Request::get(&url)
            .body(Bytes::new())
            .map_err(new_request_build_error)
    }

    pub async fn gcs_get_object_metadata(&self, path: &str) -> Result<Response<Bytes>> {
        let p = build_abs_path(&self.root, path);

        let url = format!(
            "{}/storage/v1/b/{}/o/{}",
            self.endpoint,
            self.bucket,
            percent_encode_path(&p)
        );

        let mut req = Request::get(&url)
            .body(Bytes::new())
            .map_err(new_request_build_error)?;

        self.sign(&mut req).await?;
        self.send(req).await
    }

    pub async fn gcs_insert_object(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<Response<Bytes>> {
        let p = build_abs_path(&self.root, path);

        let url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint,
            self.bucket,
            percent_encode_path(&p)
        );

        let mut req = Request::post(&url).header(CONTENT_LENGTH, body.len());
        if let Some(content_type) = content_type {
            req = req.header(CONTENT_TYPE, content_type);
        }
        let mut req = req.body(body).map_err(new_request_build_error)?;

        self.sign(&mut req).await?;
        self.send(req).await
    }

    pub async fn gcs_delete_object(&self, path: &str) -> Result<Response<Bytes>> {
        let p = build_abs_path(&self.root, path);

        let url = format!(
            "{}/storage/v1/b/{}/o/{}",
            self.endpoint,
            self.bucket,
            percent_encode_path(&p)
        );

        let mut req = Request::delete(&url)
            .body(Bytes::new())
            .map_err(new_request_build_error)?;

        self.sign(&mut req).await?;
        self.send(req).await
    }

    /// List objects whose names start with `prefix`.
    ///
    /// `prefix` is already an absolute key prefix.
    pub async fn gcs_list_objects(
        &self,
        prefix: &str,
        page_token: &str,
        limit: usize,
    ) -> Result<Response<Bytes>> {
        let mut url = format!(
            "{}/storage/v1/b/{}/o?prefix={}&maxResults={limit}",
            self.endpoint,
            self.bucket,
            percent_encode_path(prefix)
        );

        if !page_token.is_empty() {
            // GCS uses pageToken in request and nextPageToken in response.
            url.push_str("&pageToken=");
            url.push_str(&percent_encode_path(page_token));
        }

        let mut req = Request::get(&url)
            .body(Bytes::new())
            .map_err(new_request_build_error)?;

        self.sign(&mut req).await?;
        self.send(req).await
    }

    pub async fn gcs_insert_bucket(&self) -> Result<Response<Bytes>> {
        let url = format!(
            "{}/storage/v1/b?project={}",
            self.endpoint,
            percent_encode_path(&self.project)
        );

        let body = InsertBucketRequest {
            name: &self.bucket,
            location: self.location.as_deref(),
            storage_class: self.storage_class.as_deref(),
        };
        let body = serde_json::to_vec(&body).map_err(new_json_serialize_error)?;

        let mut req = Request::post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(Bytes::from(body))
            .map_err(new_request_build_error)?;

        self.sign(&mut req).await?;
        self.send(req).await
    }
}

/// Request of GCS buckets insert API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertBucketRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<&'a str>,
}

/// Response JSON from GCS objects get API without `alt=media`.
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct GetObjectJsonResponse {
    pub content_type: String,
}

/// Response JSON from GCS list objects API.
///
/// refer to https://cloud.google.com/storage/docs/json_api/v1/objects/list for details
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ListResponse {
    /// The continuation token.
    ///
    /// If this is the last page of results, then no continuation token is returned.
    pub next_page_token: Option<String>,
    /// The list of objects, ordered lexicographically by name.
    pub items: Vec<ListResponseItem>,
}

#[derive(Default, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct ListResponseItem {
    pub name: String,
    pub content_type: String,
}

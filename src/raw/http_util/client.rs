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
use std::str::FromStr;

use bytes::Bytes;
use futures::TryStreamExt;
use http::Request;
use http::Response;

use super::HttpBody;
use crate::raw::*;
use crate::*;

/// HttpClient that used across uniblob's http based services.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

/// We don't want users to know details about our clients.
impl Debug for HttpClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish()
    }
}

impl HttpClient {
    /// Create a new http client.
    pub fn new() -> Result<Self> {
        let client = reqwest::ClientBuilder::new().build().map_err(|err| {
            Error::new(ErrorKind::Unexpected, "http client build failed").set_source(err)
        })?;

        Ok(Self { client })
    }

    /// Construct `Self` with given [`reqwest::Client`]
    pub fn with(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get the inner reqwest client.
    ///
    /// Credential loaders issue their own requests through it.
    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }

    /// Send a request and consume response.
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let (parts, mut body) = self.fetch(req).await?.into_parts();
        let bs = oio::Read::read_all(&mut body).await?;
        Ok(Response::from_parts(parts, bs))
    }

    /// Fetch a request and return a streamable [`HttpBody`].
    ///
    /// Services can use [`HttpBody`] as [`Access::Reader`].
    pub async fn fetch(&self, req: Request<Bytes>) -> Result<Response<HttpBody>> {
        // Uri stores all string alike data in `Bytes` which means
        // the clone here is cheap.
        let uri = req.uri().clone();

        let (parts, body) = req.into_parts();

        let url = reqwest::Url::from_str(&uri.to_string()).map_err(|err| {
            Error::new(ErrorKind::InvalidUrl, "request url is invalid")
                .with_context("url", uri.to_string())
                .set_source(err)
        })?;

        let mut req_builder = self
            .client
            .request(parts.method, url)
            .version(parts.version)
            .headers(parts.headers);

        // Don't set body if body is empty.
        if !body.is_empty() {
            req_builder = req_builder.body(body)
        }

        let resp = req_builder
            .send()
            .await
            .map_err(|err| new_request_send_error(err).with_context("url", uri.to_string()))?;

        let mut hr = Response::builder()
            .status(resp.status())
            .version(resp.version());
        if let Some(headers) = hr.headers_mut() {
            headers.extend(resp.headers().clone());
        }

        let bs = HttpBody::new(resp.bytes_stream().map_err(move |err| {
            Error::new(ErrorKind::Unexpected, "read data from http response")
                .with_operation("http_util::Client::send")
                .with_context("url", uri.to_string())
                .set_source(err)
        }));

        hr.body(bs).map_err(new_request_build_error)
    }
}

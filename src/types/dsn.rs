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

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::*;

/// Dsn is one configuration url that carries every construction parameter
/// of a backend.
///
/// # Forms
///
/// - fs: `file:///path/to/root`
/// - gcs: `gcs://<project>/<bucket>[/<key-prefix>]`
///
/// Both forms accept extra options as query pairs, for example
/// `gcs://proj/bucket?endpoint=http://127.0.0.1:4443`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dsn {
    raw: String,
    scheme: Scheme,
    name: Option<String>,
    path: String,
    options: HashMap<String, String>,
}

impl Dsn {
    /// Parse given string into a [`Dsn`].
    ///
    /// - Malformed url or url without scheme returns [`ErrorKind::InvalidUrl`].
    /// - Scheme other than `file`/`fs`/`gcs` returns [`ErrorKind::Unsupported`].
    pub fn parse(s: &str) -> Result<Dsn> {
        let url = Url::parse(s).map_err(|err| {
            Error::new(ErrorKind::InvalidUrl, "dsn is not a valid url")
                .with_context("dsn", s)
                .set_source(err)
        })?;

        let scheme = Scheme::from_str(url.scheme()).map_err(|err| err.with_context("dsn", s))?;

        let name = url
            .host_str()
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());

        let path = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|err| {
                Error::new(ErrorKind::InvalidUrl, "dsn path is not valid utf-8")
                    .with_context("dsn", s)
                    .set_source(err)
            })?
            .to_string();

        let options = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Dsn {
            raw: s.to_string(),
            scheme,
            name,
            path,
            options,
        })
    }

    /// The raw string of this dsn.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The scheme of this dsn.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The host part of this dsn, `None` if it's absent or empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The percent-decoded path of this dsn.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The non-empty segments of path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|v| !v.is_empty())
    }

    /// The query pairs of this dsn.
    pub fn options(&self) -> &HashMap<String, String> {
        &self.options
    }
}

impl FromStr for Dsn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dsn::parse(s)
    }
}

impl Display for Dsn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

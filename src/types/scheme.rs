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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;

/// Services that uniblob supports
///
/// # Notes
///
/// - Scheme is a closed set: adding a backend means adding a variant here
///   and a branch in [`Dsn`][crate::Dsn] parsing.
/// - Users MUST NOT relay on its order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// [fs][crate::services::Fs]: POSIX alike file system.
    Fs,
    /// [gcs][crate::services::Gcs]: Google Cloud Storage backend.
    Gcs,
}

impl Scheme {
    /// Convert self into static str.
    pub fn into_static(self) -> &'static str {
        self.into()
    }

    /// The url scheme used by addresses of this service.
    ///
    /// - `fs` => `file`
    /// - `gcs` => `gcs`
    pub fn url_scheme(self) -> &'static str {
        match self {
            Scheme::Fs => "file",
            Scheme::Gcs => "gcs",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        match s.as_str() {
            // `file` is the url scheme, `fs` is kept for easy to use.
            "file" | "fs" => Ok(Scheme::Fs),
            "gcs" => Ok(Scheme::Gcs),
            _ => Err(
                Error::new(ErrorKind::Unsupported, "scheme is not supported")
                    .with_context("scheme", s),
            ),
        }
    }
}

impl From<Scheme> for &'static str {
    fn from(v: Scheme) -> Self {
        match v {
            Scheme::Fs => "fs",
            Scheme::Gcs => "gcs",
        }
    }
}

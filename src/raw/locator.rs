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

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::raw::*;
use crate::*;

/// Binding is the containment boundary fixed for one backend instance.
///
/// It carries the fully-qualified prefix that every scheme-qualified address
/// of this instance must begin with:
///
/// - fs: `file:///path/to/root/`
/// - gcs: `gcs://<project>/<bucket>/` plus the key prefix if there is one.
///
/// The prefix is computed once while building the backend and never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    scheme: Scheme,
    prefix: String,
    /// The prefix after `<scheme>://`, decoded if the binding is percent
    /// encoded. Qualified addresses are matched against it.
    root: String,
    percent_encoded: bool,
}

impl Binding {
    /// Create a new binding with its fully-qualified prefix.
    ///
    /// The prefix must start with `<scheme>://` and end with `/`.
    pub fn new(scheme: Scheme, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        debug_assert!(
            prefix.starts_with(&format!("{}://", scheme.url_scheme())),
            "prefix {prefix} must start with scheme {scheme}"
        );
        debug_assert!(prefix.ends_with('/'), "prefix {prefix} must end with /");

        let root = prefix
            .find("://")
            .map(|idx| prefix[idx + 3..].to_string())
            .unwrap_or_default();
        Self {
            scheme,
            prefix,
            root,
            percent_encoded: false,
        }
    }

    /// Qualified addresses of this binding carry a percent-encoded path.
    ///
    /// Used by `file://` urls where the remainder is a url path instead of a
    /// raw object key.
    pub fn with_percent_encoded(mut self) -> Self {
        self.root = percent_decode_str(&self.root)
            .decode_utf8_lossy()
            .into_owned();
        self.percent_encoded = true;
        self
    }

    /// Scheme of this binding.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The fully-qualified prefix of this binding.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a caller address into a [`Locator`].
    ///
    /// # Rules
    ///
    /// - `<scheme>://...` of this binding must start with the prefix (or equal
    ///   it without the trailing `/`), the rest is the relative path. For
    ///   percent encoded bindings the whole address is decoded before the
    ///   prefix is matched, so `file:///a+b/x` and `file:///a%2Bb/x` are the
    ///   same address.
    /// - Any other `<scheme>://...` is a [`ErrorKind::ContainmentViolation`].
    /// - Everything else is already relative to the binding.
    ///
    /// The relative path is then normalized by [`normalize_path`], so both
    /// forms of one resource produce the same locator.
    ///
    /// Errors carry the `expected` prefix; the caller adds the address.
    pub fn resolve(&self, address: &str) -> Result<Locator> {
        let (rel, qualified) = if let Some(rest) = address.strip_prefix(self.scheme_prefix()) {
            let rest = if self.percent_encoded {
                percent_decode_str(rest).decode_utf8().map_err(|err| {
                    Error::new(
                        ErrorKind::InvalidUrl,
                        "address is not valid percent-encoded utf-8",
                    )
                    .set_source(err)
                })?
            } else {
                Cow::Borrowed(rest)
            };

            let rel = if let Some(rel) = rest.strip_prefix(self.root.as_str()) {
                rel.to_string()
            } else if rest == self.root.trim_end_matches('/') {
                String::new()
            } else {
                return Err(self.containment_error("address is outside of the bound prefix"));
            };
            (Cow::Owned(rel), true)
        } else if has_url_scheme(address) {
            return Err(self.containment_error("address carries a foreign scheme"));
        } else {
            (Cow::Borrowed(address), false)
        };

        let path =
            normalize_path(&rel).map_err(|err| err.with_context("expected", &self.prefix))?;

        Ok(Locator { path, qualified })
    }

    /// Build the fully-qualified address of a normalized relative path.
    pub fn qualify(&self, path: &str) -> String {
        if path == "/" {
            return self.prefix.clone();
        }

        if self.percent_encoded {
            format!("{}{}", self.prefix, percent_encode_path(path))
        } else {
            format!("{}{}", self.prefix, path)
        }
    }

    /// Build the address of a normalized relative path in the same form the
    /// locator was given by caller.
    pub fn present(&self, locator: &Locator, path: &str) -> String {
        if locator.is_qualified() {
            self.qualify(path)
        } else {
            path.to_string()
        }
    }

    fn scheme_prefix(&self) -> &str {
        let idx = self.prefix.find("://").map(|v| v + 3).unwrap_or_default();
        &self.prefix[..idx]
    }

    fn containment_error(&self, message: &'static str) -> Error {
        Error::new(ErrorKind::ContainmentViolation, message).with_context("expected", &self.prefix)
    }
}

/// Locator is the backend-native location of one resource.
///
/// The path is always normalized and relative to the backend's root:
///
/// - `/` is the root itself.
/// - Path ends with `/` is a container, like `abc/def/`.
/// - Otherwise it's a resource, like `abc/def`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    path: String,
    qualified: bool,
}

impl Locator {
    /// The normalized relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether caller used the fully-qualified form.
    pub fn is_qualified(&self) -> bool {
        self.qualified
    }

    /// Whether this locator points to the backend's root.
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

/// Check if address starts with a url scheme like `s3://`.
///
/// A scheme is an ascii letter followed by letters, digits, `+`, `-` or `.`.
fn has_url_scheme(address: &str) -> bool {
    let Some(idx) = address.find("://") else {
        return false;
    };

    let mut chars = address[..idx].chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

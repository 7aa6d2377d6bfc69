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

/// Resource is the descriptor yielded by [`Lister`][crate::Lister].
///
/// The address keeps the form the caller used for `list`: a relative
/// address yields relative addresses, a fully-qualified address yields
/// fully-qualified ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    address: String,
    content_type: Option<String>,
}

impl Resource {
    /// Create a new resource.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            content_type: None,
        }
    }

    /// Set the content type hint of this resource.
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Address of this resource.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Content type hint of this resource, if backend knows it.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Consume self to get the address.
    pub fn into_address(self) -> String {
        self.address
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

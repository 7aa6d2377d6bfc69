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

/// Entry is returned by `oio::List` during list operations.
///
/// The path is relative to the backend's root and never ends with `/`:
/// only leaf resources are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: String,
    content_type: Option<String>,
}

impl Entry {
    /// Create a new entry by its relative path.
    pub fn new(path: impl Into<String>) -> Entry {
        Entry {
            path: path.into(),
            content_type: None,
        }
    }

    /// Set the content type of this entry.
    pub fn with_content_type(mut self, content_type: Option<String>) -> Entry {
        self.content_type = content_type;
        self
    }

    /// Get the path of entry.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the content type of entry.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Consume self to get path and content type.
    pub fn into_parts(self) -> (String, Option<String>) {
        (self.path, self.content_type)
    }
}

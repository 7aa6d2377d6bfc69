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

//! Ops provides the operation args struct like [`OpRead`] for user.
//!
//! By using ops, users can attach a cancellation signal or extra hints
//! to one call.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// The default expiry of urls returned by `accessor`.
pub const DEFAULT_ACCESSOR_EXPIRE: Duration = Duration::from_secs(15 * 60);

/// The default capacity of the channel between list producer and consumer.
pub const DEFAULT_LIST_BUFFER: usize = 64;

macro_rules! impl_cancel {
    ($name:ident) => {
        impl $name {
            /// Attach a cancellation token to this operation.
            ///
            /// Once the token is cancelled, the in-flight call fails with
            /// [`ErrorKind::Cancelled`][crate::ErrorKind::Cancelled].
            pub fn with_cancel(mut self, token: CancellationToken) -> Self {
                self.cancel = Some(token);
                self
            }

            /// Get the cancellation token of this operation.
            pub fn cancel(&self) -> Option<&CancellationToken> {
                self.cancel.as_ref()
            }
        }
    };
}

/// Args for `init` operation.
#[derive(Debug, Clone, Default)]
pub struct OpInit {
    cancel: Option<CancellationToken>,
}

impl OpInit {
    /// Create a new `OpInit`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl_cancel!(OpInit);

/// Args for `read` operation.
#[derive(Debug, Clone, Default)]
pub struct OpRead {
    cancel: Option<CancellationToken>,
}

impl OpRead {
    /// Create a new `OpRead`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl_cancel!(OpRead);

/// Args for `write` operation.
#[derive(Debug, Clone, Default)]
pub struct OpWrite {
    content_type: Option<String>,
    cancel: Option<CancellationToken>,
}

impl OpWrite {
    /// Create a new `OpWrite`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content type of option
    ///
    /// Services that can't store a content type ignore it.
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Get the content type from option
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl_cancel!(OpWrite);

/// Args for `delete` operation.
#[derive(Debug, Clone, Default)]
pub struct OpDelete {
    cancel: Option<CancellationToken>,
}

impl OpDelete {
    /// Create a new `OpDelete`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl_cancel!(OpDelete);

/// Args for `list` operation.
#[derive(Debug, Clone)]
pub struct OpList {
    /// The capacity of the bounded channel between the traversal task
    /// and the consumer.
    ///
    /// The producer waits once the channel is full, so memory use is
    /// bounded by this value instead of the breadth of the tree.
    buffer: usize,
    cancel: Option<CancellationToken>,
}

impl Default for OpList {
    fn default() -> Self {
        OpList {
            buffer: DEFAULT_LIST_BUFFER,
            cancel: None,
        }
    }
}

impl OpList {
    /// Create a new `OpList`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the channel capacity of this list operation.
    ///
    /// A zero capacity is raised to 1.
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Get the channel capacity of this list operation.
    pub fn buffer(&self) -> usize {
        self.buffer
    }
}

impl_cancel!(OpList);

/// Args for `accessor` operation.
#[derive(Debug, Clone)]
pub struct OpAccessor {
    expire: Duration,
    cancel: Option<CancellationToken>,
}

impl Default for OpAccessor {
    fn default() -> Self {
        OpAccessor {
            expire: DEFAULT_ACCESSOR_EXPIRE,
            cancel: None,
        }
    }
}

impl OpAccessor {
    /// Create a new `OpAccessor`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change how long the returned url stays valid.
    ///
    /// Urls that never expire (like `file://`) ignore it.
    pub fn with_expire(mut self, expire: Duration) -> Self {
        self.expire = expire;
        self
    }

    /// Get the expire of this accessor operation.
    pub fn expire(&self) -> Duration {
        self.expire
    }
}

impl_cancel!(OpAccessor);

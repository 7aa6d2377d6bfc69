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
use std::future::ready;
use std::future::Future;

use crate::raw::*;
use crate::*;

/// Underlying trait of all backends for implementors.
///
/// The actual data access of storage service happens in Access layer.
/// Every storage supported by uniblob must implement [`Access`] but not all
/// methods of [`Access`] will be implemented according to how the storage service is.
///
/// [`Access`] gives default implementation for all methods which will raise [`ErrorKind::Unsupported`] error.
/// And what action this [`Access`] supports will be pointed out in [`AccessorInfo`].
///
/// # Operations
///
/// - Path in args has been resolved by [`Binding::resolve`] already, services
///   should handle them based on services' requirement.
///   - Path that ends with `/` means it's a container, otherwise, it's a resource.
///   - Root is `/`
///   - Path will never be empty and never climbs above root.
/// - The default implementation should return [`ErrorKind::Unsupported`].
pub trait Access: Send + Sync + Debug + Unpin + 'static {
    /// Reader is the associated reader returned in `read` operation.
    type Reader: oio::Read;
    /// Writer is the associated writer returned in `write` operation.
    type Writer: oio::Write;
    /// Lister is the associated lister returned in `list` operation.
    type Lister: oio::List;

    /// Invoke the `info` operation to get metadata of accessor.
    ///
    /// # Notes
    ///
    /// This function is required to be implemented.
    fn info(&self) -> &AccessorInfo;

    /// Invoke the `init` operation to make sure the root container exists.
    ///
    /// Require [`Capability::init`]
    ///
    /// # Behavior
    ///
    /// - Init on an existing container SHOULD succeed.
    fn init(&self, args: OpInit) -> impl Future<Output = Result<()>> + Send {
        let _ = args;

        ready(Err(Error::new(
            ErrorKind::Unsupported,
            "operation is not supported",
        )))
    }

    /// Invoke the `read` operation on the specified path, returns a
    /// reader positioned at the start of the resource.
    ///
    /// Require [`Capability::read`]
    ///
    /// # Behavior
    ///
    /// - Absent resource MUST return [`ErrorKind::NotFound`] here instead of
    ///   at the first read.
    fn read(
        &self,
        path: &str,
        args: OpRead,
    ) -> impl Future<Output = Result<Self::Reader>> + Send {
        let (_, _) = (path, args);

        ready(Err(Error::new(
            ErrorKind::Unsupported,
            "operation is not supported",
        )))
    }

    /// Invoke the `write` operation on the specified path, returns a
    /// writer that replaces the resource on close.
    ///
    /// Require [`Capability::write`]
    ///
    /// # Behavior
    ///
    /// - Missing intermediate containers SHOULD be created transparently.
    fn write(
        &self,
        path: &str,
        args: OpWrite,
    ) -> impl Future<Output = Result<Self::Writer>> + Send {
        let (_, _) = (path, args);

        ready(Err(Error::new(
            ErrorKind::Unsupported,
            "operation is not supported",
        )))
    }

    /// Invoke the `delete` operation on the specified path.
    ///
    /// Require [`Capability::delete`]
    ///
    /// # Behavior
    ///
    /// - Delete on an absent resource MUST return [`ErrorKind::NotFound`].
    fn delete(&self, path: &str, args: OpDelete) -> impl Future<Output = Result<()>> + Send {
        let (_, _) = (path, args);

        ready(Err(Error::new(
            ErrorKind::Unsupported,
            "operation is not supported",
        )))
    }

    /// Invoke the `list` operation on the specified path.
    ///
    /// Require [`Capability::list`]
    ///
    /// # Behavior
    ///
    /// - A path that names a single resource returns [`Listing::Resource`]
    ///   without any traversal.
    /// - Otherwise a lister over every leaf resource under the container is
    ///   returned.
    /// - Absent containers (other than root) MUST return [`ErrorKind::NotFound`],
    ///   either here or from the lister.
    fn list(
        &self,
        path: &str,
        args: &OpList,
    ) -> impl Future<Output = Result<Listing<Self::Lister>>> + Send {
        let (_, _) = (path, args);

        ready(Err(Error::new(
            ErrorKind::Unsupported,
            "operation is not supported",
        )))
    }

    /// Invoke the `accessor` operation on the specified path, returns an url
    /// that can be dereferenced outside of uniblob.
    ///
    /// Require [`Capability::accessor`]
    ///
    /// # Behavior
    ///
    /// - Existence of the resource MUST be checked at call time.
    fn accessor(
        &self,
        path: &str,
        args: OpAccessor,
    ) -> impl Future<Output = Result<String>> + Send {
        let (_, _) = (path, args);

        ready(Err(Error::new(
            ErrorKind::Unsupported,
            "operation is not supported",
        )))
    }
}

/// Listing is the result of `list` operation.
pub enum Listing<L> {
    /// The path names a single resource, carrying its content type hint.
    Resource(Option<String>),
    /// The path names a container that will be walked by given lister.
    Container(L),
}

/// Metadata for accessor, users can use this metadata to get information of underlying backend.
#[derive(Clone, Debug)]
pub struct AccessorInfo {
    scheme: Scheme,
    root: String,
    name: String,
    binding: Binding,

    capability: Capability,
}

impl AccessorInfo {
    /// Create a new accessor info bound to given binding.
    pub fn new(binding: Binding) -> Self {
        Self {
            scheme: binding.scheme(),
            root: "/".to_string(),
            name: String::new(),
            binding,
            capability: Capability::default(),
        }
    }

    /// [`Scheme`] of backend.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Root of backend, will be in format like `/path/to/dir/`
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Set root for backend.
    ///
    /// Note: input root must be normalized.
    pub fn set_root(&mut self, root: &str) -> &mut Self {
        self.root = root.to_string();
        self
    }

    /// Name of backend, could be empty if underlying backend doesn't have namespace concept.
    ///
    /// For example:
    ///
    /// - name for `fs` => root of fs
    /// - name for `gcs` => bucket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set name of this backend.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    /// The containment boundary of this backend.
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Get backend's capabilities.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Set capabilities for backend.
    pub fn set_capability(&mut self, capability: Capability) -> &mut Self {
        self.capability = capability;
        self
    }
}

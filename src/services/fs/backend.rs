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

use std::path::Path;
use std::path::PathBuf;

use log::debug;

use super::config::guess_content_type;
use super::lister::FsLister;
use super::reader::FsReader;
use super::writer::FsWriter;
use crate::raw::*;
use crate::services::FsConfig;
use crate::*;

/// Mode of directories created by fs service.
#[cfg(unix)]
const DIR_MODE: u32 = 0o750;
/// Mode of files created by fs service.
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// POSIX file system support.
///
/// # Capabilities
///
/// This service can be used to:
///
/// - [x] init
/// - [x] read
/// - [x] write
/// - [x] delete
/// - [x] list
/// - [x] accessor (`file://` url)
///
/// # Configuration
///
/// - `root`: Set the work dir for backend.
///
/// # Example
///
/// ```no_run
/// use anyhow::Result;
/// use uniblob::services::Fs;
/// use uniblob::Operator;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     // Create fs backend builder.
///     let builder = Fs::default()
///         // Set the root for fs, all operations will happen under this root.
///         //
///         // NOTE: the root must be absolute path.
///         .root("/tmp");
///
///     let op: Operator = Operator::new(builder)?;
///
///     Ok(())
/// }
/// ```
#[derive(Default, Debug)]
pub struct FsBuilder {
    pub(super) config: FsConfig,
}

impl FsBuilder {
    /// Set root for backend.
    pub fn root(mut self, root: &str) -> Self {
        self.config.root = if root.is_empty() {
            None
        } else {
            Some(root.to_string())
        };

        self
    }
}

impl Builder for FsBuilder {
    const SCHEME: Scheme = Scheme::Fs;
    type Config = FsConfig;
    type Accessor = FsBackend;

    fn build(self) -> Result<Self::Accessor> {
        debug!("backend build started: {:?}", &self);

        let root = match self.config.root.as_deref() {
            Some(root) if !root.is_empty() => Ok(PathBuf::from(root)),
            _ => Err(
                Error::new(ErrorKind::InvalidUrl, "root is not specified")
                    .with_operation("Builder::build")
                    .with_context("service", Scheme::Fs),
            ),
        }?;

        // Root is never required to exist here, `init` creates it.
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map_err(|err| {
                    new_std_io_error(err)
                        .with_operation("Builder::build")
                        .with_context("root", root.to_string_lossy())
                })?
                .join(root)
        };

        let root = root.to_str().map(normalize_root).ok_or_else(|| {
            Error::new(ErrorKind::InvalidUrl, "root is not valid utf-8")
                .with_operation("Builder::build")
                .with_context("root", root.to_string_lossy())
        })?;
        debug!("backend use root {root}");

        let binding = Binding::new(
            Scheme::Fs,
            format!("file://{}", percent_encode_path(&root)),
        )
        .with_percent_encoded();

        let mut info = AccessorInfo::new(binding);
        info.set_root(&root)
            .set_name(&root)
            .set_capability(Capability {
                init: true,
                read: true,
                write: true,
                delete: true,
                list: true,
                accessor: true,
            });

        debug!("backend build finished: {:?}", &info);
        Ok(FsBackend {
            info,
            root: PathBuf::from(root),
        })
    }
}

/// Backend for fs services.
#[derive(Debug)]
pub struct FsBackend {
    info: AccessorInfo,
    root: PathBuf,
}

impl FsBackend {
    fn abs_path(&self, path: &str) -> PathBuf {
        if path == "/" {
            self.root.clone()
        } else {
            self.root.join(path.trim_end_matches('/'))
        }
    }
}

impl Access for FsBackend {
    type Reader = FsReader;
    type Writer = FsWriter;
    type Lister = FsLister;

    fn info(&self) -> &AccessorInfo {
        &self.info
    }

    async fn init(&self, _: OpInit) -> Result<()> {
        create_dir_all(&self.root).await.map_err(|err| {
            err.with_context("root", self.root.to_string_lossy())
        })
    }

    async fn read(&self, path: &str, _: OpRead) -> Result<Self::Reader> {
        let p = self.abs_path(path);

        let f = tokio::fs::File::open(&p).await.map_err(new_std_io_error)?;
        let meta = f.metadata().await.map_err(new_std_io_error)?;
        if meta.is_dir() {
            return Err(Error::new(
                ErrorKind::NotFound,
                "path names a directory instead of a file",
            ));
        }

        Ok(FsReader::new(f))
    }

    async fn write(&self, path: &str, _: OpWrite) -> Result<Self::Writer> {
        let p = self.abs_path(path);

        if let Some(parent) = p.parent() {
            create_dir_all(parent).await?;
        }

        let mut open_options = tokio::fs::OpenOptions::new();
        open_options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        open_options.mode(FILE_MODE);

        let f = open_options.open(&p).await.map_err(new_std_io_error)?;

        Ok(FsWriter::new(f))
    }

    async fn delete(&self, path: &str, _: OpDelete) -> Result<()> {
        let p = self.abs_path(path);

        tokio::fs::remove_file(&p)
            .await
            .map_err(new_std_io_error)
    }

    async fn list(&self, path: &str, args: &OpList) -> Result<Listing<Self::Lister>> {
        let p = self.abs_path(path);

        let meta = tokio::fs::metadata(&p).await.map_err(new_std_io_error)?;
        if !meta.is_dir() {
            if path.ends_with('/') {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    "path names a file instead of a directory",
                ));
            }
            return Ok(Listing::Resource(guess_content_type(path)));
        }

        let prefix = if path == "/" {
            String::new()
        } else {
            format!("{}/", path.trim_end_matches('/'))
        };
        let cancel = args.cancel().cloned().unwrap_or_default();
        let lister = FsLister::open(self.root.clone(), prefix, cancel).await?;
        Ok(Listing::Container(lister))
    }

    async fn accessor(&self, path: &str, _: OpAccessor) -> Result<String> {
        let p = self.abs_path(path);

        let meta = tokio::fs::metadata(&p).await.map_err(new_std_io_error)?;
        if meta.is_dir() {
            return Err(Error::new(
                ErrorKind::NotFound,
                "path names a directory instead of a file",
            ));
        }

        Ok(self.info.binding().qualify(path))
    }
}

/// Create given dir and all of its parents.
async fn create_dir_all(path: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);

    builder.create(path).await.map_err(new_std_io_error)
}

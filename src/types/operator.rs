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

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::raw::*;
use crate::services::FsConfig;
use crate::services::GcsConfig;
use crate::*;

/// Operator is the entry for all public async APIs.
///
/// One operator binds one backend to one containment boundary at
/// construction, after that it's read-only and cheap to clone. Every call
/// takes an address in either form:
///
/// - relative: `path/to/file`, resolved against the bound root or bucket.
/// - fully-qualified: `file:///root/path/to/file` or
///   `gcs://<project>/<bucket>/path/to/file`, which must start with the
///   bound prefix.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// use uniblob::Operator;
///
/// # async fn test() -> Result<()> {
/// let op = Operator::from_dsn("file:///tmp/blobs")?;
/// op.init().await?;
///
/// op.write("hello.txt", "Hello, World!").await?;
/// let bs = op.read("file:///tmp/blobs/hello.txt").await?;
/// assert_eq!(bs, "Hello, World!");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Operator {
    backend: Arc<Backend>,
    info: Arc<AccessorInfo>,
}

/// # Construction
impl Operator {
    /// Create a new operator with input builder.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// use uniblob::services::Fs;
    /// use uniblob::Operator;
    /// # fn test() -> Result<()> {
    /// let op = Operator::new(Fs::default().root("/tmp"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<B: Builder>(builder: B) -> Result<Operator> {
        let acc = builder.build()?;
        Ok(Operator::from_backend(acc.into()))
    }

    /// Create a new operator from given config.
    pub fn from_config<C: Configurator>(cfg: C) -> Result<Operator> {
        Operator::new(cfg.into_builder())
    }

    /// Create a new operator from a configuration dsn.
    ///
    /// The backend is selected by the dsn's scheme.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// use uniblob::Operator;
    /// # fn test() -> Result<()> {
    /// let op = Operator::from_dsn("gcs://my-project/my-bucket/prefix")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_dsn(dsn: &str) -> Result<Operator> {
        let parsed = Dsn::parse(dsn)?;

        let op = match parsed.scheme() {
            Scheme::Fs => Operator::from_config(FsConfig::from_dsn(&parsed)?),
            Scheme::Gcs => Operator::from_config(GcsConfig::from_dsn(&parsed)?),
        };
        op.map_err(|err| err.with_context("dsn", dsn))
    }

    /// Create a new operator of given scheme from key-value pairs.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// use uniblob::Operator;
    /// use uniblob::Scheme;
    /// # fn test() -> Result<()> {
    /// let op = Operator::from_iter(Scheme::Fs, [("root".to_string(), "/tmp".to_string())])?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_iter(
        scheme: Scheme,
        iter: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Operator> {
        match scheme {
            Scheme::Fs => Operator::from_config(FsConfig::from_iter(iter)?),
            Scheme::Gcs => Operator::from_config(GcsConfig::from_iter(iter)?),
        }
    }

    /// Create a new operator from a built backend.
    pub fn from_backend(backend: Backend) -> Operator {
        let info = Arc::new(backend.info().clone());
        Operator {
            backend: Arc::new(backend),
            info,
        }
    }

    /// Get information of underlying accessor.
    pub fn info(&self) -> &AccessorInfo {
        &self.info
    }

    /// Return the fully-qualified form of given address.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// use uniblob::Operator;
    /// # fn test() -> Result<()> {
    /// let op = Operator::from_dsn("file:///tmp/blobs")?;
    /// assert_eq!(op.qualify("a b")?, "file:///tmp/blobs/a%20b");
    /// # Ok(())
    /// # }
    /// ```
    pub fn qualify(&self, address: &str) -> Result<String> {
        let binding = self.info.binding();
        let locator = binding
            .resolve(address)
            .map_err(|err| {
                err.with_operation("Operator::qualify")
                    .with_context("address", address)
            })?;
        Ok(binding.qualify(locator.path()))
    }
}

/// # Operations
impl Operator {
    /// Make sure the root container of backend exists.
    ///
    /// Calling it on an existing container succeeds.
    pub async fn init(&self) -> Result<()> {
        self.init_with(OpInit::new()).await
    }

    /// Make sure the root container of backend exists with extra options.
    pub async fn init_with(&self, args: OpInit) -> Result<()> {
        let logger = OperationLogger::new(&self.info, Operation::Init);
        logger.started();

        let res = async {
            self.check(Operation::Init, self.info.capability().init)?;
            cancellable(args.cancel().cloned().as_ref(), self.backend.init(args)).await
        }
        .await
        .map_err(|err| err.with_operation(Operation::Init));

        logger.result(res)
    }

    /// Create a reader for given address.
    ///
    /// Returns [`ErrorKind::NotFound`] if the resource doesn't exist.
    pub async fn reader(&self, address: &str) -> Result<Reader> {
        self.reader_with(address, OpRead::new()).await
    }

    /// Create a reader for given address with extra options.
    pub async fn reader_with(&self, address: &str, args: OpRead) -> Result<Reader> {
        let cancel = args.cancel().cloned();

        self.call(Operation::Read, address, self.info.capability().read, |path| {
            let cancel = cancel.clone();
            async move {
                let r = cancellable(cancel.as_ref(), self.backend.read(&path, args)).await?;
                Ok(Reader::new(r, cancel, address))
            }
        })
        .await
    }

    /// Read the whole resource at given address.
    pub async fn read(&self, address: &str) -> Result<Bytes> {
        self.read_with(address, OpRead::new()).await
    }

    /// Read the whole resource at given address with extra options.
    pub async fn read_with(&self, address: &str, args: OpRead) -> Result<Bytes> {
        let mut r = self.reader_with(address, args).await?;
        r.read_all().await
    }

    /// Create a writer for given address.
    ///
    /// The resource is created if absent, and replaced as a whole if present.
    pub async fn writer(&self, address: &str) -> Result<Writer> {
        self.writer_with(address, OpWrite::new()).await
    }

    /// Create a writer for given address with extra options.
    pub async fn writer_with(&self, address: &str, args: OpWrite) -> Result<Writer> {
        let cancel = args.cancel().cloned();
        self.call(Operation::Write, address, self.info.capability().write, |path| {
            let cancel = cancel.clone();
            async move {
                let w = cancellable(cancel.as_ref(), self.backend.write(&path, args)).await?;
                Ok(Writer::new(w, cancel, address))
            }
        })
        .await
    }

    /// Write given bytes into the resource at given address.
    pub async fn write(&self, address: &str, bs: impl Into<Bytes>) -> Result<()> {
        self.write_with(address, bs, OpWrite::new()).await
    }

    /// Write given bytes into the resource at given address with extra options.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// use uniblob::OpWrite;
    /// use uniblob::Operator;
    /// # async fn test(op: Operator) -> Result<()> {
    /// op.write_with(
    ///     "index.html",
    ///     "<html></html>",
    ///     OpWrite::new().with_content_type("text/html"),
    /// )
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn write_with(
        &self,
        address: &str,
        bs: impl Into<Bytes>,
        args: OpWrite,
    ) -> Result<()> {
        let mut w = self.writer_with(address, args).await?;
        w.write(bs).await?;
        w.close().await
    }

    /// Delete the resource at given address.
    ///
    /// Returns [`ErrorKind::NotFound`] if the resource doesn't exist.
    pub async fn delete(&self, address: &str) -> Result<()> {
        self.delete_with(address, OpDelete::new()).await
    }

    /// Delete the resource at given address with extra options.
    pub async fn delete_with(&self, address: &str, args: OpDelete) -> Result<()> {
        self.call(Operation::Delete, address, self.info.capability().delete, |path| async move {
            cancellable(args.cancel().cloned().as_ref(), self.backend.delete(&path, args)).await
        })
        .await
    }

    /// List every resource at or under given address.
    ///
    /// - An address that names a single resource yields exactly that address.
    /// - Otherwise every non-hidden leaf resource under the container is
    ///   yielded, in the same address form the caller used.
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// use futures::TryStreamExt;
    /// use uniblob::Operator;
    /// # async fn test(op: Operator) -> Result<()> {
    /// let mut lister = op.list("dir/").await?;
    /// while let Some(res) = lister.try_next().await? {
    ///     println!("{}", res.address());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, address: &str) -> Result<Lister> {
        self.list_with(address, OpList::new()).await
    }

    /// List every resource at or under given address with extra options.
    pub async fn list_with(&self, address: &str, args: OpList) -> Result<Lister> {
        let logger = OperationLogger::new(&self.info, Operation::List).with("address", address);
        logger.started();

        // Every listing owns a child of the caller's token, cancelling the
        // lister must not cancel the caller's other work.
        let token = args.cancel().map(|v| v.child_token()).unwrap_or_default();
        let args = args.with_cancel(token);

        let res = async {
            let locator = self.info.binding().resolve(address)?;
            self.check(Operation::List, self.info.capability().list)?;

            let listing = cancellable(
                args.cancel(),
                self.backend.list(locator.path(), &args),
            )
            .await?;

            Ok(match listing {
                Listing::Resource(content_type) => Lister::once(
                    Resource::new(address).with_content_type(content_type),
                    &args,
                ),
                Listing::Container(l) => {
                    Lister::spawn(self.info.clone(), locator, address, &args, l)
                }
            })
        }
        .await
        .map_err(|err: Error| {
            err.with_operation(Operation::List)
                .with_context("address", address)
        });

        logger.result(res)
    }

    /// Get an url that can be used to access the resource outside of uniblob.
    ///
    /// - fs returns a `file://` url.
    /// - gcs returns a signed url that expires after 15 minutes.
    ///
    /// Returns [`ErrorKind::NotFound`] if the resource doesn't exist at call time.
    pub async fn accessor(&self, address: &str) -> Result<String> {
        self.accessor_with(address, OpAccessor::new()).await
    }

    /// Get an accessor url for given address with extra options.
    pub async fn accessor_with(&self, address: &str, args: OpAccessor) -> Result<String> {
        self.call(Operation::Accessor, address, self.info.capability().accessor, |path| async move {
            cancellable(args.cancel().cloned().as_ref(), self.backend.accessor(&path, args)).await
        })
        .await
    }
}

impl Operator {
    /// Run a resource level operation: resolve address, check capability,
    /// then call backend with the resolved path.
    async fn call<'a, T, F, Fut>(
        &'a self,
        op: Operation,
        address: &'a str,
        capable: bool,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>> + 'a,
    {
        let logger = OperationLogger::new(&self.info, op).with("address", address);
        logger.started();

        let res = async {
            let locator = self.info.binding().resolve(address)?;
            if locator.path().ends_with('/') {
                return Err(Error::new(
                    ErrorKind::InvalidUrl,
                    "address must name a resource instead of a container",
                ));
            }
            self.check(op, capable)?;
            f(locator.path().to_string()).await
        }
        .await
        .map_err(|err| err.with_operation(op).with_context("address", address));

        logger.result(res)
    }

    fn check(&self, op: Operation, capable: bool) -> Result<()> {
        if capable {
            return Ok(());
        }

        Err(Error::new(
            ErrorKind::Unsupported,
            format!("{op} is not supported by this backend"),
        )
        .with_context("service", self.info.scheme()))
    }
}

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

use std::pin::Pin;
use std::sync::Arc;
use std::task::ready;
use std::task::Context;
use std::task::Poll;

use futures::Stream;
use log::trace;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::sync::DropGuard;

use crate::raw::*;
use crate::*;

/// Lister is designed to list resources at given address in an asynchronous
/// manner.
///
/// Users can construct Lister by [`Operator::list`] or [`Operator::list_with`].
///
/// - Lister implements `Stream<Item = Result<Resource>>`.
/// - Lister will return `None` if there is no more resources, an error has
///   been returned or the listing has been cancelled.
///
/// Resources are produced by a background task that writes into a bounded
/// channel. The task stops at its next step once the lister is cancelled or
/// dropped.
#[derive(Debug)]
pub struct Lister {
    rx: mpsc::Receiver<Result<Resource>>,
    cancel: CancellationToken,
    _guard: DropGuard,
    finished: bool,
}

impl Lister {
    /// Spawn the traversal of given lister in background.
    ///
    /// The token in `args` belongs to this listing and is the same one the
    /// backend lister observes, so [`Lister::cancel`] reaches the backend
    /// traversal too. [`Operator::list_with`] derives it as a child of the
    /// caller's token.
    pub(crate) fn spawn<L: oio::List>(
        info: Arc<AccessorInfo>,
        locator: Locator,
        address: &str,
        args: &OpList,
        mut lister: L,
    ) -> Lister {
        let cancel = args.cancel().cloned().unwrap_or_default();
        let (tx, rx) = mpsc::channel(args.buffer());

        let token = cancel.clone();
        let address = address.to_string();
        tokio::spawn(async move {
            let logger = OperationLogger::new(&info, Operation::ListerNext).with("address", &address);

            loop {
                let next = tokio::select! {
                    biased;

                    _ = token.cancelled() => {
                        trace!(target: LOGGING_TARGET, "lister of {address} is cancelled");
                        return;
                    }
                    v = lister.next() => v,
                };

                let (item, terminal) = match next {
                    Ok(Some(entry)) => {
                        let (path, content_type) = entry.into_parts();
                        let resource = Resource::new(info.binding().present(&locator, &path))
                            .with_content_type(content_type);
                        (Ok(resource), false)
                    }
                    Ok(None) => {
                        trace!(target: LOGGING_TARGET, "lister of {address} is finished");
                        return;
                    }
                    Err(err) => {
                        let err = err
                            .with_operation(Operation::ListerNext)
                            .with_context("address", &address);
                        logger.failed(&err);
                        (Err(err), true)
                    }
                };

                tokio::select! {
                    biased;

                    _ = token.cancelled() => {
                        trace!(target: LOGGING_TARGET, "lister of {address} is cancelled");
                        return;
                    }
                    res = tx.send(item) => {
                        // Consumer has gone away.
                        if res.is_err() {
                            return;
                        }
                    }
                }

                if terminal {
                    return;
                }
            }
        });

        Lister {
            rx,
            _guard: cancel.clone().drop_guard(),
            cancel,
            finished: false,
        }
    }

    /// Build a lister that yields exactly given resource.
    ///
    /// No background task is involved.
    pub(crate) fn once(resource: Resource, args: &OpList) -> Lister {
        let cancel = args.cancel().cloned().unwrap_or_default();
        let (tx, rx) = mpsc::channel(1);
        // The channel is fresh with capacity 1, this send never fails.
        let _ = tx.try_send(Ok(resource));

        Lister {
            rx,
            _guard: cancel.clone().drop_guard(),
            cancel,
            finished: false,
        }
    }

    /// Cancel this listing.
    ///
    /// No more resources will be yielded after this call, including the ones
    /// that have been buffered already.
    pub fn cancel(&self) {
        self.cancel.cancel()
    }

    /// Check if this listing has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Stream for Lister {
    type Item = Result<Resource>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Returns `None` if we have errored or finished.
        if self.finished || self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }

        match ready!(self.rx.poll_recv(cx)) {
            Some(Ok(resource)) => Poll::Ready(Some(Ok(resource))),
            Some(Err(err)) => {
                self.finished = true;
                Poll::Ready(Some(Err(err)))
            }
            None => {
                self.finished = true;
                Poll::Ready(None)
            }
        }
    }
}

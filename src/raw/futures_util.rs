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

use tokio_util::sync::CancellationToken;

use crate::*;

/// Run given future until it completes or the token is cancelled.
///
/// Without a token the future is awaited as is. A fired token drops the
/// in-flight future and returns [`ErrorKind::Cancelled`]; cancellation is
/// checked before the future is polled, so a token fired in advance never
/// starts the work.
pub async fn cancellable<T>(
    token: Option<&CancellationToken>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(token) = token else {
        return fut.await;
    };

    tokio::select! {
        biased;

        _ = token.cancelled() => Err(new_cancelled_error()),
        res = fut => res,
    }
}

/// Create a new error for a fired cancellation signal.
pub fn new_cancelled_error() -> Error {
    Error::new(ErrorKind::Cancelled, "operation is cancelled")
}

#[cfg(test)]
mod tests {
    use std::future::pending;
    use std::future::ready;

    use super::*;

    #[tokio::test]
    async fn test_cancellable_without_token() {
        let v = cancellable(None, ready(Ok(1))).await.unwrap();
        assert_eq!(v, 1);
    }

    #[tokio::test]
    async fn test_cancellable_fired_before_poll() {
        let token = CancellationToken::new();
        token.cancel();

        let err = cancellable(Some(&token), ready(Ok(1))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_cancellable_interrupts_pending() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move { child.cancel() });

        let err = cancellable(Some(&token), pending::<Result<()>>())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }
}

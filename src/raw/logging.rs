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

use log::log;
use log::Level;

use crate::raw::*;
use crate::*;

/// The target that all operation logs are written to.
pub(crate) const LOGGING_TARGET: &str = "uniblob::services";

/// OperationLogger writes the lifecycle of one operation through the `log`
/// facade.
///
/// - `started` and `finished` are written in debug for oneshot operations
///   and in trace otherwise.
/// - Failures are written in warn, or in error with full debug output when
///   the kind is [`ErrorKind::Unexpected`].
pub(crate) struct OperationLogger<'a> {
    info: &'a AccessorInfo,
    operation: Operation,
    context: Vec<(&'static str, String)>,
}

impl<'a> OperationLogger<'a> {
    pub fn new(info: &'a AccessorInfo, operation: Operation) -> Self {
        Self {
            info,
            operation,
            context: vec![],
        }
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    pub fn started(&self) {
        self.log("started", None)
    }

    pub fn finished(&self) {
        self.log("finished", None)
    }

    pub fn failed(&self, err: &Error) {
        self.log("failed", Some(err))
    }

    /// Log the outcome of given result and pass it through.
    pub fn result<T>(&self, res: Result<T>) -> Result<T> {
        match &res {
            Ok(_) => self.finished(),
            Err(err) => self.failed(err),
        }
        res
    }

    fn log(&self, message: &str, err: Option<&Error>) {
        let operation = self.operation;
        if let Some(err) = err {
            let lvl = if err.kind() == ErrorKind::Unexpected {
                Level::Error
            } else {
                Level::Warn
            };

            log!(
                target: LOGGING_TARGET,
                lvl,
                "service={} name={} {}: {operation} {message} {}",
                self.info.scheme(),
                self.info.name(),
                LoggingContext(&self.context),
                // Print error message with debug output while unexpected happened.
                if err.kind() != ErrorKind::Unexpected {
                    format!("{err}")
                } else {
                    format!("{err:?}")
                }
            );
            return;
        }

        let lvl = if operation.is_oneshot() {
            Level::Debug
        } else {
            Level::Trace
        };

        log!(
            target: LOGGING_TARGET,
            lvl,
            "service={} name={} {}: {operation} {message}",
            self.info.scheme(),
            self.info.name(),
            LoggingContext(&self.context),
        );
    }
}

struct LoggingContext<'a>(&'a [(&'static str, String)]);

impl Display for LoggingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " {k}={v}")?;
            } else {
                write!(f, "{k}={v}")?;
            }
        }
        Ok(())
    }
}

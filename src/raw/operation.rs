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

/// Operation is the name for APIs in `Access`.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Operation {
    /// Operation for [`crate::raw::Access::init`]
    Init,
    /// Operation for [`crate::raw::Access::read`]
    Read,
    /// Operation for [`crate::raw::oio::Read::read`]
    ReaderRead,
    /// Operation for [`crate::raw::Access::write`]
    Write,
    /// Operation for [`crate::raw::oio::Write::write`]
    WriterWrite,
    /// Operation for [`crate::raw::oio::Write::close`]
    WriterClose,
    /// Operation for [`crate::raw::Access::delete`]
    Delete,
    /// Operation for [`crate::raw::Access::list`]
    List,
    /// Operation for [`crate::raw::oio::List::next`]
    ListerNext,
    /// Operation for [`crate::raw::Access::accessor`]
    Accessor,
}

impl Operation {
    /// Convert self into static str.
    pub fn into_static(self) -> &'static str {
        self.into()
    }

    /// Check if given operation is oneshot or not.
    ///
    /// For example, `Read` is oneshot but `ReaderRead` could be called multiple times.
    pub fn is_oneshot(&self) -> bool {
        !matches!(
            self,
            Operation::ReaderRead
                | Operation::WriterWrite
                | Operation::WriterClose
                | Operation::ListerNext
        )
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

impl From<Operation> for &'static str {
    fn from(v: Operation) -> &'static str {
        match v {
            Operation::Init => "init",
            Operation::Read => "read",
            Operation::ReaderRead => "Reader::read",
            Operation::Write => "write",
            Operation::WriterWrite => "Writer::write",
            Operation::WriterClose => "Writer::close",
            Operation::Delete => "delete",
            Operation::List => "list",
            Operation::ListerNext => "List::next",
            Operation::Accessor => "accessor",
        }
    }
}

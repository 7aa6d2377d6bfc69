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

/// Capability defines the supported operations and their constraints.
///
/// # Notes
///
/// Every operation listed here is checked by the [`Operator`][crate::Operator]
/// before dispatching. A backend that leaves a flag as `false` fails that
/// call with [`ErrorKind::Unsupported`][crate::ErrorKind::Unsupported].
#[derive(Copy, Clone, Default)]
pub struct Capability {
    /// If backend supports init.
    pub init: bool,

    /// If backend supports read.
    pub read: bool,

    /// If backend supports write.
    pub write: bool,

    /// If backend supports delete.
    pub delete: bool,

    /// If backend supports list.
    pub list: bool,

    /// If backend supports accessor.
    pub accessor: bool,
}

impl Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = vec![];

        if self.init {
            s.push("Init");
        }
        if self.read {
            s.push("Read");
        }
        if self.write {
            s.push("Write");
        }
        if self.delete {
            s.push("Delete");
        }
        if self.list {
            s.push("List");
        }
        if self.accessor {
            s.push("Accessor");
        }

        write!(f, "{{ {} }}", s.join(" | "))
    }
}

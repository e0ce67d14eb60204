// SPDX-FileCopyrightText: © 2025 Huawei Cloud Computing Technologies Co., Ltd
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 Huawei Cloud Computing Technologies Co., Ltd
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
//

use std::{
    cell::{RefCell, RefMut},
    fmt::{self, Debug},
    ops::{Deref, DerefMut},
};

use thread_local::ThreadLocal;

pub trait LocalBuilder<T> {
    fn build(&self) -> T;
}

impl<T, F: Fn() -> T> LocalBuilder<T> for F {
    fn build(&self) -> T {
        self()
    }
}

/// Provides thread-local scratch objects. When a thread calls [LocalPool::checkout()] for the
/// first time the object is constructed with the builder given to [LocalPool::new()]; later
/// checkouts from the same thread reuse it. The returned [Checkout] gives exclusive access and
/// hands the object back when dropped, on every exit path including unwinding.
///
/// A nested checkout on a thread that already holds its object gets a freshly built, detached
/// instance that is simply dropped afterwards.
pub struct LocalPool<T, B>
where
    T: Send,
    B: LocalBuilder<T>,
{
    tls: ThreadLocal<RefCell<T>>,
    builder: B,
}

impl<T, B> LocalPool<T, B>
where
    T: Send,
    B: LocalBuilder<T>,
{
    pub fn new(builder: B) -> Self {
        Self { tls: ThreadLocal::new(), builder }
    }

    pub fn checkout(&self) -> Checkout<'_, T> {
        let cell = self.tls.get_or(|| RefCell::new(self.builder.build()));
        match cell.try_borrow_mut() {
            Ok(local) => Checkout(Slot::Local(local)),
            Err(_) => Checkout(Slot::Detached(self.builder.build())),
        }
    }

    /// Number of threads that own an instance.
    #[cfg(test)]
    pub(crate) fn instances(&mut self) -> usize {
        self.tls.iter_mut().count()
    }
}

impl<T: Send, B: LocalBuilder<T>> Debug for LocalPool<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPool").finish_non_exhaustive()
    }
}

pub struct Checkout<'a, T>(Slot<'a, T>);

enum Slot<'a, T> {
    Local(RefMut<'a, T>),
    Detached(T),
}

impl<T> Checkout<'_, T> {
    /// Whether this checkout borrowed the calling thread's pooled instance.
    #[cfg(test)]
    pub(crate) fn is_local(&self) -> bool {
        matches!(self.0, Slot::Local(_))
    }
}

impl<T> Deref for Checkout<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.0 {
            Slot::Local(local) => local,
            Slot::Detached(detached) => detached,
        }
    }
}

impl<T> DerefMut for Checkout<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.0 {
            Slot::Local(local) => local,
            Slot::Detached(detached) => detached,
        }
    }
}

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

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use super::{collect_targets, Balancer, Result};

/// Hands out the targets in list order, starting over after the last one.
///
/// The cursor is a single atomic counter, so concurrent callers never block each other.
/// Only the counter value modulo the number of targets matters, wrapping is harmless.
#[derive(Debug)]
pub struct RoundRobinBalancer<E> {
    items: Vec<Arc<E>>,
    offset: AtomicUsize,
}

impl<E> RoundRobinBalancer<E> {
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>) -> Result<Self> {
        Ok(Self { items: collect_targets("round robin", targets)?, offset: AtomicUsize::new(0) })
    }

    pub fn targets(&self) -> &[Arc<E>] {
        &self.items
    }
}

impl<E> Balancer<E> for RoundRobinBalancer<E> {
    fn next_item(&self) -> Arc<E> {
        let offset = self.offset.fetch_add(1, Ordering::Relaxed);
        Arc::clone(&self.items[offset % self.items.len()])
    }
}

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

use std::sync::Arc;

use parking_lot::Mutex;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{collect_targets, Balancer, Result};

/// Uniform random selection.
///
/// Backed by [SmallRng], which is fast and not cryptographically secure. Don't use it
/// where the choice of target must be unpredictable to an adversary.
#[derive(Debug)]
pub struct RandomBalancer<E> {
    items: Vec<Arc<E>>,
    rng: Mutex<SmallRng>,
}

impl<E> RandomBalancer<E> {
    pub fn new(targets: impl IntoIterator<Item = Arc<E>>) -> Result<Self> {
        Self::new_with_rng(targets, SmallRng::from_entropy())
    }

    pub fn new_with_rng(targets: impl IntoIterator<Item = Arc<E>>, rng: SmallRng) -> Result<Self> {
        Ok(Self { items: collect_targets("random", targets)?, rng: Mutex::new(rng) })
    }

    pub fn targets(&self) -> &[Arc<E>] {
        &self.items
    }
}

impl<E> Balancer<E> for RandomBalancer<E> {
    fn next_item(&self) -> Arc<E> {
        let index = self.rng.lock().gen_range(0..self.items.len());
        Arc::clone(&self.items[index])
    }
}

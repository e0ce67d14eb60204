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

use lodestar_configuration::config::LbPolicy;

pub mod configured;
pub mod crc32;
pub mod hash;
pub mod least;
pub mod murmur2;
pub mod random;
pub mod round_robin;
pub mod wrr;

/// Selectors whose choice only depends on the calls made before.
pub trait Balancer<E> {
    fn next_item(&self) -> Arc<E>;
}

/// Selectors mapping a partition key to a target.
pub trait KeyedBalancer<E> {
    fn next_item_for_key(&self, key: &[u8]) -> Result<Arc<E>>;
}

/// Selectors charging a caller supplied cost to the chosen target.
pub trait CostBalancer<E> {
    fn next_item_with_cost(&self, cost: u64) -> Arc<E>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BalancerError {
    #[error("balancer needs at least one target")]
    NoTargets,
    #[error("got {targets} targets but {weights} weights")]
    UnequalLength { targets: usize, weights: usize },
    #[error("target at index {index} has a zero weight")]
    ZeroWeight { index: usize },
    #[error("{len} targets can't be addressed by a 32 bit signed hash")]
    TooManyTargets { len: usize },
    #[error("partition key is empty")]
    EmptyKey,
    #[error("policy {policy} needs a partition key")]
    MissingKey { policy: LbPolicy },
}

pub type Result<T> = std::result::Result<T, BalancerError>;

/// Collects the target set, rejecting an empty one.
fn collect_targets<E>(kind: &'static str, targets: impl IntoIterator<Item = Arc<E>>) -> Result<Vec<Arc<E>>> {
    let targets: Vec<_> = targets.into_iter().collect();
    if targets.is_empty() {
        tracing::warn!("Refusing to build {kind} balancer without targets");
        return Err(BalancerError::NoTargets);
    }
    tracing::debug!("Built {kind} balancer with {} targets", targets.len());
    Ok(targets)
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        Err(BalancerError::EmptyKey)
    } else {
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use lodestar_configuration::config::LbPolicy;
    use tracing_test::traced_test;

    use super::{check_key, collect_targets, test_support::partitions, BalancerError};

    #[traced_test]
    #[test]
    fn empty_target_set_is_rejected() {
        let result = collect_targets::<u8>("test", []);
        assert_eq!(result, Err(BalancerError::NoTargets));
        assert!(logs_contain("without targets"));
    }

    #[test]
    fn targets_keep_their_order() {
        let targets = partitions(3);
        let collected = collect_targets("test", targets.iter().cloned()).unwrap();
        assert!(collected.iter().zip(&targets).all(|(a, b)| std::sync::Arc::ptr_eq(a, b)));
    }

    #[test]
    fn empty_key() {
        assert_eq!(check_key(b""), Err(BalancerError::EmptyKey));
        assert_eq!(check_key(b"k"), Ok(()));
    }

    #[test]
    fn error_messages() {
        assert_eq!(BalancerError::UnequalLength { targets: 3, weights: 2 }.to_string(), "got 3 targets but 2 weights");
        assert_eq!(
            BalancerError::MissingKey { policy: LbPolicy::Murmur2 }.to_string(),
            "policy murmur2 needs a partition key"
        );
    }
}

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
    fmt::{self, Display},
    sync::Arc,
    thread,
};

use lodestar_configuration::{config::LbPolicy, options::Options};
use lodestar_lib::{BalancerError, ConfiguredBalancer};

use crate::{Result, SimError};

/// What the simulated callers send: request `i` carries `cost` and, for keyed policies, the
/// key `{key_prefix}{i}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub requests: usize,
    pub threads: usize,
    pub key_prefix: String,
    pub cost: u64,
}

impl From<&Options> for Workload {
    fn from(options: &Options) -> Self {
        Self {
            requests: options.requests.get(),
            threads: options.threads.get(),
            key_prefix: options.key_prefix.clone(),
            cost: options.cost,
        }
    }
}

#[derive(Debug)]
pub struct Report<E> {
    pub policy: LbPolicy,
    pub requests: usize,
    /// Targets in balancer order with the number of times each was chosen.
    pub selections: Vec<(Arc<E>, usize)>,
}

impl<E> Report<E> {
    pub fn count(&self, pred: impl Fn(&E) -> bool) -> usize {
        self.selections.iter().filter(|(target, _)| pred(target.as_ref())).map(|(_, count)| count).sum()
    }
}

impl<E: Display> Display for Report<E> {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} balancer, {} requests", self.policy, self.requests)?;
        for (target, count) in &self.selections {
            let share = 100.0 * *count as f64 / self.requests.max(1) as f64;
            writeln!(f, "  {target:<24} {count:>10} {share:>7.2}%")?;
        }
        Ok(())
    }
}

/// Drives `workload.requests` selections through `balancer`, spread over `workload.threads`
/// threads sharing the one balancer.
pub fn simulate<E>(balancer: &ConfiguredBalancer<E>, workload: &Workload) -> Result<Report<E>>
where
    E: Send + Sync,
{
    let targets = balancer.targets();
    let threads = workload.threads.max(1);
    let keyed = balancer.policy().is_keyed();
    tracing::info!(
        policy = %balancer.policy(),
        requests = workload.requests,
        threads,
        "Simulating selections over {} targets",
        targets.len()
    );

    let counts = thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let targets = &targets;
                scope.spawn(move || -> std::result::Result<Vec<usize>, BalancerError> {
                    let mut counts = vec![0; targets.len()];
                    for request in (worker..workload.requests).step_by(threads) {
                        let key = keyed.then(|| format!("{}{request}", workload.key_prefix));
                        let item = balancer.next_item(key.as_deref().map(str::as_bytes), workload.cost)?;
                        if let Some(index) = targets.iter().position(|target| Arc::ptr_eq(target, &item)) {
                            counts[index] += 1;
                        }
                    }
                    Ok(counts)
                })
            })
            .collect();

        workers.into_iter().try_fold(vec![0_usize; targets.len()], |mut total, worker| {
            let counts = worker.join().map_err(|_| SimError::WorkerPanicked)??;
            total.iter_mut().zip(counts).for_each(|(total, count)| *total += count);
            Ok::<_, SimError>(total)
        })
    })?;

    tracing::debug!("Simulation finished");
    Ok(Report {
        policy: balancer.policy(),
        requests: workload.requests,
        selections: targets.into_iter().zip(counts).collect(),
    })
}

#[cfg(test)]
mod test {
    use lodestar_configuration::config::{HashFunction, LbPolicy};
    use lodestar_lib::ConfiguredBalancer;
    use tracing_test::traced_test;

    use super::{simulate, Report, Workload};

    fn workload(requests: usize, threads: usize) -> Workload {
        Workload { requests, threads, key_prefix: String::new(), cost: 1 }
    }

    fn numbers(count: usize) -> Vec<std::sync::Arc<usize>> {
        (0..count).map(std::sync::Arc::new).collect()
    }

    #[traced_test]
    #[test]
    fn round_robin_spread_evenly() {
        let balancer = ConfiguredBalancer::new(LbPolicy::RoundRobin, HashFunction::Fnv1a, numbers(4), vec![]).unwrap();
        let report = simulate(&balancer, &workload(400, 4)).unwrap();
        assert!(report.selections.iter().all(|(_, count)| *count == 100));
        assert!(logs_contain("Simulating selections over 4 targets"));
    }

    #[test]
    fn keyed_selection_ignores_thread_count() {
        let balancer = ConfiguredBalancer::new(LbPolicy::Murmur2, HashFunction::Fnv1a, numbers(6), vec![]).unwrap();
        let single = simulate(&balancer, &workload(12, 1)).unwrap();
        let many = simulate(&balancer, &workload(12, 5)).unwrap();
        let counts =
            |report: &Report<usize>| report.selections.iter().map(|(_, count)| *count).collect::<Vec<_>>();
        // keys "0".."11" land on [2, 3, 2, 5, 1, 0, 4, 3, 3, 5, 4, 0]
        assert_eq!(counts(&single), vec![2, 1, 2, 3, 2, 2]);
        assert_eq!(counts(&single), counts(&many));
    }

    #[test]
    fn more_threads_than_requests() {
        let balancer = ConfiguredBalancer::new(LbPolicy::Random, HashFunction::Fnv1a, numbers(3), vec![]).unwrap();
        let report = simulate(&balancer, &workload(2, 8)).unwrap();
        assert_eq!(report.count(|_| true), 2);
    }

    #[test]
    fn report_lists_every_target() {
        let balancer = ConfiguredBalancer::new(LbPolicy::RoundRobin, HashFunction::Fnv1a, numbers(2), vec![]).unwrap();
        let report = simulate(&balancer, &workload(3, 1)).unwrap();
        let printed = report.to_string();
        let mut lines = printed.lines();
        assert_eq!(lines.next(), Some("round_robin balancer, 3 requests"));
        assert!(lines.next().is_some_and(|line| line.trim_start().starts_with('0') && line.ends_with("66.67%")));
        assert!(lines.next().is_some_and(|line| line.trim_start().starts_with('1') && line.ends_with("33.33%")));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn unkeyed_policies_run_without_keys() {
        for policy in [LbPolicy::RoundRobin, LbPolicy::LeastCost, LbPolicy::Random] {
            let balancer = ConfiguredBalancer::new(policy, HashFunction::Fnv1a, numbers(3), vec![]).unwrap();
            let report = simulate(&balancer, &workload(30, 3)).unwrap();
            assert_eq!(report.count(|_| true), 30, "{policy}");
        }
    }

    #[test]
    fn empty_key_prefix_still_sends_keys() {
        let balancer = ConfiguredBalancer::new(LbPolicy::Crc32, HashFunction::Fnv1a, numbers(3), vec![]).unwrap();
        assert!(simulate(&balancer, &workload(10, 2)).is_ok());
    }
}

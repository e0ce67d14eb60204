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

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    fmt::format::{DefaultFields, Format},
    layer::Layered,
    reload,
    reload::Handle,
    EnvFilter, Registry,
};

use lodestar_configuration::config::Log;

use crate::{Result, SimError};

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type RegistryLayer = fmt::Layer<FilteredRegistry, DefaultFields, Format, NonBlocking>;
type FilterReloadHandle = Handle<EnvFilter, Registry>;
type LayerReloadHandle = Handle<RegistryLayer, FilteredRegistry>;

/// Logs to stdout at `info` until the configuration is read, then switches to the
/// configured filter and, if asked to, to a log file.
pub struct TracingManager {
    guard: WorkerGuard,
    layer_reload_handle: LayerReloadHandle,
    filter_reload_handle: FilterReloadHandle,
}

impl TracingManager {
    pub fn new() -> Result<Self> {
        use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).parse_lossy(""));

        let (guard, layer) = Self::stdout_layer();
        let (layer, layer_reload_handle) = reload::Layer::new(layer);
        let (env_filter, filter_reload_handle) = reload::Layer::new(env_filter);

        Registry::default().with(env_filter).with(layer).try_init()?;
        Ok(TracingManager { guard, layer_reload_handle, filter_reload_handle })
    }

    pub fn update(&mut self, log: &Log) -> Result<()> {
        self.filter_reload_handle.modify(|filter| *filter = log.env_filter())?;

        if let Some(log_file) = &log.log_file {
            let (guard, file_layer) = Self::file_layer(log_file)?;
            self.layer_reload_handle.modify(|layer| *layer = file_layer)?;
            self.guard = guard;
            tracing::debug!(path = %log_file.display(), "Switched logging to file");
        }

        Ok(())
    }

    fn stdout_layer() -> (WorkerGuard, RegistryLayer) {
        let out = std::io::stdout();
        let is_terminal = std::io::IsTerminal::is_terminal(&out);
        let (non_blocking, guard) = tracing_appender::non_blocking(out);
        let std_layer = fmt::layer().with_writer(non_blocking).with_thread_names(true).with_ansi(is_terminal);

        (guard, std_layer)
    }

    fn file_layer(path: &Path) -> Result<(WorkerGuard, RegistryLayer)> {
        let file_name = path.file_name().ok_or_else(|| SimError::LogFile(path.to_path_buf()))?;
        let directory = path.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let file_appender = tracing_appender::rolling::never(directory, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking).with_thread_names(true);

        Ok((guard, file_layer))
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::SimError;

    use super::TracingManager;

    #[test]
    fn log_file_needs_a_name() {
        let result = TracingManager::file_layer(Path::new("/"));
        assert!(matches!(result, Err(SimError::LogFile(_))));
    }
}

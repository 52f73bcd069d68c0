// Copyright Rivtower Technologies LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::str::FromStr;

use chrono::{Local, Offset};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use time::{format_description::well_known, UtcOffset};
use tracing_subscriber::{fmt::format, fmt::time::OffsetTime, prelude::*, EnvFilter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub max_level: String,
    pub filter: String,
    /// Log to a daily rolling file under this directory instead of stdout.
    pub rolling_file_path: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_level: "info".to_owned(),
            filter: "info".to_owned(),
            rolling_file_path: Default::default(),
        }
    }
}

pub fn init_tracing(name: &str, log_config: &LogConfig) -> Result<()> {
    let max_level = tracing::Level::from_str(&log_config.max_level)
        .map_err(|e| eyre!("invalid max_level `{}`: {e}", log_config.max_level))?;
    let timer = OffsetTime::new(local_offset(), well_known::Rfc3339);
    let layer = tracing_subscriber::fmt::layer()
        .event_format(format().compact())
        .with_ansi(false)
        .with_timer(timer);

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_config.filter));
    if let Some(rolling_file_path) = &log_config.rolling_file_path {
        let logfile = tracing_appender::rolling::daily(rolling_file_path, name);
        registry
            .with(layer.with_writer(logfile.with_max_level(max_level)))
            .try_init()?;
    } else {
        registry
            .with(layer.with_writer(std::io::stdout.with_max_level(max_level)))
            .try_init()?;
    }

    Ok(())
}

fn local_offset() -> UtcOffset {
    let local_offset_sec = Local::now().offset().fix().local_minus_utc();
    UtcOffset::from_whole_seconds(local_offset_sec).unwrap_or(UtcOffset::UTC)
}

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

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::identity::ServiceIdentity;

pub const SERVICE_PORT: u16 = 80;
pub const CHECK_INTERVAL: Duration = Duration::from_secs(10);
pub const DEREGISTER_CRITICAL_SERVICE_AFTER: Duration = Duration::from_secs(60);
pub const HEALTH_CHECK_PATH: &str = "/health/check";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInstance {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckSpec {
    #[serde(rename = "DeregisterCriticalServiceAfter", serialize_with = "go_duration")]
    pub deregister_after: Duration,
    #[serde(rename = "HTTP")]
    pub http_target: String,
    #[serde(rename = "Interval", serialize_with = "go_duration")]
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    #[serde(flatten)]
    pub instance: ServiceInstance,
    #[serde(rename = "EnableTagOverride")]
    pub enable_tag_override: bool,
    #[serde(rename = "Check")]
    pub check: HealthCheckSpec,
}

pub fn build_registration(
    identity: &ServiceIdentity,
    service_name: &str,
    address: &str,
) -> RegistrationRequest {
    RegistrationRequest {
        instance: ServiceInstance {
            id: identity.as_str().to_owned(),
            name: service_name.to_owned(),
            address: address.to_owned(),
            port: SERVICE_PORT,
        },
        enable_tag_override: false,
        check: HealthCheckSpec {
            deregister_after: DEREGISTER_CRITICAL_SERVICE_AFTER,
            http_target: format!("http://{address}{HEALTH_CHECK_PATH}"),
            interval: CHECK_INTERVAL,
        },
    }
}

pub fn registry_endpoint(consul_url: &str) -> String {
    format!("{}/v1/agent/service/register", registry_base(consul_url))
}

pub fn deregister_endpoint(consul_url: &str, service_id: &str) -> String {
    format!(
        "{}/v1/agent/service/deregister/{service_id}",
        registry_base(consul_url)
    )
}

// `host:port` gets a plain http scheme; an explicit scheme is kept as given.
fn registry_base(consul_url: &str) -> String {
    let base = consul_url.trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        base.to_owned()
    } else {
        format!("http://{base}")
    }
}

/// Renders a duration the way the registry parses them: `10s`, `1m`, `2h`.
fn go_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let secs = duration.as_secs();
    let text = if secs != 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    };
    serializer.serialize_str(&text)
}

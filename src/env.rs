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

//! Configuration resolution with a fixed precedence: a non-empty environment
//! variable always wins over the caller-supplied default.

pub const CONSUL_URL: &str = "CONSUL_URL";
pub const SERVICE_NAME: &str = "SERVICE_NAME";

pub fn env_or_default(key: &str, default: &str) -> String {
    resolve_with(|k| std::env::var(k).ok(), key, default)
}

pub fn resolve_with<F>(lookup: F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Where to register and under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationTarget {
    pub consul_url: String,
    pub service_name: String,
}

impl RegistrationTarget {
    pub fn resolve(consul_url: &str, service_name: &str) -> Self {
        Self::resolve_with(|k| std::env::var(k).ok(), consul_url, service_name)
    }

    pub fn resolve_with<F>(lookup: F, consul_url: &str, service_name: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            consul_url: resolve_with(&lookup, CONSUL_URL, consul_url),
            service_name: resolve_with(&lookup, SERVICE_NAME, service_name),
        }
    }
}

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

use serde::{Deserialize, Serialize};

use crate::{
    error::{RegistrationError, SetupError},
    host::HOSTNAME_PATH,
    payload::RegistrationRequest,
    service_register::ServiceRegister,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsulConfig {
    /// Registry `host:port`; `CONSUL_URL` overrides it.
    pub consul_url: String,
    /// `SERVICE_NAME` overrides it.
    pub service_name: String,
    pub hostname_path: String,
    pub register_timeout_secs: u64,
    pub deregister_on_shutdown: bool,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            consul_url: "127.0.0.1:8500".to_owned(),
            service_name: Default::default(),
            hostname_path: HOSTNAME_PATH.to_owned(),
            register_timeout_secs: 3,
            deregister_on_shutdown: true,
        }
    }
}

impl ConsulConfig {
    pub const fn register_timeout(&self) -> Duration {
        Duration::from_secs(self.register_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct ConsulClient {
    http: reqwest::Client,
}

impl ConsulClient {
    pub fn new(timeout: Duration) -> Result<Self, SetupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SetupError::Client)?;
        Ok(Self { http })
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Vec<u8>, RegistrationError> {
        let rsp = req.send().await?;

        let status = rsp.status();
        let body = rsp.bytes().await?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(RegistrationError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    }
}

impl ServiceRegister for ConsulClient {
    async fn register(
        &self,
        endpoint: &str,
        request: &RegistrationRequest,
    ) -> Result<Vec<u8>, RegistrationError> {
        debug!("register to consul: {endpoint}");
        self.send(self.http.put(endpoint).json(request)).await
    }

    async fn deregister(&self, endpoint: &str) -> Result<(), RegistrationError> {
        debug!("deregister from consul: {endpoint}");
        self.send(self.http.put(endpoint)).await.map(|_| ())
    }
}

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

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    env::{self, RegistrationTarget},
    error::{Fault, SetupError},
    host,
    identity::ServiceIdentity,
    payload,
    service_register::ServiceRegister,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub service_id: String,
    pub address: String,
    /// Raw registry response.
    pub body: Vec<u8>,
}

/// Registers this instance with the registry once at startup.
///
/// Setup faults (no host identifier) end the process; registry faults are
/// logged and the instance keeps running unregistered.
pub struct Registrar<R> {
    identity: ServiceIdentity,
    registry: R,
    hostname_path: PathBuf,
}

impl<R: ServiceRegister> Registrar<R> {
    pub fn new(identity: ServiceIdentity, registry: R, hostname_path: impl AsRef<Path>) -> Self {
        Self {
            identity,
            registry,
            hostname_path: hostname_path.as_ref().to_owned(),
        }
    }

    pub const fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// `consul_url` and `service_name` are defaults; `CONSUL_URL` and
    /// `SERVICE_NAME` take precedence when set.
    pub async fn register(
        &self,
        consul_url: &str,
        service_name: &str,
    ) -> Option<RegistrationOutcome> {
        info!("register consul start");
        match settle(self.try_register(consul_url, service_name).await) {
            Ok(outcome) => outcome,
            Err(e) => terminate(e),
        }
    }

    pub async fn try_register(
        &self,
        consul_url: &str,
        service_name: &str,
    ) -> Result<RegistrationOutcome, Fault> {
        let address = host::read_first_line(&self.hostname_path)?;
        info!("service_id = {}", self.identity);
        info!("container_id = {address}");

        let target = RegistrationTarget::resolve(consul_url, service_name);
        let request = payload::build_registration(&self.identity, &target.service_name, &address);
        let body = self
            .registry
            .register(&payload::registry_endpoint(&target.consul_url), &request)
            .await?;

        Ok(RegistrationOutcome {
            service_id: self.identity.to_string(),
            address,
            body,
        })
    }

    /// Best effort removal from the registry, used on graceful shutdown.
    pub async fn deregister(&self, consul_url: &str) {
        let consul_url = env::env_or_default(env::CONSUL_URL, consul_url);
        let endpoint = payload::deregister_endpoint(&consul_url, self.identity.as_str());
        match self.registry.deregister(&endpoint).await {
            Ok(()) => info!("deregistered {} from consul", self.identity),
            Err(e) => warn!("deregister from consul failed: {e}"),
        }
    }
}

/// Applies the failure policy to a registration attempt. Registry faults are
/// logged once and absorbed; setup faults are handed back to the caller.
pub fn settle(
    result: Result<RegistrationOutcome, Fault>,
) -> Result<Option<RegistrationOutcome>, SetupError> {
    match result {
        Ok(outcome) => {
            info!(
                "register result = {}",
                String::from_utf8_lossy(&outcome.body)
            );
            Ok(Some(outcome))
        }
        Err(Fault::Transient(e)) => {
            error!("register to consul failed: {e}");
            Ok(None)
        }
        Err(Fault::Fatal(e)) => Err(e),
    }
}

/// Prints the fault to stderr and exits the process.
///
/// The exit status is 0: the instance shuts down cleanly instead of running
/// without ever being registered.
pub fn terminate(fault: impl Into<Fault>) -> ! {
    let fault = fault.into();
    error!("{fault}");
    let mut stderr = std::io::stderr().lock();
    writeln!(stderr, "{fault}").ok();
    stderr.flush().ok();
    std::process::exit(0)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use reqwest::StatusCode;
    use tracing_test::traced_test;

    use super::*;
    use crate::{error::RegistrationError, payload::RegistrationRequest};

    #[derive(Clone, Default)]
    struct MemoryRegistry {
        fail: bool,
        seen: Arc<Mutex<Vec<(String, RegistrationRequest)>>>,
        removed: Arc<Mutex<Vec<String>>>,
    }

    impl ServiceRegister for MemoryRegistry {
        async fn register(
            &self,
            endpoint: &str,
            request: &RegistrationRequest,
        ) -> Result<Vec<u8>, RegistrationError> {
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.to_owned(), request.clone()));
            if self.fail {
                Err(RegistrationError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: "no leader".to_owned(),
                })
            } else {
                Ok(b"true".to_vec())
            }
        }

        async fn deregister(&self, endpoint: &str) -> Result<(), RegistrationError> {
            self.removed.lock().unwrap().push(endpoint.to_owned());
            if self.fail {
                Err(RegistrationError::Status {
                    status: StatusCode::NOT_FOUND,
                    body: "unknown service".to_owned(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn hostname_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "c0ffee42").unwrap();
        file
    }

    fn without_overrides<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset([crate::env::CONSUL_URL, crate::env::SERVICE_NAME], f);
    }

    #[test]
    fn registers_resolved_instance() {
        let file = hostname_file();
        let registry = MemoryRegistry::default();
        let registrar = Registrar::new(ServiceIdentity::generate(), registry.clone(), file.path());

        without_overrides(|| {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let outcome = rt
                .block_on(registrar.register("consul:8500", "orders"))
                .unwrap();
            assert_eq!(outcome.address, "c0ffee42");
            assert_eq!(outcome.body, b"true");
        });

        let seen = registry.seen.lock().unwrap();
        let (endpoint, request) = &seen[0];
        assert_eq!(endpoint, "http://consul:8500/v1/agent/service/register");
        assert_eq!(request.instance.name, "orders");
        assert_eq!(request.instance.address, "c0ffee42");
        assert_eq!(request.check.http_target, "http://c0ffee42/health/check");
    }

    #[tokio::test]
    async fn identity_is_stable_across_attempts() {
        let file = hostname_file();
        let registry = MemoryRegistry::default();
        let registrar = Registrar::new(ServiceIdentity::generate(), registry.clone(), file.path());

        let first = registrar.try_register("consul:8500", "orders").await.unwrap();
        let second = registrar.try_register("consul:8500", "orders").await.unwrap();
        assert_eq!(first.service_id, second.service_id);
        assert_eq!(first.service_id, registrar.identity().as_str());

        let seen = registry.seen.lock().unwrap();
        assert_eq!(seen[0].1.instance.id, seen[1].1.instance.id);
    }

    #[tokio::test]
    async fn missing_hostname_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let registry = MemoryRegistry::default();
        let registrar = Registrar::new(
            ServiceIdentity::generate(),
            registry.clone(),
            dir.path().join("hostname"),
        );

        let fault = registrar
            .try_register("consul:8500", "orders")
            .await
            .unwrap_err();
        assert!(fault.is_fatal());
        assert!(matches!(settle(Err(fault)), Err(SetupError::HostRead { .. })));
        assert!(registry.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn registry_failure_is_absorbed_with_one_error() {
        let file = hostname_file();
        let registry = MemoryRegistry {
            fail: true,
            ..Default::default()
        };
        let registrar = Registrar::new(ServiceIdentity::generate(), registry, file.path());

        assert_eq!(registrar.register("consul:8500", "orders").await, None);
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("ERROR")).count() {
                1 => Ok(()),
                n => Err(format!("expected one error entry, got {n}")),
            }
        });
        assert!(logs_contain("register to consul failed: consul responded 503"));
        assert!(logs_contain("no leader"));
    }

    #[tokio::test]
    #[traced_test]
    async fn success_logs_raw_response() {
        let file = hostname_file();
        let registrar =
            Registrar::new(ServiceIdentity::generate(), MemoryRegistry::default(), file.path());

        assert!(registrar.register("consul:8500", "orders").await.is_some());
        assert!(logs_contain("register result = true"));
        assert!(!logs_contain("ERROR"));
    }

    #[test]
    fn deregister_targets_own_id() {
        let registry = MemoryRegistry::default();
        let identity = ServiceIdentity::generate();
        let registrar = Registrar::new(identity.clone(), registry.clone(), "/etc/hostname");

        without_overrides(|| {
            tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap()
                .block_on(registrar.deregister("https://consul.example"));
        });
        assert_eq!(
            registry.removed.lock().unwrap()[0],
            format!("https://consul.example/v1/agent/service/deregister/{identity}")
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_deregister_is_reported_as_deregister() {
        let registry = MemoryRegistry {
            fail: true,
            ..Default::default()
        };
        let registrar = Registrar::new(ServiceIdentity::generate(), registry, "/etc/hostname");

        registrar.deregister("consul:8500").await;
        assert!(logs_contain("deregister from consul failed: consul responded 404"));
        assert!(!logs_contain("register to consul failed"));
    }
}

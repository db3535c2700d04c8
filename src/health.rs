//! Health checks for the service boundary.
//!
//! Three independent checks (startup, liveness, readiness) each aggregate
//! per-component results. A status is healthy only when at least one
//! component reported and every component passed.

use std::sync::Arc;

use serde::Serialize;

use crate::transform::TransformerRegistry;

/// Outcome of a single component check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub component: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl HealthCheckResult {
    pub fn success(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            is_healthy: true,
            failure: None,
        }
    }

    pub fn failure(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            is_healthy: false,
            failure: Some(reason.into()),
        }
    }
}

/// Aggregate of component results for one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub component_results: Vec<HealthCheckResult>,
}

impl HealthStatus {
    pub fn new(component_results: impl IntoIterator<Item = HealthCheckResult>) -> Self {
        Self {
            component_results: component_results.into_iter().collect(),
        }
    }

    /// At least one component, and all of them passed.
    pub fn is_healthy(&self) -> bool {
        !self.component_results.is_empty() && self.component_results.iter().all(|r| r.is_healthy)
    }
}

/// Service answering the three health checks.
pub trait HealthCheckService: Send + Sync {
    fn startup_status(&self) -> HealthStatus;

    fn liveness(&self) -> HealthStatus;

    fn readiness(&self) -> HealthStatus;
}

/// A single component check.
pub trait HealthCheckProvider: Send + Sync {
    fn check(&self) -> HealthCheckResult;
}

impl<F> HealthCheckProvider for F
where
    F: Fn() -> HealthCheckResult + Send + Sync,
{
    fn check(&self) -> HealthCheckResult {
        self()
    }
}

/// [`HealthCheckService`] evaluating registered providers on every call.
#[derive(Default)]
pub struct DefaultHealthCheckService {
    startup: Vec<Box<dyn HealthCheckProvider>>,
    liveness: Vec<Box<dyn HealthCheckProvider>>,
    readiness: Vec<Box<dyn HealthCheckProvider>>,
}

impl DefaultHealthCheckService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_startup_provider(&mut self, provider: impl HealthCheckProvider + 'static) {
        self.startup.push(Box::new(provider));
    }

    pub fn add_liveness_provider(&mut self, provider: impl HealthCheckProvider + 'static) {
        self.liveness.push(Box::new(provider));
    }

    pub fn add_readiness_provider(&mut self, provider: impl HealthCheckProvider + 'static) {
        self.readiness.push(Box::new(provider));
    }

    fn evaluate(providers: &[Box<dyn HealthCheckProvider>]) -> HealthStatus {
        HealthStatus::new(providers.iter().map(|p| p.check()))
    }
}

impl HealthCheckService for DefaultHealthCheckService {
    fn startup_status(&self) -> HealthStatus {
        Self::evaluate(&self.startup)
    }

    fn liveness(&self) -> HealthStatus {
        Self::evaluate(&self.liveness)
    }

    fn readiness(&self) -> HealthStatus {
        Self::evaluate(&self.readiness)
    }
}

/// Passes once the registry holds at least one conversion unit.
pub struct RegistryHealthCheck {
    registry: Arc<TransformerRegistry>,
}

impl RegistryHealthCheck {
    pub const COMPONENT: &'static str = "transformer-registry";

    pub fn new(registry: Arc<TransformerRegistry>) -> Self {
        Self { registry }
    }
}

impl HealthCheckProvider for RegistryHealthCheck {
    fn check(&self) -> HealthCheckResult {
        if self.registry.is_empty() {
            HealthCheckResult::failure(Self::COMPONENT, "no transformers registered")
        } else {
            HealthCheckResult::success(Self::COMPONENT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_status_is_unhealthy() {
        assert!(!HealthStatus::default().is_healthy());
    }

    #[test]
    fn test_mixed_status_is_unhealthy() {
        let status = HealthStatus::new([
            HealthCheckResult::success("a"),
            HealthCheckResult::failure("b", "down"),
        ]);
        assert!(!status.is_healthy());
    }

    #[test]
    fn test_all_passed_is_healthy() {
        let status = HealthStatus::new([HealthCheckResult::success("a"), HealthCheckResult::success("b")]);
        assert!(status.is_healthy());
    }

    #[test]
    fn test_default_service_checks_are_independent() {
        let mut service = DefaultHealthCheckService::new();
        service.add_liveness_provider(|| HealthCheckResult::success("loop"));
        service.add_readiness_provider(|| HealthCheckResult::failure("db", "unreachable"));

        assert!(!service.startup_status().is_healthy());
        assert!(service.liveness().is_healthy());
        assert!(!service.readiness().is_healthy());
        assert_eq!(service.readiness().component_results[0].failure.as_deref(), Some("unreachable"));
    }

    #[test]
    fn test_registry_health_check() {
        let empty = RegistryHealthCheck::new(Arc::new(TransformerRegistry::new()));
        let full = RegistryHealthCheck::new(Arc::new(
            TransformerRegistry::with_policy_transformers().unwrap(),
        ));

        assert!(!empty.check().is_healthy);
        assert!(full.check().is_healthy);
    }
}

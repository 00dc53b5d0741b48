//! Resource tier resolution.

use sail_spec::ApplicationDefinition;
use tracing::warn;

use crate::error::{ResolveError, ResolveResult};
use crate::outcome::Resolution;

const CPU_KEY: &str = "cpu";
const MEMORY_KEY: &str = "memory";
const REPLICAS_KEY: &str = "replicas";
const DEFAULT_REPLICAS: &str = "1";

/// CPU sizing tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuTier {
    C05,
    C1,
    C2,
    C3,
}

impl CpuTier {
    pub const DEFAULT: &'static str = "0.5";

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "c05" => Some(CpuTier::C05),
            "c1" => Some(CpuTier::C1),
            "c2" => Some(CpuTier::C2),
            "c3" => Some(CpuTier::C3),
            _ => None,
        }
    }

    pub fn quantity(self) -> &'static str {
        match self {
            CpuTier::C05 => "0.5",
            CpuTier::C1 => "1",
            CpuTier::C2 => "2",
            CpuTier::C3 => "3",
        }
    }

    /// Quantity for a tier key; empty, missing and unknown keys give the default.
    pub fn resolve(key: Option<&str>) -> &'static str {
        key.and_then(Self::parse)
            .map_or(Self::DEFAULT, Self::quantity)
    }
}

/// Memory sizing tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTier {
    M05,
    M1,
    M2,
    M3,
}

impl MemoryTier {
    pub const DEFAULT: &'static str = "256Mi";

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "m05" => Some(MemoryTier::M05),
            "m1" => Some(MemoryTier::M1),
            "m2" => Some(MemoryTier::M2),
            "m3" => Some(MemoryTier::M3),
            _ => None,
        }
    }

    pub fn quantity(self) -> &'static str {
        match self {
            MemoryTier::M05 => "0.5Gi",
            MemoryTier::M1 => "1Gi",
            MemoryTier::M2 => "2Gi",
            MemoryTier::M3 => "3Gi",
        }
    }

    pub fn resolve(key: Option<&str>) -> &'static str {
        key.and_then(Self::parse)
            .map_or(Self::DEFAULT, Self::quantity)
    }
}

/// Concrete sizing of an application in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTier {
    pub cpu: String,
    pub memory: String,
    pub replicas: String,
}

impl Default for ResourceTier {
    fn default() -> Self {
        Self {
            cpu: CpuTier::DEFAULT.to_string(),
            memory: MemoryTier::DEFAULT.to_string(),
            replicas: DEFAULT_REPLICAS.to_string(),
        }
    }
}

/// Resolve cpu, memory and replicas of `app` for `environment`.
///
/// An application without templates gets the defaults and a warning. With
/// templates declared, the first one named `environment` is used and a missing
/// match is an error.
pub fn resolve_tier(
    app: &ApplicationDefinition,
    environment: &str,
) -> ResolveResult<Resolution<ResourceTier>> {
    if app.template.is_empty() {
        let reason = format!(
            "missing resource template, applying default values for application {}",
            app.name
        );
        warn!("{}", reason);
        return Ok(Resolution::with_warnings(ResourceTier::default(), vec![reason]));
    }

    let template = app
        .template
        .iter()
        .find(|t| t.name == environment)
        .ok_or_else(|| ResolveError::UnknownEnvironment {
            app: app.name.clone(),
            environment: environment.to_string(),
        })?;

    let config_value = |key: &str| {
        template
            .config
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    };

    let replicas = config_value(REPLICAS_KEY)
        .map(str::to_string)
        .or_else(|| template.replica.map(|r| r.to_string()))
        .unwrap_or_else(|| DEFAULT_REPLICAS.to_string());

    Ok(Resolution::new(ResourceTier {
        cpu: CpuTier::resolve(config_value(CPU_KEY)).to_string(),
        memory: MemoryTier::resolve(config_value(MEMORY_KEY)).to_string(),
        replicas,
    }))
}

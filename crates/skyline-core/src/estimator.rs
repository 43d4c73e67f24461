//! Resource estimation
//!
//! Maps a framework and a complexity score onto a fixed sizing tier. Total
//! over its inputs and free of I/O.

use crate::signature::{Framework, ResourceTier, TierClass};

/// Complexity above which a tier is escalated
pub const ESCALATION_THRESHOLD: usize = 100;

/// Memory sizes in ascending order; escalation moves one step up
pub const MEMORY_LADDER: [&str; 7] = ["128Mi", "256Mi", "512Mi", "1Gi", "2Gi", "4Gi", "8Gi"];

/// Base sizing for a tier class
pub fn base_tier(class: TierClass) -> ResourceTier {
    let (cpu_request, cpu_limit, memory_request, memory_limit) = match class {
        TierClass::Base => ("250m", "500m", "512Mi", "1Gi"),
        TierClass::Backend => ("500m", "1000m", "768Mi", "1.5Gi"),
        TierClass::Frontend => ("100m", "200m", "128Mi", "256Mi"),
    };
    ResourceTier {
        cpu_request: cpu_request.to_string(),
        cpu_limit: cpu_limit.to_string(),
        memory_request: memory_request.to_string(),
        memory_limit: memory_limit.to_string(),
        replicas: 2,
    }
}

/// Parse a Kubernetes memory quantity into MiB
pub fn memory_mib(quantity: &str) -> Option<f64> {
    let quantity = quantity.trim();
    let (number, factor) = if let Some(n) = quantity.strip_suffix("Gi") {
        (n, 1024.0)
    } else if let Some(n) = quantity.strip_suffix("Mi") {
        (n, 1.0)
    } else if let Some(n) = quantity.strip_suffix("Ki") {
        (n, 1.0 / 1024.0)
    } else {
        return None;
    };
    number.parse::<f64>().ok().map(|n| n * factor)
}

/// Next ladder value strictly above `current`; values at or past the top are kept
pub fn next_memory_step(current: &str) -> String {
    let current_mib = memory_mib(current).unwrap_or(0.0);
    MEMORY_LADDER
        .iter()
        .find(|step| memory_mib(step).is_some_and(|mib| mib > current_mib))
        .map(|step| step.to_string())
        .unwrap_or_else(|| current.to_string())
}

/// Size a workload
pub fn estimate(framework: Framework, complexity: usize) -> ResourceTier {
    let mut tier = base_tier(framework.tier_class());
    if complexity > ESCALATION_THRESHOLD {
        tier.replicas += 1;
        tier.memory_limit = next_memory_step(&tier.memory_limit);
    }
    tier
}

//! Project signature: the structured record every renderer reads

pub mod model;
pub mod types;

pub use model::{
    AUTOSCALING_FLOOR, BuildConfig, DATABASE_ENV_VARS, DatabaseRequirement, DependencyProfile,
    MAX_REPLICAS, ProjectSignature, ResourceTier,
};
pub use types::{
    AppType, BuildTool, DatabaseKind, DatabaseSize, Framework, Orm, Provenance, TierClass,
};

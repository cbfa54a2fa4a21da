//! Path-triggered content transforms.
//!
//! # Data Flow
//! ```text
//! request path "/example.fixed.vcf"
//!     → TransformRoute::resolve (strip trigger, append resource suffix)
//!     → backend fetch of "/example.vcf/part-r-00000"
//!     → ContentTransform::apply on the full body
//! ```
//!
//! # Design Decisions
//! - Transforms are pure byte-to-byte functions behind a trait object
//! - Only full (non-range) bodies are transformed

pub mod vcf;

use std::fmt;
use std::sync::Arc;

pub use vcf::VcfFixer;

/// A pure rewrite of a complete response body.
pub trait ContentTransform: Send + Sync {
    fn apply(&self, body: &[u8]) -> Vec<u8>;
}

/// Binds a transform to the request paths that trigger it.
#[derive(Clone)]
pub struct TransformRoute {
    trigger_suffix: String,
    resource_suffix: String,
    transform: Arc<dyn ContentTransform>,
}

impl TransformRoute {
    pub fn new(
        trigger_suffix: impl Into<String>,
        resource_suffix: impl Into<String>,
        transform: Arc<dyn ContentTransform>,
    ) -> Self {
        Self {
            trigger_suffix: trigger_suffix.into(),
            resource_suffix: resource_suffix.into(),
            transform,
        }
    }

    /// The backend path behind `path`, if `path` triggers this route.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let stem = path.strip_suffix(self.trigger_suffix.as_str())?;
        if stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Some(format!("{stem}{}", self.resource_suffix))
    }

    pub fn transform(&self) -> &dyn ContentTransform {
        self.transform.as_ref()
    }
}

impl fmt::Debug for TransformRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRoute")
            .field("trigger_suffix", &self.trigger_suffix)
            .field("resource_suffix", &self.resource_suffix)
            .finish_non_exhaustive()
    }
}

//! Mold session with rebuild caching
//!
//! A session holds one pattern and the current parameters. The normalized
//! transform is cached per (pattern, footprint, user scale) and the mesh per
//! (pattern, parameters). Replacing either drops the superseded mesh.

use crate::builder::{BuildReport, MoldBuilder};
use crate::kernel::{BooleanKernel, CsgKernel};
use crate::mesh::SolidMesh;
use chocomold_core::{ShapeSet, Transform};
use chocomold_pattern::normalize::normalize;
use chocomold_settings::{Config, MoldParameters, PatternSettings, SettingsResult};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct NormalizedPattern {
    generation: u64,
    footprint: f64,
    user_scale: f64,
    transform: Transform,
    shapes: Arc<ShapeSet>,
}

#[derive(Debug, Clone)]
struct BuiltMesh {
    generation: u64,
    params: MoldParameters,
    mesh: Arc<SolidMesh>,
    report: BuildReport,
}

/// One pattern being turned into a mold
#[derive(Debug)]
pub struct MoldSession<K = CsgKernel> {
    builder: MoldBuilder<K>,
    params: MoldParameters,
    pattern: Arc<ShapeSet>,
    generation: u64,
    normalized: Option<NormalizedPattern>,
    built: Option<BuiltMesh>,
    builds: usize,
}

impl Default for MoldSession<CsgKernel> {
    fn default() -> Self {
        Self::new(MoldBuilder::default())
    }
}

impl<K: BooleanKernel> MoldSession<K> {
    pub fn new(builder: MoldBuilder<K>) -> Self {
        Self {
            builder,
            params: MoldParameters::default(),
            pattern: Arc::new(ShapeSet::default()),
            generation: 0,
            normalized: None,
            built: None,
            builds: 0,
        }
    }

    /// Session using the mold parameters and shape limit of a validated config
    pub fn from_config(builder: MoldBuilder<K>, config: &Config) -> SettingsResult<Self> {
        config.validate()?;
        let mut session = Self::new(builder).with_pattern_settings(&config.pattern);
        session.params = config.mold.clone();
        Ok(session)
    }

    /// Apply the pattern settings' hard shape limit to the builder
    pub fn with_pattern_settings(mut self, settings: &PatternSettings) -> Self {
        self.builder = self.builder.with_shape_limit(settings.hard_shape_limit);
        self.built = None;
        self
    }

    pub fn parameters(&self) -> &MoldParameters {
        &self.params
    }

    /// Replace the parameters after validating them
    pub fn set_parameters(&mut self, params: MoldParameters) -> SettingsResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Pattern in document coordinates
    pub fn pattern(&self) -> &ShapeSet {
        &self.pattern
    }

    /// Replace the pattern; cached results for the old one are dropped
    pub fn set_pattern(&mut self, shapes: ShapeSet) {
        self.pattern = Arc::new(shapes);
        self.generation += 1;
        self.normalized = None;
        self.built = None;
    }

    pub fn clear_pattern(&mut self) {
        self.set_pattern(ShapeSet::default());
    }

    /// Number of builds actually run
    pub fn build_count(&self) -> usize {
        self.builds
    }

    fn normalized(&mut self) -> &NormalizedPattern {
        let footprint = self.params.target_footprint();
        let user_scale = self.params.user_scale;
        let stale = self.normalized.as_ref().is_none_or(|n| {
            n.generation != self.generation
                || n.footprint != footprint
                || n.user_scale != user_scale
        });

        if stale {
            self.normalized = None;
        }

        let pattern = &self.pattern;
        let generation = self.generation;
        self.normalized.get_or_insert_with(|| {
            let (transform, shapes) = normalize(pattern, footprint, user_scale);
            NormalizedPattern {
                generation,
                footprint,
                user_scale,
                transform,
                shapes: Arc::new(shapes),
            }
        })
    }

    /// Transform from document to mold space for the current pattern
    pub fn transform(&mut self) -> Transform {
        self.normalized().transform
    }

    /// Pattern in mold space
    pub fn normalized_shapes(&mut self) -> Arc<ShapeSet> {
        Arc::clone(&self.normalized().shapes)
    }

    /// Current mold, rebuilt only when the pattern or parameters changed
    pub fn mesh(&mut self) -> (Arc<SolidMesh>, BuildReport) {
        if let Some(built) = &self.built {
            if built.generation == self.generation && built.params == self.params {
                return (Arc::clone(&built.mesh), built.report.clone());
            }
        }

        let shapes = self.normalized_shapes();
        let (mesh, report) = self.builder.build(&shapes, &self.params);
        self.builds += 1;
        debug!(
            "Session build #{} for pattern generation {}: {}",
            self.builds, self.generation, report.outcome
        );

        let mesh = Arc::new(mesh);
        // Assigning drops the superseded mesh unless a caller still holds it.
        self.built = Some(BuiltMesh {
            generation: self.generation,
            params: self.params.clone(),
            mesh: Arc::clone(&mesh),
            report: report.clone(),
        });
        (mesh, report)
    }
}

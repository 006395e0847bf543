//! Run requests and the JSON run-spec file they are read from.

use super::problem::Candidate;
use crate::design::{ComponentKind, DesignSpace};
use crate::error::ConfigError;
use crate::ga::GaConfig;
use crate::load::LoadCase;
use crate::material::Material;
use crate::physics::Component;
use serde::{Deserialize, Serialize};

/// Everything one optimization run needs.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub design_space: DesignSpace,
    /// Physics model with its fixed geometry and limits.
    pub model: Component,
    pub config: GaConfig,
    /// Warm-start vectors, in design-space variable order.
    pub seeds: Vec<Vec<f64>>,
}

impl RunRequest {
    /// A request using the component's documented model and default config.
    pub fn new(design_space: DesignSpace) -> Self {
        let model = Component::for_kind(design_space.component());
        Self {
            design_space,
            model,
            config: GaConfig::default(),
            seeds: Vec::new(),
        }
    }

    /// Preset space and model for a component.
    pub fn preset(component: ComponentKind) -> Self {
        Self::new(DesignSpace::preset(component))
    }

    pub fn with_model(mut self, model: Component) -> Self {
        self.model = model;
        self
    }

    pub fn with_config(mut self, config: GaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed_vector(mut self, values: Vec<f64>) -> Self {
        self.seeds.push(values);
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<Vec<f64>>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Checks the seeds and returns them clamped into the design space.
    ///
    /// # Errors
    ///
    /// - a seed of the wrong length ([`ConfigError::VariableCountMismatch`])
    /// - a seed with a NaN or infinite entry
    pub fn seed_candidates(&self) -> Result<Vec<Candidate>, ConfigError> {
        self.seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| {
                self.design_space.check_len(seed)?;
                if seed.iter().any(|v| !v.is_finite()) {
                    return Err(ConfigError::InvalidParameter {
                        field: "seeds",
                        message: format!("seed {i} has a non-finite entry"),
                    });
                }
                let mut values = seed.clone();
                self.design_space.clamp(&mut values);
                Ok(Candidate::new(values))
            })
            .collect()
    }
}

/// New bounds for one named variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsOverride {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

/// File form of a [`RunRequest`], as read by the command-line tool.
///
/// Every field but `component` is optional and falls back to the
/// component's preset.
///
/// ```json
/// {
///   "component": "connecting-rod",
///   "bounds": [{ "name": "beam_height", "lower": 10.0, "upper": 30.0 }],
///   "config": { "population_size": 60, "seed": 7 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub component: ComponentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<BoundsOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_case: Option<LoadCase>,
    #[serde(default)]
    pub config: GaConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seeds: Vec<Vec<f64>>,
}

impl RunSpec {
    /// The preset for a component, spelled out in full.
    pub fn template(component: ComponentKind) -> Self {
        let space = DesignSpace::preset(component);
        Self {
            component,
            model: Some(Component::for_kind(component)),
            bounds: space
                .variables()
                .iter()
                .map(|v| BoundsOverride {
                    name: v.name.clone(),
                    lower: v.lower,
                    upper: v.upper,
                })
                .collect(),
            material: Some(space.material().clone()),
            load_case: Some(space.load_case().clone()),
            config: GaConfig::default(),
            seeds: Vec::new(),
        }
    }

    /// Applies the overrides to the component preset.
    ///
    /// The material is swapped before bounds are applied, so a spec can
    /// switch to a lattice material and bound its density in one go.
    pub fn into_request(self) -> Result<RunRequest, ConfigError> {
        let mut space = DesignSpace::preset(self.component);
        if let Some(material) = self.material {
            space = space.with_material(material)?;
        }
        if let Some(load_case) = self.load_case {
            space = space.with_load_case(load_case)?;
        }
        for b in &self.bounds {
            space = space.with_bounds(&b.name, b.lower, b.upper)?;
        }
        let model = self
            .model
            .unwrap_or_else(|| Component::for_kind(self.component));
        Ok(RunRequest {
            design_space: space,
            model,
            config: self.config,
            seeds: self.seeds,
        })
    }
}

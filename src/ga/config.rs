//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of the evolutionary loop, including
//! the real-valued operator settings used by bounded problems.

use super::operators::MutationOperator;
use super::selection::Selection;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_gendesign::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 200);
/// assert_eq!(config.elite_count, 1);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_gendesign::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_max_generations(25)
///     .with_selection(Selection::Tournament(3))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of individuals in the population. At least 2.
    pub population_size: usize,

    /// Generation budget. Zero returns the ranked initial population.
    pub max_generations: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Number of best individuals copied unchanged into the next generation.
    ///
    /// At least 1, which makes the best fitness non-worsening across
    /// generations.
    pub elite_count: usize,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, both parents are cloned.
    pub crossover_rate: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Per-gene probability of perturbation once an offspring mutates.
    pub gene_mutation_prob: f64,

    /// Gaussian mutation standard deviation as a fraction of each
    /// variable's range.
    pub mutation_scale: f64,

    /// Gene-level mutation operator.
    pub mutation_operator: MutationOperator,

    /// BLX-α extension of the parents' interval.
    pub blend_alpha: f64,

    /// Generations without improvement of the best fitness before stopping.
    ///
    /// 0 disables stagnation-based termination (the default).
    pub stagnation_limit: usize,

    /// Whether to evaluate individuals in parallel.
    ///
    /// Only effective when the crate is built with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed; the seed used is reported in the result.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation; the run then returns its
    /// current population, so actual runtime may exceed the limit by one
    /// generation.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 200,
            selection: Selection::default(),
            elite_count: 1,
            crossover_rate: 0.9,
            mutation_rate: 0.3,
            gene_mutation_prob: 0.3,
            mutation_scale: 0.1,
            mutation_operator: MutationOperator::Gaussian,
            blend_alpha: 0.3,
            stagnation_limit: 0,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_gene_mutation_prob(mut self, prob: f64) -> Self {
        self.gene_mutation_prob = prob.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_scale(mut self, scale: f64) -> Self {
        self.mutation_scale = scale.max(0.0);
        self
    }

    pub fn with_mutation_operator(mut self, operator: MutationOperator) -> Self {
        self.mutation_operator = operator;
        self
    }

    pub fn with_blend_alpha(mut self, alpha: f64) -> Self {
        self.blend_alpha = alpha.max(0.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Quick feasibility check: small population, short budget.
    ///
    /// - Population: 40, Generations: 50, Time limit: 10s
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            max_generations: 50,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Balanced quality and runtime.
    ///
    /// - Population: 100, Generations: 200, Time limit: 30s
    /// - Stagnation limit: 60
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 200,
            stagnation_limit: 60,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Large population and budget for final designs.
    ///
    /// - Population: 200, Generations: 500, Time limit: 120s
    /// - Stagnation limit: 120, Elites: 2
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_generations: 500,
            elite_count: 2,
            stagnation_limit: 120,
            time_limit_ms: Some(120_000),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(invalid(
                "population_size",
                format!("must be at least 2, got {}", self.population_size),
            ));
        }
        if self.elite_count == 0 {
            return Err(invalid("elite_count", "must be at least 1".into()));
        }
        if self.elite_count >= self.population_size {
            return Err(invalid(
                "elite_count",
                format!(
                    "{} elites fill the whole population of {}",
                    self.elite_count, self.population_size
                ),
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(invalid(
                "selection",
                "tournament size must be at least 1".into(),
            ));
        }
        for (field, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("gene_mutation_prob", self.gene_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must lie in [0, 1], got {value}")));
            }
        }
        for (field, value) in [
            ("mutation_scale", self.mutation_scale),
            ("blend_alpha", self.blend_alpha),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be non-negative, got {value}")));
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err(invalid("time_limit_ms", "must be positive or unset".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::InvalidParameter { field, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 200);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert_eq!(config.elite_count, 1);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.3).abs() < 1e-10);
        assert!((config.gene_mutation_prob - 0.3).abs() < 1e-10);
        assert!((config.mutation_scale - 0.1).abs() < 1e-10);
        assert_eq!(config.mutation_operator, MutationOperator::Gaussian);
        assert!((config.blend_alpha - 0.3).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 0);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(25)
            .with_selection(Selection::Rank)
            .with_elite_count(2)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.5)
            .with_gene_mutation_prob(0.2)
            .with_mutation_scale(0.05)
            .with_mutation_operator(MutationOperator::Uniform)
            .with_blend_alpha(0.5)
            .with_stagnation_limit(10)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 25);
        assert_eq!(config.selection, Selection::Rank);
        assert_eq!(config.elite_count, 2);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.5).abs() < 1e-10);
        assert!((config.gene_mutation_prob - 0.2).abs() < 1e-10);
        assert!((config.mutation_scale - 0.05).abs() < 1e-10);
        assert_eq!(config.mutation_operator, MutationOperator::Uniform);
        assert!((config.blend_alpha - 0.5).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 10);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_generations_allowed() {
        let config = GaConfig::default().with_max_generations(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                field: "population_size",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_elites() {
        let none = GaConfig::default().with_elite_count(0);
        assert!(matches!(
            none.validate(),
            Err(ConfigError::InvalidParameter {
                field: "elite_count",
                ..
            })
        ));

        let all = GaConfig::default()
            .with_population_size(10)
            .with_elite_count(10);
        assert!(all.validate().is_err());

        let most = GaConfig::default()
            .with_population_size(10)
            .with_elite_count(9);
        assert!(most.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                field: "selection",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_raw_rates() {
        let config = GaConfig {
            mutation_rate: 1.5,
            ..GaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                field: "mutation_rate",
                ..
            })
        ));

        let config = GaConfig {
            blend_alpha: f64::NAN,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_gene_mutation_prob(1.2)
            .with_mutation_scale(-1.0)
            .with_blend_alpha(-0.3);

        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        assert!((config.gene_mutation_prob - 1.0).abs() < 1e-10);
        assert!((config.mutation_scale - 0.0).abs() < 1e-10);
        assert!((config.blend_alpha - 0.0).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_time_limit() {
        let config = GaConfig::default().with_time_limit_ms(0);
        assert!(config.validate().is_err());
        assert!(GaConfig::default().with_time_limit_ms(1).validate().is_ok());
    }

    // ---- Presets ----

    #[test]
    fn test_preset_fast() {
        let config = GaConfig::fast();
        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 50);
        assert_eq!(config.time_limit_ms, Some(10_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_balanced() {
        let config = GaConfig::balanced();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 200);
        assert_eq!(config.stagnation_limit, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_quality() {
        let config = GaConfig::quality();
        assert_eq!(config.population_size, 200);
        assert_eq!(config.elite_count, 2);
        assert_eq!(config.time_limit_ms, Some(120_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_chainable() {
        let config = GaConfig::fast().with_population_size(75).with_seed(42);
        assert_eq!(config.population_size, 75);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.time_limit_ms, Some(10_000));
    }

    // ---- Serde ----

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GaConfig =
            serde_json::from_str(r#"{"population_size": 40, "selection": "rank"}"#).unwrap();
        assert_eq!(config.population_size, 40);
        assert_eq!(config.selection, Selection::Rank);
        assert_eq!(config.max_generations, 200);
    }

    #[test]
    fn test_tournament_json() {
        let config: GaConfig = serde_json::from_str(r#"{"selection": {"tournament": 5}}"#).unwrap();
        assert_eq!(config.selection, Selection::Tournament(5));
    }
}

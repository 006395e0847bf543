//! Candidate design vectors and the GA problem that scores them.

use super::fitness::PenaltyFitness;
use crate::constraint::{ConstraintEvaluator, ConstraintSpec, Evaluation};
use crate::design::DesignSpace;
use crate::error::ConfigError;
use crate::ga::operators::{blend_crossover, gaussian_mutation};
use crate::ga::{Fitness, GaConfig, GaProblem, Individual, MutationOperator};
use crate::physics::{Component, ComponentModel};
use rand::Rng;
use tracing::trace;

/// A design vector with its cached evaluation.
///
/// Any change to the values drops the evaluation, so the engine re-scores
/// exactly the candidates that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    values: Vec<f64>,
    evaluation: Option<Evaluation>,
}

impl Candidate {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            evaluation: None,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn set_values(&mut self, values: Vec<f64>) {
        self.values = values;
        self.evaluation = None;
    }

    /// Edits the values in place and invalidates the evaluation.
    pub fn modify<F: FnOnce(&mut [f64])>(&mut self, f: F) {
        f(&mut self.values);
        self.evaluation = None;
    }

    pub fn mass_kg(&self) -> Option<f64> {
        self.evaluation.as_ref().and_then(Evaluation::mass_kg)
    }

    pub fn is_feasible(&self) -> bool {
        self.evaluation.as_ref().is_some_and(|e| e.feasible)
    }

    pub(crate) fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = Some(evaluation);
    }
}

impl Individual for Candidate {
    type Fitness = PenaltyFitness;

    fn fitness(&self) -> PenaltyFitness {
        self.evaluation
            .as_ref()
            .map_or_else(PenaltyFitness::worst, PenaltyFitness::from_evaluation)
    }

    fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }
}

/// Per-run context: the design space, the physics model and the
/// constraint evaluator, shared read-only by every evaluation.
#[derive(Debug, Clone)]
pub struct DesignProblem {
    space: DesignSpace,
    model: Component,
    evaluator: ConstraintEvaluator,
    bounds: Vec<(f64, f64)>,
    blend_alpha: f64,
    gene_mutation_prob: f64,
    mutation_scale: f64,
    mutation_operator: MutationOperator,
}

impl DesignProblem {
    /// Binds a model to a design space.
    ///
    /// # Errors
    ///
    /// - the model designs a different component than the space describes
    /// - the load case or material lack something the model reads
    /// - the GA configuration is invalid
    pub fn new(
        space: DesignSpace,
        model: Component,
        config: &GaConfig,
    ) -> Result<Self, ConfigError> {
        if model.kind() != space.component() {
            return Err(ConfigError::InvalidParameter {
                field: "model",
                message: format!(
                    "model designs `{}` but the design space is for `{}`",
                    model.kind(),
                    space.component()
                ),
            });
        }
        model.validate_inputs(space.load_case(), space.material())?;
        config.validate()?;

        let evaluator = ConstraintEvaluator::new(model.constraints());
        let bounds = space.bounds();
        Ok(Self {
            space,
            model,
            evaluator,
            bounds,
            blend_alpha: config.blend_alpha,
            gene_mutation_prob: config.gene_mutation_prob,
            mutation_scale: config.mutation_scale,
            mutation_operator: config.mutation_operator,
        })
    }

    pub fn space(&self) -> &DesignSpace {
        &self.space
    }

    pub fn model(&self) -> &Component {
        &self.model
    }

    pub fn specs(&self) -> &[ConstraintSpec] {
        self.evaluator.specs()
    }

    /// Scores one vector. Physics failures become a maximally infeasible record.
    pub fn evaluate_values(&self, values: &[f64]) -> Evaluation {
        match self
            .model
            .evaluate(values, self.space.load_case(), self.space.material())
        {
            Ok(outputs) => self.evaluator.evaluate(outputs),
            Err(err) => {
                trace!(%err, "candidate evaluation failed");
                self.evaluator.failed(&err)
            }
        }
    }
}

impl GaProblem for DesignProblem {
    type Individual = Candidate;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Candidate {
        Candidate::new(self.space.sample(rng))
    }

    fn evaluate(&self, candidate: &mut Candidate) {
        let evaluation = self.evaluate_values(&candidate.values);
        candidate.set_evaluation(evaluation);
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let (a, b) = blend_crossover(
            &parent1.values,
            &parent2.values,
            &self.bounds,
            self.blend_alpha,
            rng,
        );
        vec![Candidate::new(a), Candidate::new(b)]
    }

    fn mutate<R: Rng>(&self, candidate: &mut Candidate, rng: &mut R) {
        let (bounds, prob, scale, op) = (
            &self.bounds,
            self.gene_mutation_prob,
            self.mutation_scale,
            self.mutation_operator,
        );
        candidate.modify(|genes| {
            op.apply(genes, bounds, prob, scale, rng);
        });
    }

    /// Gaussian noise on every gene, so seeded slots stay near their seed.
    fn perturb<R: Rng>(&self, seed: &Candidate, rng: &mut R) -> Candidate {
        let mut child = Candidate::new(seed.values.clone());
        gaussian_mutation(
            &mut child.values,
            &self.bounds,
            1.0,
            self.mutation_scale,
            rng,
        );
        child
    }

    /// Seeds must match the design space's dimension.
    fn check_seed(&self, seed: &Candidate) -> Result<(), ConfigError> {
        self.space.check_len(&seed.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::ComponentKind;
    use crate::ga::GaRunner;
    use crate::physics::ConnectingRod;
    use crate::random::create_rng;

    fn rod_problem() -> DesignProblem {
        let kind = ComponentKind::ConnectingRod;
        DesignProblem::new(
            DesignSpace::preset(kind),
            Component::for_kind(kind),
            &GaConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_model() {
        let err = DesignProblem::new(
            DesignSpace::preset(ComponentKind::Piston),
            Component::for_kind(ComponentKind::Crankshaft),
            &GaConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { field: "model", .. }
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let kind = ComponentKind::ConnectingRod;
        let err = DesignProblem::new(
            DesignSpace::preset(kind),
            Component::for_kind(kind),
            &GaConfig::default().with_population_size(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                field: "population_size",
                ..
            }
        ));
    }

    #[test]
    fn test_modify_clears_evaluation() {
        let problem = rod_problem();
        let mut rng = create_rng(1);
        let mut c = problem.create_individual(&mut rng);
        assert!(!c.is_evaluated());
        assert!(!c.fitness().is_feasible());

        problem.evaluate(&mut c);
        assert!(c.is_evaluated());
        c.modify(|v| v[0] += 0.1);
        assert!(!c.is_evaluated());
        assert_eq!(c.fitness(), PenaltyFitness::worst());
    }

    #[test]
    fn test_operators_stay_in_bounds() {
        let problem = rod_problem();
        let mut rng = create_rng(3);
        for _ in 0..50 {
            let a = problem.create_individual(&mut rng);
            let b = problem.create_individual(&mut rng);
            for mut child in problem.crossover(&a, &b, &mut rng) {
                problem.mutate(&mut child, &mut rng);
                assert!(problem.space().contains(child.values()));
            }
            let p = problem.perturb(&a, &mut rng);
            assert!(problem.space().contains(p.values()));
        }
    }

    #[test]
    fn test_wrong_length_is_maximally_infeasible() {
        let problem = rod_problem();
        let mut c = Candidate::new(vec![1.0, 2.0]);
        problem.evaluate(&mut c);
        let eval = c.evaluation().unwrap();
        assert!(!eval.feasible);
        assert!(eval.failure.is_some());
        assert!(eval.outputs.is_none());
        assert_eq!(eval.violations.len(), problem.specs().len());
    }

    #[test]
    fn test_seed_of_wrong_length_rejected_by_runner() {
        let problem = rod_problem();
        let config = GaConfig::default()
            .with_population_size(8)
            .with_max_generations(3)
            .with_seed(4)
            .with_parallel(false);
        assert!(problem.check_seed(&Candidate::new(vec![50.0; 10])).is_ok());

        let short = vec![Candidate::new(vec![50.0; 3])];
        let err = GaRunner::run_seeded(&problem, &config, short, None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::VariableCountMismatch {
                expected: 10,
                found: 3
            }
        );
    }

    #[test]
    fn test_mass_limit_flows_into_constraints() {
        let kind = ComponentKind::ConnectingRod;
        let problem = DesignProblem::new(
            DesignSpace::preset(kind),
            Component::ConnectingRod(ConnectingRod::default().with_mass_limit(0.01)),
            &GaConfig::default(),
        )
        .unwrap();
        let mut rng = create_rng(5);
        for _ in 0..20 {
            let mut c = problem.create_individual(&mut rng);
            problem.evaluate(&mut c);
            assert!(!c.is_feasible());
        }
    }
}

//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → ranking → elitism → selection →
//! crossover → mutation → repeat.
//!
//! All random decisions are drawn from one generator on the calling thread.
//! Evaluation may fan out across threads, but it is pure and every
//! generation waits for all evaluations before ranking, so a seed fixes the
//! whole trace whether or not evaluation runs in parallel.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::ConfigError;
use crate::random::{create_rng, fresh_seed};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The generation budget was exhausted.
    Completed,
    /// The best fitness did not improve for `stagnation_limit` generations.
    Stagnated,
    /// The external cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimedOut,
}

/// Population statistics after one generation.
///
/// Values are [`Fitness::to_f64`] views. For penalty fitness that is the
/// objective of feasible individuals and the violation of infeasible ones,
/// which is why the two groups are summarized separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    /// 0 is the initial population.
    pub generation: usize,
    pub best: f64,
    pub best_feasible: bool,
    pub feasible_count: usize,
    pub min_feasible: Option<f64>,
    pub mean_feasible: Option<f64>,
    pub max_feasible: Option<f64>,
    pub mean_infeasible: Option<f64>,
}

impl GenerationStats {
    /// Summarizes a population sorted best-first.
    fn collect<I: Individual>(generation: usize, population: &[I]) -> Self {
        let mut feasible = Vec::new();
        let mut infeasible = Vec::new();
        for ind in population {
            let fitness = ind.fitness();
            if fitness.is_feasible() {
                feasible.push(fitness.to_f64());
            } else {
                infeasible.push(fitness.to_f64());
            }
        }
        let best = population.first().map(|ind| ind.fitness());
        Self {
            generation,
            best: best.map_or(f64::INFINITY, Fitness::to_f64),
            best_feasible: best.is_some_and(|f| f.is_feasible()),
            feasible_count: feasible.len(),
            min_feasible: feasible.iter().copied().reduce(f64::min),
            mean_feasible: mean(&feasible),
            max_feasible: feasible.iter().copied().reduce(f64::max),
            mean_infeasible: mean(&infeasible),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Terminal population, sorted best-first.
    pub population: Vec<I>,

    /// The best individual (`population[0]`).
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of generations executed after initialization.
    pub generations: usize,

    pub termination: Termination,

    /// Seed of the run generator; replays the run when set in the config.
    pub seed: u64,

    /// Best fitness of the initial population and after each generation.
    pub fitness_history: Vec<I::Fitness>,

    /// Statistics of the initial population and after each generation.
    pub stats: Vec<GenerationStats>,
}

impl<I: Individual> GaResult<I> {
    /// Individuals of the terminal population with feasible fitness.
    pub fn feasible_count(&self) -> usize {
        self.population
            .iter()
            .filter(|ind| ind.fitness().is_feasible())
            .count()
    }
}

/// Executes the GA evolutionary loop.
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA from a random initial population.
    ///
    /// # Errors
    /// Returns the configuration error if [`GaConfig::validate`] fails.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_seeded(problem, config, Vec::new(), None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the current population.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_seeded(problem, config, Vec::new(), cancel)
    }

    /// Runs the GA warm-started from seed individuals.
    ///
    /// Seeds fill the first slots of the initial population (at most
    /// `population_size` of them). Remaining slots alternate between
    /// [`GaProblem::perturb`]ed seed copies and fresh random individuals.
    ///
    /// # Errors
    /// Returns the configuration error if [`GaConfig::validate`] fails, or
    /// the first error [`GaProblem::check_seed`] reports. Nothing is
    /// evaluated in either case.
    pub fn run_seeded<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        seeds: Vec<P::Individual>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejecting GA configuration");
            return Err(err);
        }
        for (index, individual) in seeds.iter().enumerate() {
            if let Err(err) = problem.check_seed(individual) {
                warn!(index, %err, "rejecting warm-start seed");
                return Err(err);
            }
        }

        let seed = config.seed.unwrap_or_else(fresh_seed);
        let mut rng = create_rng(seed);
        let size = config.population_size;
        let started = Instant::now();

        info!(
            seed,
            population = size,
            max_generations = config.max_generations,
            seeds = seeds.len(),
            "GA run started"
        );

        // 1. Initialize population
        let mut population: Vec<P::Individual> = Vec::with_capacity(size);
        population.extend(seeds.iter().take(size).cloned());
        let mut slot = 0usize;
        while population.len() < size {
            let individual = if !seeds.is_empty() && slot % 2 == 0 {
                problem.perturb(&seeds[(slot / 2) % seeds.len()], &mut rng)
            } else {
                problem.create_individual(&mut rng)
            };
            population.push(individual);
            slot += 1;
        }

        // 2. Evaluate and rank initial population
        evaluate_pending(problem, &mut population, config.parallel);
        sort_population(&mut population);

        let mut best_fitness = population[0].fitness();
        let mut fitness_history = vec![best_fitness];
        let mut stats = vec![GenerationStats::collect(0, &population)];

        let mut generations = 0usize;
        let mut stagnation_counter = 0usize;
        let mut termination = Termination::Completed;

        // 3. Evolutionary loop
        for gen in 0..config.max_generations {
            if cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                termination = Termination::Cancelled;
                break;
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    termination = Termination::TimedOut;
                    break;
                }
            }

            // Elites are already evaluated and sorted first.
            let mut next_gen: Vec<P::Individual> = population[..config.elite_count].to_vec();

            while next_gen.len() < size {
                let p1_idx = config.selection.select(&population, &mut rng);
                let p2_idx = config.selection.select(&population, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1_idx], &population[p2_idx], &mut rng)
                } else {
                    vec![population[p1_idx].clone(), population[p2_idx].clone()]
                };

                for mut child in children {
                    if next_gen.len() >= size {
                        break;
                    }
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    next_gen.push(child);
                }
            }

            // Barrier: every child is scored before the next ranking.
            evaluate_pending(problem, &mut next_gen, config.parallel);
            sort_population(&mut next_gen);
            population = next_gen;
            generations = gen + 1;

            let gen_best = population[0].fitness();
            if gen_best < best_fitness {
                best_fitness = gen_best;
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            fitness_history.push(gen_best);

            let gen_stats = GenerationStats::collect(generations, &population);
            debug!(
                generation = generations,
                best = gen_stats.best,
                feasible = gen_stats.feasible_count,
                "generation complete"
            );
            stats.push(gen_stats);

            problem.on_generation(generations, &population[0]);

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                termination = Termination::Stagnated;
                break;
            }
        }

        let best = population[0].clone();
        let best_fitness = best.fitness();
        info!(
            generations,
            termination = ?termination,
            best = best_fitness.to_f64(),
            feasible = best_fitness.is_feasible(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GA run finished"
        );

        Ok(GaResult {
            population,
            best,
            best_fitness,
            generations,
            termination,
            seed,
            fitness_history,
            stats,
        })
    }
}

/// Evaluates every individual that has no evaluation record yet.
#[cfg(feature = "parallel")]
fn evaluate_pending<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    if parallel {
        population
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .for_each(|ind| problem.evaluate(ind));
    } else {
        evaluate_sequential(problem, population);
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_pending<P: GaProblem>(problem: &P, population: &mut [P::Individual], _parallel: bool) {
    evaluate_sequential(problem, population);
}

fn evaluate_sequential<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
        problem.evaluate(ind);
    }
}

/// Stable sort, best first.
fn sort_population<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        a.fitness()
            .partial_cmp(&b.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ============================================================================
// Tests
// ============================================================================

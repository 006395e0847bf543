//! Repeated runs: seed sweeps and material comparisons.

use super::problem::DesignProblem;
use super::result::RunResult;
use super::{run, RunRequest};
use crate::error::ConfigError;
use crate::ga::Individual;
use crate::material::Material;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// Results of one request run under several seeds.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One result per seed, in the order the seeds were given.
    pub runs: Vec<RunResult>,
    /// Index of the best run under the feasibility-first order.
    pub best: usize,
}

impl BatchReport {
    pub fn best(&self) -> &RunResult {
        &self.runs[self.best]
    }

    pub fn feasible_runs(&self) -> usize {
        self.runs.iter().filter(|r| r.is_feasible()).count()
    }
}

/// Runs the same request once per seed.
///
/// Runs are independent and execute concurrently when the request's config
/// enables parallelism. Each result is identical to a single [`run`] with
/// that seed.
///
/// # Errors
///
/// An empty seed list, or any error the request itself would raise.
pub fn run_seeds(request: &RunRequest, seeds: &[u64]) -> Result<BatchReport, ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::InvalidParameter {
            field: "seeds",
            message: "at least one seed is required".into(),
        });
    }
    // Fail once, up front, instead of once per seed.
    DesignProblem::new(
        request.design_space.clone(),
        request.model.clone(),
        &request.config,
    )?;
    request.seed_candidates()?;

    info!(
        component = %request.design_space.component(),
        runs = seeds.len(),
        "seed sweep started"
    );

    let run_one = |&seed: &u64| {
        let mut req = request.clone();
        req.config.seed = Some(seed);
        run(&req)
    };
    let runs = sweep(seeds, request.config.parallel, run_one)?;

    let best = best_index(&runs);
    let report = BatchReport { runs, best };
    info!(
        best_seed = report.best().seed,
        feasible_runs = report.feasible_runs(),
        "seed sweep finished"
    );
    Ok(report)
}

#[cfg(feature = "parallel")]
fn sweep<F>(seeds: &[u64], parallel: bool, run_one: F) -> Result<Vec<RunResult>, ConfigError>
where
    F: Fn(&u64) -> Result<RunResult, ConfigError> + Sync + Send,
{
    if parallel {
        seeds.par_iter().map(run_one).collect()
    } else {
        seeds.iter().map(run_one).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn sweep<F>(seeds: &[u64], _parallel: bool, run_one: F) -> Result<Vec<RunResult>, ConfigError>
where
    F: Fn(&u64) -> Result<RunResult, ConfigError>,
{
    seeds.iter().map(run_one).collect()
}

fn best_index(runs: &[RunResult]) -> usize {
    runs.iter()
        .enumerate()
        .reduce(|best, cur| {
            if cur.1.best.fitness() < best.1.best.fitness() {
                cur
            } else {
                best
            }
        })
        .map_or(0, |(i, _)| i)
}

/// One entry of a material comparison.
#[derive(Debug, Clone)]
pub struct MaterialRanking {
    pub material: String,
    pub result: RunResult,
}

/// Compact view of a ranking, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub material: String,
    pub best_mass_kg: Option<f64>,
    pub feasible: bool,
    pub total_violation: f64,
}

impl MaterialRanking {
    pub fn row(&self) -> MaterialRow {
        MaterialRow {
            material: self.material.clone(),
            best_mass_kg: self.result.best_mass_kg(),
            feasible: self.result.is_feasible(),
            total_violation: self.result.total_violation(),
        }
    }
}

/// Runs the request once per material and ranks the outcomes, lightest
/// feasible design first.
///
/// Swapping between solid and lattice materials changes the number of
/// design variables, so the request's warm-start seeds are not used.
///
/// # Errors
///
/// An empty material list, an invalid material, or any error the request
/// itself would raise.
pub fn compare_materials(
    request: &RunRequest,
    materials: Vec<Material>,
) -> Result<Vec<MaterialRanking>, ConfigError> {
    if materials.is_empty() {
        return Err(ConfigError::InvalidParameter {
            field: "materials",
            message: "at least one material is required".into(),
        });
    }

    let mut rankings = Vec::with_capacity(materials.len());
    for material in materials {
        let name = material.name.clone();
        let space = request.design_space.clone().with_material(material)?;
        let req = RunRequest {
            design_space: space,
            model: request.model.clone(),
            config: request.config.clone(),
            seeds: Vec::new(),
        };
        let result = run(&req)?;
        rankings.push(MaterialRanking {
            material: name,
            result,
        });
    }
    rankings.sort_by(|a, b| a.result.best.fitness().cmp(&b.result.best.fitness()));
    Ok(rankings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::ComponentKind;
    use crate::ga::GaConfig;

    fn quick(seed: u64) -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_max_generations(10)
            .with_seed(seed)
            .with_parallel(false)
    }

    #[test]
    fn test_empty_seed_list() {
        let request = RunRequest::preset(ComponentKind::Piston);
        assert!(matches!(
            run_seeds(&request, &[]),
            Err(ConfigError::InvalidParameter { field: "seeds", .. })
        ));
    }

    #[test]
    fn test_sweep_matches_single_runs() {
        let request = RunRequest::preset(ComponentKind::ConnectingRod).with_config(quick(0));
        let report = run_seeds(&request, &[3, 4, 5]).unwrap();
        assert_eq!(report.runs.len(), 3);
        assert_eq!(
            report.runs.iter().map(|r| r.seed).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );

        let single = run(&request.clone().with_config(quick(4))).unwrap();
        assert_eq!(report.runs[1].best.values(), single.best.values());

        let best = report.best().best.fitness();
        assert!(report.runs.iter().all(|r| best <= r.best.fitness()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_sweep_matches_sequential() {
        let request = RunRequest::preset(ComponentKind::Piston).with_config(quick(0));
        let sequential = run_seeds(&request, &[1, 2]).unwrap();
        let parallel = run_seeds(
            &request.clone().with_config(quick(0).with_parallel(true)),
            &[1, 2],
        )
        .unwrap();
        for (a, b) in sequential.runs.iter().zip(&parallel.runs) {
            assert_eq!(a.best.values(), b.best.values());
        }
        assert_eq!(sequential.best, parallel.best);
    }

    #[test]
    fn test_sweep_rejects_bad_request_once() {
        let request = RunRequest::preset(ComponentKind::Piston)
            .with_config(quick(0).with_population_size(0));
        assert!(run_seeds(&request, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_compare_materials_ranks_feasible_lightest_first() {
        let request = RunRequest::preset(ComponentKind::ConnectingRod).with_config(quick(9));
        let rankings = compare_materials(
            &request,
            vec![
                Material::steel_4340(),
                Material::steel_300m(),
                Material::aluminum_7075_t6(),
            ],
        )
        .unwrap();
        assert_eq!(rankings.len(), 3);
        for pair in rankings.windows(2) {
            let (a, b) = (&pair[0].result.best, &pair[1].result.best);
            assert!(a.fitness() <= b.fitness());
        }
        let rows: Vec<MaterialRow> = rankings.iter().map(MaterialRanking::row).collect();
        let steel = Material::steel_4340().name;
        assert!(rows.iter().any(|r| r.material == steel));
        assert!(serde_json::to_string(&rows).is_ok());
    }

    #[test]
    fn test_compare_materials_ignores_seeds() {
        let request = RunRequest::preset(ComponentKind::Piston)
            .with_config(quick(2))
            .with_seed_vector(vec![0.0]);
        let rankings = compare_materials(&request, vec![Material::aluminum_a356_t6()]).unwrap();
        assert_eq!(rankings.len(), 1);
    }

    #[test]
    fn test_compare_materials_requires_materials() {
        let request = RunRequest::preset(ComponentKind::Piston);
        assert!(compare_materials(&request, Vec::new()).is_err());
    }
}

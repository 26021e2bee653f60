//! Genetic algorithm over QUBO coefficient vectors.
//!
//! # Generations
//!
//! Generation 0 is a population of coefficient vectors drawn uniformly from
//! the coefficient bounds. Each following generation keeps the `elite_count`
//! best individuals unchanged and fills the rest with offspring: parents are
//! picked by tournament, combined by crossover, mutated, and clamped back
//! into the bounds. The population is kept sorted by badness, so the best
//! badness never increases from one generation to the next.
//!
//! The run stops when
//! - the best individual separates the table (after `polish_generations`
//!   additional generations spent widening the gap),
//! - `max_generations` generations have been evolved, or
//! - the best badness has not improved for `stall_generations` generations.
//!
//! # Randomness
//!
//! Every individual of every generation draws from its own [`ChaCha8Rng`]
//! stream derived from the configured seed, the generation and its position
//! in the population. Offspring are bred and scored in parallel, yet a run is
//! fully determined by its seed.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::badness::{badness, is_separating};
use crate::basis::BasisMatrix;
use crate::error::{Error, Result};
use crate::qubo::{Qubo, Separation};
use crate::truth_table::TruthTable;
use crate::types::{CoeffBounds, Completion};
use crate::utils::slot_at;

/// Genetic algorithm settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Maximum number of generations evolved after the initial one.
    pub max_generations: usize,
    /// Number of contestants per parent selection.
    pub tournament_size: usize,
    /// Probability that a child combines two parents rather than copying one.
    pub crossover_rate: f64,
    /// Per-coefficient mutation probability.
    pub mutation_rate: f64,
    /// Largest mutation step, as a fraction of the bound width.
    pub mutation_scale: f64,
    /// Number of best individuals copied unchanged into the next generation.
    pub elite_count: usize,
    /// Give up once the best badness has not improved for this many generations.
    pub stall_generations: Option<usize>,
    /// Extra generations run after the first separating one.
    pub polish_generations: usize,
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            tournament_size: 3,
            crossover_rate: 0.9,
            mutation_rate: 0.2,
            mutation_scale: 0.1,
            elite_count: 2,
            stall_generations: None,
            polish_generations: 0,
            seed: 0,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidConfig(msg));
        if self.population_size < 2 {
            return fail(format!("population size must be at least 2, got {}", self.population_size));
        }
        if self.tournament_size == 0 {
            return fail("tournament size must be positive".to_string());
        }
        if self.elite_count == 0 || self.elite_count >= self.population_size {
            return fail(format!(
                "elite count must be in 1..{}, got {}",
                self.population_size, self.elite_count
            ));
        }
        for (name, p) in [("crossover rate", self.crossover_rate), ("mutation rate", self.mutation_rate)] {
            if !(0.0..=1.0).contains(&p) {
                return fail(format!("{} must be a probability, got {}", name, p));
            }
        }
        if !(self.mutation_scale.is_finite() && self.mutation_scale > 0.0) {
            return fail(format!("mutation scale must be positive, got {}", self.mutation_scale));
        }
        Ok(())
    }
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub qubo: Qubo,
    pub separation: Separation,
    pub badness: f64,
}

impl Individual {
    pub fn is_separating(&self) -> bool {
        is_separating(self.badness)
    }
}

/// Result of one genetic-algorithm run.
#[derive(Debug, Clone)]
pub struct GaOutcome {
    /// Best individual seen during the run.
    pub best: Individual,
    /// Index of the last generation evolved (0 if only the initial population was scored).
    pub generations: usize,
    /// First generation whose best individual separated the table.
    pub separated_gen: Option<usize>,
    /// Best badness after each generation, starting with generation 0.
    pub history: Vec<f64>,
}

/// Genetic optimizer bound to one basis matrix and truth table.
pub struct Optimizer<'a> {
    basis: &'a BasisMatrix,
    table: &'a TruthTable,
    bounds: &'a CoeffBounds,
    completion: Completion,
    config: &'a GaConfig,
}

impl<'a> Optimizer<'a> {
    pub fn new(
        basis: &'a BasisMatrix,
        table: &'a TruthTable,
        bounds: &'a CoeffBounds,
        completion: Completion,
        config: &'a GaConfig,
    ) -> Result<Self> {
        bounds.validate()?;
        config.validate()?;
        if basis.num_visible() != table.num_cols() {
            return Err(Error::BasisMismatch {
                qubo: table.num_cols() + basis.num_anc(),
                basis: basis.num_vars(),
            });
        }
        Ok(Self {
            basis,
            table,
            bounds,
            completion,
            config,
        })
    }

    /// Runs the genetic algorithm from a fresh random population.
    pub fn run(&self) -> Result<GaOutcome> {
        let size = self.config.population_size;
        let elite = self.config.elite_count;

        let mut population: Vec<Individual> = (0..size)
            .into_par_iter()
            .map(|i| {
                let mut rng = self.stream(0, i);
                self.score(self.random_coeffs(&mut rng))
            })
            .collect::<Result<_>>()?;
        sort_by_badness(&mut population);

        let mut best = population[0].clone();
        let mut history = vec![best.badness];
        let mut separated_gen = best.is_separating().then_some(0);
        let mut last_improvement = 0;
        let mut generation = 0;
        debug!(
            "ga: generation 0: best badness {} (gap {})",
            best.badness, best.separation.gap
        );

        loop {
            if let Some(first) = separated_gen {
                if generation >= first + self.config.polish_generations {
                    break;
                }
            }
            if generation >= self.config.max_generations {
                break;
            }
            if let Some(stall) = self.config.stall_generations {
                if generation - last_improvement >= stall {
                    debug!("ga: no improvement for {} generations, giving up", stall);
                    break;
                }
            }
            generation += 1;

            let parents = &population;
            let offspring: Vec<Individual> = (elite..size)
                .into_par_iter()
                .map(|i| {
                    let mut rng = self.stream(generation, i);
                    self.score(self.breed(parents, &mut rng))
                })
                .collect::<Result<_>>()?;

            population.truncate(elite);
            population.extend(offspring);
            sort_by_badness(&mut population);

            if population[0].badness < best.badness {
                best = population[0].clone();
                last_improvement = generation;
            }
            history.push(best.badness);
            if separated_gen.is_none() && best.is_separating() {
                debug!("ga: separated at generation {}", generation);
                separated_gen = Some(generation);
            }
            debug!(
                "ga: generation {}: best badness {} (gap {})",
                generation, best.badness, best.separation.gap
            );
        }

        Ok(GaOutcome {
            best,
            generations: generation,
            separated_gen,
            history,
        })
    }

    /// Scores a coefficient vector.
    pub fn score(&self, coeffs: Vec<f64>) -> Result<Individual> {
        let qubo = Qubo::new(self.basis.num_vars(), coeffs)?;
        let separation = qubo.separation(self.basis, self.table, self.completion)?;
        Ok(Individual {
            badness: badness(&separation),
            qubo,
            separation,
        })
    }

    /// Independent random stream for individual `index` of generation `generation`.
    fn stream(&self, generation: usize, index: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        rng.set_stream((generation * self.config.population_size + index) as u64);
        rng
    }

    fn random_coeffs(&self, rng: &mut impl Rng) -> Vec<f64> {
        let n = self.basis.num_vars();
        (0..self.basis.num_coeffs())
            .map(|k| {
                let kind = slot_at(k, n).kind();
                let (min, _) = self.bounds.range(kind);
                // Unit draw scaled by the width; finite for any validated bounds.
                self.bounds.clamp(kind, min + rng.random::<f64>() * self.bounds.width(kind))
            })
            .collect()
    }

    /// Index of the tournament winner. Relies on `population` being sorted by badness.
    fn tournament(&self, population: &[Individual], rng: &mut impl Rng) -> usize {
        (0..self.config.tournament_size)
            .map(|_| rng.random_range(0..population.len()))
            .min()
            .unwrap_or(0)
    }

    fn breed(&self, population: &[Individual], rng: &mut impl Rng) -> Vec<f64> {
        let a = population[self.tournament(population, rng)].qubo.coeffs();
        let mut child = if rng.random_bool(self.config.crossover_rate) {
            let b = population[self.tournament(population, rng)].qubo.coeffs();
            crossover(a, b, rng)
        } else {
            a.to_vec()
        };
        self.mutate(&mut child, rng);
        child
    }

    fn mutate(&self, coeffs: &mut [f64], rng: &mut impl Rng) {
        let n = self.basis.num_vars();
        for (k, c) in coeffs.iter_mut().enumerate() {
            if rng.random_bool(self.config.mutation_rate) {
                let kind = slot_at(k, n).kind();
                let width = self.bounds.width(kind);
                let step = (self.config.mutation_scale * width).min(width);
                let delta = step * rng.random_range(-1.0..=1.0);
                *c = self.bounds.clamp(kind, *c + delta);
            }
        }
    }
}

/// Per coefficient: take it from either parent or blend the two.
fn crossover(a: &[f64], b: &[f64], rng: &mut impl Rng) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| match rng.random_range(0..3) {
            0 => x,
            1 => y,
            _ => {
                let t: f64 = rng.random();
                x + t * (y - x)
            }
        })
        .collect()
}

fn sort_by_badness(population: &mut [Individual]) {
    population.sort_by(|a, b| a.badness.total_cmp(&b.badness));
}

//! Functions related to reproducing on the specie and global population scale.

use crate::{
    error::NeatError,
    genome::Genome,
    random::EvolutionEvent,
    specie::Specie,
    trainer::{Context, Trainer},
};
use rand::{Rng, RngCore};

/// Select a random item with probability proportional to its weight. Fails when the weights
/// don't sum to something positive, as no item can then be fairly picked.
pub fn weighted_random<'a, T>(
    items: &'a [T],
    weight: impl Fn(&T) -> f64,
    rng: &mut impl RngCore,
) -> Result<&'a T, NeatError> {
    let exhausted = |total| NeatError::SelectionExhausted {
        total,
        candidates: items.len(),
    };

    let total = items.iter().map(&weight).sum::<f64>();
    if !(total > 0. && total.is_finite()) {
        return Err(exhausted(total));
    }

    let threshold = rng.random::<f64>() * total;
    let mut acc = 0.;
    for item in items {
        let w = weight(item);
        acc += w;
        if w > 0. && acc >= threshold {
            return Ok(item);
        }
    }

    Err(exhausted(total))
}

/// Split `needed` offspring between species, proportionally to each one's share of the summed
/// positive averages and always rounding down. A `None` or non-positive average is given
/// nothing and doesn't count towards the sum.
pub fn population_alloc(averages: &[Option<f64>], needed: usize) -> Vec<usize> {
    let sum = averages
        .iter()
        .flatten()
        .filter(|avg| **avg > 0.)
        .sum::<f64>();
    averages
        .iter()
        .map(|avg| match avg.map(|a| a / sum) {
            Some(share) if share.is_finite() && share > 0. => {
                ((share * needed as f64).floor() as usize).min(needed)
            }
            _ => 0,
        })
        .collect()
}

/// Produce `quota` offspring from `species[idx]`: some bred by crossover and the rest cloned,
/// each then mutated at the configured odds. Mates are rarely picked from another specie,
/// weighted by each specie's average fitness.
pub fn offspring_for_specie<T: Trainer, R: RngCore>(
    trainer: &T,
    ctx: &mut Context<R>,
    species: &[Specie],
    idx: usize,
    quota: usize,
) -> Result<Vec<Genome>, NeatError> {
    let specie = &species[idx];
    let n_crossover = (ctx.stats().percent_offspring_from_crossover * quota as f64) as usize;
    let mut offspring = Vec::with_capacity(quota);

    for _ in 0..n_crossover.min(quota) {
        let l = weighted_random(&specie.members, |g| g.fitness, &mut ctx.rng)?;

        let mate_specie = if ctx.happens(EvolutionEvent::Interspecies) {
            weighted_random(species, Specie::average_fitness, &mut ctx.rng)?
        } else {
            specie
        };
        let r = weighted_random(&mate_specie.members, |g| g.fitness, &mut ctx.rng)?;

        let child = if l.fitness >= r.fitness {
            trainer.crossover(l, r, ctx)
        } else {
            trainer.crossover(r, l, ctx)
        };
        offspring.push(child);
    }

    while offspring.len() < quota {
        let parent = weighted_random(&specie.members, |g| g.fitness, &mut ctx.rng)?;
        let id = ctx.next_genome_id();
        offspring.push(parent.clone_as(id));
    }

    for child in offspring.iter_mut() {
        if ctx.happens(EvolutionEvent::Mutate) {
            trainer.mutate(child, ctx);
        }
    }

    Ok(offspring)
}

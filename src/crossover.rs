//! Gene alignment between two genomes: compatibility distance and crossover reproduction.
//! Every function here requires both gene lists sorted by innovation id.

use crate::{
    constants::{
        NEATGEN_CROSSOVER_ENABLE_PROB, NEATGEN_CROSSOVER_PICK_FITTER_PROB,
        NEATGEN_NORMALIZATION_THRESHOLD,
    },
    genome::{BaseTemplate, ConnectionGene, Genome, GenomeId},
    random::Happens,
};
use core::cmp::Ordering;
use rand::RngCore;
use std::sync::Arc;

/// One step of a linear walk over two innovation-sorted gene lists
#[derive(Debug, Clone, Copy)]
pub enum Aligned<'a> {
    Matching(&'a ConnectionGene, &'a ConnectionGene),
    /// unique to the left side, within the right side's innovation range
    DisjointL(&'a ConnectionGene),
    DisjointR(&'a ConnectionGene),
    /// unique to the left side, past the end of the right side
    ExcessL(&'a ConnectionGene),
    ExcessR(&'a ConnectionGene),
}

/// Walk two innovation-sorted gene lists in lockstep
pub fn align<'a>(
    l: &'a [ConnectionGene],
    r: &'a [ConnectionGene],
) -> impl Iterator<Item = Aligned<'a>> + 'a {
    let (mut l_idx, mut r_idx) = (0, 0);
    core::iter::from_fn(move || {
        let step = match (l.get(l_idx), r.get(r_idx)) {
            (None, None) => return None,
            (Some(lc), None) => {
                l_idx += 1;
                Aligned::ExcessL(lc)
            }
            (None, Some(rc)) => {
                r_idx += 1;
                Aligned::ExcessR(rc)
            }
            (Some(lc), Some(rc)) => match lc.inno().cmp(&rc.inno()) {
                Ordering::Equal => {
                    l_idx += 1;
                    r_idx += 1;
                    Aligned::Matching(lc, rc)
                }
                Ordering::Less => {
                    l_idx += 1;
                    Aligned::DisjointL(lc)
                }
                Ordering::Greater => {
                    r_idx += 1;
                    Aligned::DisjointR(rc)
                }
            },
        };
        Some(step)
    })
}

/// (disjoint, excess) gene counts between `l` and `r`
pub fn disjoint_excess_count(l: &[ConnectionGene], r: &[ConnectionGene]) -> (usize, usize) {
    align(l, r).fold((0, 0), |(disjoint, excess), step| match step {
        Aligned::Matching(..) => (disjoint, excess),
        Aligned::DisjointL(_) | Aligned::DisjointR(_) => (disjoint + 1, excess),
        Aligned::ExcessL(_) | Aligned::ExcessR(_) => (disjoint, excess + 1),
    })
}

/// Mean absolute weight difference over matching genes. NaN if no genes match.
pub fn avg_param_diff(l: &[ConnectionGene], r: &[ConnectionGene]) -> f64 {
    let (count, sum) = align(l, r).fold((0usize, 0.), |(count, sum), step| match step {
        Aligned::Matching(lc, rc) => (count + 1, sum + lc.param_diff(rc)),
        _ => (count, sum),
    });
    sum / count as f64
}

/// Compatibility distance `c1·E/N + c2·D/N + c3·W`, W being [avg_param_diff] or 0 without
/// matching genes. N is the longer gene count, or 1 for genomes smaller than
/// [NEATGEN_NORMALIZATION_THRESHOLD].
pub fn delta(l: &[ConnectionGene], r: &[ConnectionGene], c1: f64, c2: f64, c3: f64) -> f64 {
    let n = match l.len().max(r.len()) {
        n if n < NEATGEN_NORMALIZATION_THRESHOLD => 1.,
        n => n as f64,
    };
    let (disjoint, excess) = disjoint_excess_count(l, r);
    let avg_w = match avg_param_diff(l, r) {
        w if w.is_nan() => 0.,
        w => w,
    };

    c1 * excess as f64 / n + c2 * disjoint as f64 / n + c3 * avg_w
}

/// Cross the genes of `fitter` with those of `other`. Matching genes are taken from a random
/// parent; genes unique to `fitter` are inherited and genes unique to `other` are dropped. A
/// matching gene enabled in exactly one parent stays enabled at a fixed low odds.
pub fn crossover(
    fitter: &[ConnectionGene],
    other: &[ConnectionGene],
    rng: &mut impl RngCore,
) -> Vec<ConnectionGene> {
    align(fitter, other)
        .filter_map(|step| match step {
            Aligned::Matching(l, r) => {
                let mut gene = if rng.happens(NEATGEN_CROSSOVER_PICK_FITTER_PROB) {
                    l.clone()
                } else {
                    r.clone()
                };
                gene.enabled = match (l.enabled(), r.enabled()) {
                    (true, true) => true,
                    (false, false) => false,
                    _ => rng.happens(NEATGEN_CROSSOVER_ENABLE_PROB),
                };
                Some(gene)
            }
            Aligned::DisjointL(l) | Aligned::ExcessL(l) => Some(l.clone()),
            Aligned::DisjointR(_) | Aligned::ExcessR(_) => None,
        })
        .collect()
}

/// The template of a child of `l` and `r`, sharing `l`'s when both are identical
pub fn forge_template(l: &Arc<BaseTemplate>, r: &Arc<BaseTemplate>) -> Arc<BaseTemplate> {
    if l == r {
        l.clone()
    } else {
        Arc::new(l.forge(r))
    }
}

/// A new genome `id`, bred from `fitter` and `other`
pub fn offspring(
    id: GenomeId,
    fitter: &Genome,
    other: &Genome,
    rng: &mut impl RngCore,
) -> Genome {
    Genome::from_connections(
        id,
        forge_template(fitter.template(), other.template()),
        crossover(fitter.connections(), other.connections(), rng),
    )
}

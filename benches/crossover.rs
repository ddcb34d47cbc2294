use criterion::Criterion;
use neatgen::{
    crossover::{crossover, delta, disjoint_excess_count, offspring},
    random::default_rng,
    BaseTemplate, Context, Genome, Stats, Trainer, View, WyRng,
};
use rand::SeedableRng;
use std::sync::Arc;

struct Grow(Arc<BaseTemplate>);

impl Trainer for Grow {
    fn template(&self) -> &Arc<BaseTemplate> {
        &self.0
    }

    fn fitness(&self, _: &Genome, _: &View<'_>) -> f64 {
        1.
    }
}

/// two genomes sharing some history, grown apart by many structural mutations
fn pair() -> (Genome, Genome) {
    let trainer = Grow(Arc::new(BaseTemplate::biased(8, 4)));
    let mut ctx = Context::new(Stats::default(), WyRng::seed_from_u64(0));
    let root = trainer.random_genome(&mut ctx);
    let mut grow = |mut genome: Genome| {
        for _ in 0..200 {
            trainer.add_connection(&mut genome, &mut ctx);
            if genome.connections().len() % 4 == 0 {
                trainer.add_node(&mut genome, &mut ctx);
            }
        }
        genome
    };
    let l = grow(root.clone_as(1));
    let r = grow(root.clone_as(2));
    (l, r)
}

fn bench_crossover(bench: &mut Criterion) {
    let (l, r) = pair();
    let mut rng = default_rng();

    bench.bench_function("crossover", |b| {
        b.iter(|| crossover(l.connections(), r.connections(), &mut rng))
    });

    bench.bench_function("offspring", |b| b.iter(|| offspring(3, &l, &r, &mut rng)));

    bench.bench_function("disjoint-excess-count", |b| {
        b.iter(|| disjoint_excess_count(l.connections(), r.connections()))
    });

    bench.bench_function("delta", |b| {
        b.iter(|| delta(l.connections(), r.connections(), 1., 1., 0.4))
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(1000)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_crossover(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}

use criterion::Criterion;
use neatgen::{activate::relu, BaseTemplate, Context, Genome, Network, Stats, Trainer, View, WyRng};
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

fn bench_nn(bench: &mut Criterion) {
    let trainer = Grow(Arc::new(BaseTemplate::biased(2, 1)));
    let mut ctx = Context::new(Stats::default(), WyRng::seed_from_u64(0));
    let mut genome = trainer.random_genome(&mut ctx);
    for _ in 0..100 {
        trainer.add_connection(&mut genome, &mut ctx);
        trainer.add_node(&mut genome, &mut ctx);
    }
    let i = [0.7, 0.3];

    bench.bench_function("nn-build", |b| b.iter(|| genome.network()));

    let mut net = genome.network().with_activation(relu);
    bench.bench_function("nn-calculate", |b| {
        b.iter(|| net.calculate_inputs(&i).map(|o| o[0]))
    });

    bench.bench_function("nn-flush", |b| b.iter(|| net.flush()));
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
    bench_nn(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}

use approx::relative_eq;
use core::ops::ControlFlow;
use neatgen::{
    evolve, scenario::Evaluate, EvolutionTarget, Hook, Neat, Network, NeuralNetwork, Scenario,
    Stats,
};
use tracing::info;

const POPULATION: usize = 150;
const CASES: [([f64; 2], f64); 4] = [
    ([0., 0.], 0.),
    ([0., 1.], 1.),
    ([1., 0.], 1.),
    ([1., 1.], 0.),
];

struct Xor;

impl Xor {
    fn solved(network: &mut NeuralNetwork) -> bool {
        CASES.iter().all(|(pair, want)| {
            network
                .calculate_inputs(pair)
                .is_ok_and(|out| relative_eq!(out[0], *want, epsilon = 0.5 - f64::EPSILON))
        })
    }
}

impl Scenario for Xor {
    fn io() -> (usize, usize) {
        (2, 1)
    }

    fn eval(&self, network: &mut NeuralNetwork) -> f64 {
        let error = CASES
            .iter()
            .map(|(pair, want)| match network.calculate_inputs(pair) {
                Ok(out) => (want - out[0]).abs(),
                Err(_) => 1.,
            })
            .sum::<f64>();
        network.flush();
        (4. - error).powi(2)
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let mut neat = match Neat::seeded(POPULATION, Evaluate::new(Xor), Stats::default(), seed) {
        Ok(neat) => neat,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let report: Hook<'_, Evaluate<Xor>> = Box::new(|neat: &Neat<Evaluate<Xor>>| {
        if let Ok(snapshot) = neat.snapshot() {
            if snapshot.generation % 10 == 0 {
                info!(
                    generation = snapshot.generation,
                    species = snapshot.species.len(),
                    best = snapshot.best_fitness,
                    hidden = snapshot.mean_hidden,
                    "progress"
                );
            }
        }
        match neat.fittest() {
            Some(g) if Xor::solved(&mut g.network()) => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    });

    match evolve(&mut neat, EvolutionTarget::Generation(500), vec![report]) {
        Ok(generation) => {
            if let Some(fittest) = neat.fittest() {
                println!("fittest of gen {generation}: {:.4}", fittest.fitness);
                println!("{fittest}");
                let mut network = fittest.network();
                for (pair, want) in CASES {
                    let out = network.calculate_inputs(&pair).map_or(f64::NAN, |o| o[0]);
                    println!("{pair:?} -> {out:.4} (want {want})");
                }
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}

//! Minimizes the Rosenbrock function with fixed-step gradient descent.
//!
//! ```bash
//! RUST_LOG=info cargo run -p cadence-algorithms --example rosenbrock
//! ```

use std::{convert::Infallible, error::Error, time::Duration};

use cadence_algorithms::{
    DifferentiableProblem,
    gradient_descent::{Config, DescentState, GradientDescent, GradientNormBelow, Options},
};
use cadence_core::{
    Algorithm, Criterion, Event, State, initialize_state, solve_in_place_observed, summary,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// f(x, y) = (a - x)² + b (y - x²)², with its minimum at (a, a²).
struct Rosenbrock {
    a: f64,
    b: f64,
}

impl DifferentiableProblem<2> for Rosenbrock {
    type Error = Infallible;

    fn cost(&self, [x, y]: &[f64; 2]) -> Result<f64, Self::Error> {
        Ok((self.a - x).powi(2) + self.b * (y - x * x).powi(2))
    }

    fn gradient(&self, [x, y]: &[f64; 2]) -> Result<[f64; 2], Self::Error> {
        let valley = y - x * x;
        Ok([
            -2.0 * (self.a - x) - 4.0 * self.b * x * valley,
            2.0 * self.b * valley,
        ])
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let problem = Rosenbrock { a: 1.0, b: 100.0 };
    let criterion = Criterion::rule(GradientNormBelow::new(1e-6)?)
        | Criterion::after_iteration(200_000)
        | Criterion::after_duration(Duration::from_secs(10));
    let descent = GradientDescent::new(Config::new(1e-3, 0.1)?, criterion);

    let mut state = initialize_state(&problem, &descent, Options::starting_at([-1.2, 1.0]))?;
    let evaluation = solve_in_place_observed(
        &mut state,
        &problem,
        &descent,
        |event: &Event<'_, DescentState<2>>| {
            if let Event::Stepped { iteration, state } = event {
                if iteration % 10_000 == 0 {
                    info!(iteration, cost = state.cost(), "progress");
                }
            }
        },
    )?;

    println!("{}", summary(descent.stopping_criterion(), state.stopping_criterion_state()));
    println!("stopped: {}", evaluation.reason);
    println!(
        "x = {:?}, cost = {:e}, |∇f| = {:e} after {} iterations",
        state.x(),
        state.cost(),
        state.gradient_norm(),
        state.iteration(),
    );

    Ok(())
}

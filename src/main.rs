use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use log::info;
use nalgebra::Vector2;
use ode_solver::{
  ode::{EulerSettings, RK4Settings, StepperType, SwappableStepper},
  solve_all, Body, LinearProblem, NBodyProblem, NumericVector, Problem,
  Solver, SolverConfig,
};

#[cfg(test)]
use ode_solver::Stepper;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum ProblemType {
  Linear,
  NBody,
}

#[derive(Parser)]
#[command(version = "1.0", about = "ODE Solver App")]
struct Opts {
  #[arg(short, long, value_enum, default_value_t = ProblemType::Linear)]
  problem: ProblemType,

  #[arg(short = 'd', long, default_value_t = 0.5)]
  time_step: f64,

  #[arg(short = 'n', long, default_value_t = 10)]
  max_iterations: usize,

  /// growth rate of the linear problem
  #[arg(short, long, default_value_t = 0.6, allow_negative_numbers = true)]
  lambda: f64,

  /// print every sample
  #[arg(long = "print")]
  print: bool,

  #[arg(long = "progress")]
  progress: bool,

  /// run Runge Kutta 4 and Explicit Euler side by side
  #[arg(long = "compare")]
  compare: bool,

  /// solve the linear problem for each of these comma separated rates in
  /// parallel
  #[arg(long, allow_hyphen_values = true)]
  sweep_lambda: Option<String>,

  #[command(subcommand)]
  stepper: Option<StepperType>,
}

fn linear_problem(lambda: f64) -> LinearProblem<f64> {
  LinearProblem::new(NumericVector::from_vec(vec![2.0]), 0.0, lambda)
}

fn two_body_problem() -> anyhow::Result<NBodyProblem> {
  Ok(NBodyProblem::new(
    &[
      Body::new(1.0, Vector2::zeros(), Vector2::zeros()),
      Body::new(1e-3, Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)),
    ],
    0.0,
    1.0,
    0.0,
  )?)
}

fn parse_rates(rates: &str) -> anyhow::Result<Vec<f64>> {
  rates
    .split(',')
    .map(|rate| {
      rate
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid rate {:?}: {}", rate, e))
    })
    .collect()
}

fn selected_steppers(opts: &Opts) -> Vec<SwappableStepper> {
  if opts.compare {
    vec![
      SwappableStepper::new(StepperType::RK4(RK4Settings::default())),
      SwappableStepper::new(StepperType::Euler(EulerSettings::default())),
    ]
  } else {
    vec![SwappableStepper::new(opts.stepper.clone().unwrap_or_default())]
  }
}

fn run<P: Problem + Clone>(
  problem: P,
  steppers: &[SwappableStepper],
  config: SolverConfig<P::S>,
  progress: bool,
) -> anyhow::Result<()> {
  for stepper in steppers {
    run_one(problem.clone(), *stepper, config.clone(), progress)?;
  }

  Ok(())
}

fn run_one<P: Problem>(
  problem: P,
  stepper: SwappableStepper,
  config: SolverConfig<P::S>,
  progress: bool,
) -> anyhow::Result<()> {
  let mut solver = Solver::new(problem, stepper, config)?;

  if progress {
    let p_bar = ProgressBar::new(solver.max_iterations() as u64);
    solver.solve_with(|_| p_bar.inc(1))?;
    p_bar.finish();
  } else {
    solver.solve()?;
  }

  let (time, state) = solver.last_sample();
  println!(
    "{} ({} steps): t = {}, y = {}",
    solver.name(),
    solver.iteration(),
    time,
    state
  );

  Ok(())
}

fn main() -> anyhow::Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info"),
  )
  .init();

  let opts: Opts = Opts::parse();

  let steppers = selected_steppers(&opts);
  let stepper = steppers[0];
  let config = SolverConfig::new(opts.time_step, opts.max_iterations)
    .with_trace(opts.print);

  if let Some(rates) = &opts.sweep_lambda {
    let rates = parse_rates(rates)?;
    info!("sweeping {} rates", rates.len());

    let solvers = rates
      .iter()
      .map(|lambda| {
        Solver::new(linear_problem(*lambda), stepper, config.clone())
      })
      .collect::<Result<Vec<_>, _>>()?;

    for (lambda, solver) in rates.iter().zip(solve_all(solvers)) {
      let solver = solver?;
      let (time, state) = solver.last_sample();
      println!("lambda = {}: t = {}, y = {}", lambda, time, state);
    }

    return Ok(());
  }

  match opts.problem {
    ProblemType::Linear => {
      run(linear_problem(opts.lambda), &steppers, config, opts.progress)
    }
    ProblemType::NBody => {
      run(two_body_problem()?, &steppers, config, opts.progress)
    }
  }
}

#[test]
fn rates_accept_leading_negatives() {
  assert_eq!(parse_rates("-0.5,0.6").unwrap(), vec![-0.5, 0.6]);
  assert_eq!(parse_rates("0.6, -0.5").unwrap(), vec![0.6, -0.5]);
  assert!(parse_rates("0.6,fast").is_err());
}

#[test]
fn sweep_flag_takes_negative_list() {
  let args = ["ode_solver", "--sweep-lambda", "-0.5,0.6"];
  let opts = Opts::try_parse_from(&args).unwrap();
  assert_eq!(opts.sweep_lambda.as_deref(), Some("-0.5,0.6"));
  assert_eq!(opts.stepper, None);
}

#[test]
fn compare_runs_rk4_then_euler() {
  let opts = Opts::try_parse_from(&["ode_solver", "--compare"]).unwrap();
  let names = selected_steppers(&opts)
    .iter()
    .map(|stepper| stepper.name())
    .collect::<Vec<_>>();
  assert_eq!(names, vec!["Runge Kutta 4", "Explicit Euler"]);

  let opts = Opts::try_parse_from(&["ode_solver", "euler"]).unwrap();
  let names = selected_steppers(&opts)
    .iter()
    .map(|stepper| stepper.name())
    .collect::<Vec<_>>();
  assert_eq!(names, vec!["Explicit Euler"]);
}

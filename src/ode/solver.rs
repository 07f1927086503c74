use crate::error::{OdeError, Result};
use crate::ode::{Problem, Stepper};
use crate::NumericVector;
use alga::general::RealField;
use log::{debug, info};

#[cfg(test)]
use crate::assert_float_eq;
#[cfg(test)]
use crate::ode::{Euler, Midpoint, RK4};
#[cfg(test)]
use crate::problems::LinearProblem;
#[cfg(test)]
use proptest::prelude::*;
#[cfg(test)]
use proptest_derive::Arbitrary;

pub const DEFAULT_MAX_ITERATIONS: usize = 10000;

// NaN and the infinities never cancel
fn is_finite<S: RealField>(value: S) -> bool {
  value - value == S::zero()
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig<S> {
  pub time_step: S,
  pub max_iterations: usize,
  /// Log every recorded sample.
  pub trace: bool,
}

impl<S: RealField + From<f32>> SolverConfig<S> {
  pub fn new(time_step: S, max_iterations: usize) -> Self {
    Self {
      time_step,
      max_iterations,
      trace: false,
    }
  }

  pub fn with_trace(mut self, trace: bool) -> Self {
    self.trace = trace;
    self
  }

  fn validate(&self) -> Result<()> {
    if !is_finite(self.time_step) || self.time_step <= S::zero() {
      return Err(OdeError::InvalidConfiguration(format!(
        "time step must be positive and finite, got {}",
        self.time_step
      )));
    }

    Ok(())
  }
}

impl<S: RealField + From<f32>> Default for SolverConfig<S> {
  fn default() -> Self {
    Self::new(1.0.into(), DEFAULT_MAX_ITERATIONS)
  }
}

/// Drives a [`Stepper`] against a [`Problem`] and records the append-only
/// trajectory `(t_0, y_0) ... (t_i, y_i)`.
pub struct Solver<P: Problem, St: Stepper> {
  problem: P,
  stepper: St,
  config: SolverConfig<P::S>,
  iteration: usize,
  times: Vec<P::S>,
  states: Vec<NumericVector<P::S>>,
}

impl<P: Problem, St: Stepper> Solver<P, St> {
  pub fn new(
    problem: P,
    stepper: St,
    config: SolverConfig<P::S>,
  ) -> Result<Self> {
    config.validate()?;
    problem.validate()?;

    debug!(
      "{} solver for {}: dt = {}, {} iterations",
      stepper.name(),
      problem.name(),
      config.time_step,
      config.max_iterations
    );

    let times = vec![problem.initial_time()];
    let states = vec![problem.initial_state().clone()];

    let solver = Self {
      problem,
      stepper,
      config,
      iteration: 0,
      times,
      states,
    };
    solver.trace_last();

    Ok(solver)
  }

  pub fn name(&self) -> &'static str {
    self.stepper.name()
  }

  pub fn problem(&self) -> &P {
    &self.problem
  }

  pub fn config(&self) -> &SolverConfig<P::S> {
    &self.config
  }

  pub fn time_step(&self) -> P::S {
    self.config.time_step
  }

  pub fn max_iterations(&self) -> usize {
    self.config.max_iterations
  }

  pub fn iteration(&self) -> usize {
    self.iteration
  }

  pub fn is_complete(&self) -> bool {
    self.iteration >= self.config.max_iterations
  }

  pub fn times(&self) -> &[P::S] {
    &self.times
  }

  pub fn trajectory(&self) -> &[NumericVector<P::S>] {
    &self.states
  }

  pub fn last_sample(&self) -> (P::S, &NumericVector<P::S>) {
    // the trajectory always holds at least the initial sample
    let idx = self.states.len() - 1;
    (self.times[idx], &self.states[idx])
  }

  pub fn set_trace(&mut self, trace: bool) {
    self.config.trace = trace;
  }

  fn trace_last(&self) {
    if self.config.trace {
      let (time, state) = self.last_sample();
      info!(
        "\tt_{}: {} \ty_{}: {}",
        self.iteration, time, self.iteration, state
      );
    }
  }

  /// Advances one step. Fails with [`OdeError::AlreadyComplete`] once the
  /// iteration budget is spent; a failed step records nothing.
  pub fn step(&mut self) -> Result<()> {
    if self.is_complete() {
      return Err(OdeError::AlreadyComplete {
        max_iterations: self.config.max_iterations,
      });
    }

    let (time, state) = self.last_sample();
    let time_step = self.config.time_step;
    let next_state =
      self.stepper.advance(&self.problem, time, state, time_step)?;

    self.times.push(time + time_step);
    self.states.push(next_state);
    self.iteration += 1;

    self.trace_last();

    Ok(())
  }

  /// Steps until the iteration budget is spent. The first failing step
  /// aborts the solve and keeps every sample recorded before it.
  pub fn solve(&mut self) -> Result<()> {
    self.solve_with(|_| {})
  }

  /// Like [`Solver::solve`], calling `on_step` after every recorded step.
  pub fn solve_with<F>(&mut self, mut on_step: F) -> Result<()>
  where
    F: FnMut(&Self),
  {
    info!(
      "{} method is used for {}...",
      self.stepper.name(),
      self.problem.name()
    );

    while !self.is_complete() {
      self.step()?;
      on_step(self);
    }

    let (time, state) = self.last_sample();
    info!(
      "{} finished after {} iterations: t = {}, y = {}",
      self.stepper.name(),
      self.iteration,
      time,
      state
    );

    Ok(())
  }
}

#[cfg(test)]
fn lambda_problem() -> LinearProblem<f64> {
  LinearProblem::new(NumericVector::from_vec(vec![2.0]), 0.0, 0.6)
}

#[cfg(test)]
fn final_error<St: Stepper>(stepper: St) -> f64 {
  let problem = lambda_problem();
  let expected = problem.analytic(5.0).at(0).unwrap();

  let mut solver =
    Solver::new(problem, stepper, SolverConfig::new(0.5, 10)).unwrap();
  solver.solve().unwrap();

  let (time, state) = solver.last_sample();
  assert_float_eq!(time, 5.0, 1e-12);

  (state.at(0).unwrap() - expected).abs()
}

#[test]
fn rk4_matches_analytic_solution() {
  // y(5) = 2 e^3 ~ 40.17
  let error = final_error(RK4);
  assert!(error < 0.05, "rk4 error {}", error);
}

#[test]
fn rk4_beats_euler_by_an_order_of_magnitude() {
  let euler_error = final_error(Euler);
  let midpoint_error = final_error(Midpoint);
  let rk4_error = final_error(RK4);

  assert!(rk4_error * 10.0 < euler_error);
  assert!(midpoint_error < euler_error);
  assert!(rk4_error < midpoint_error);
}

#[test]
fn euler_first_step_by_hand() {
  let mut solver =
    Solver::new(lambda_problem(), Euler, SolverConfig::new(0.5, 1)).unwrap();
  solver.step().unwrap();

  // 2 + 0.5 * 0.6 * 2
  assert_float_eq!(solver.trajectory()[1].at(0).unwrap(), 2.6, 1e-12);
}

#[test]
fn rk4_first_step_by_hand() {
  let mut solver =
    Solver::new(lambda_problem(), RK4, SolverConfig::new(0.5, 1)).unwrap();
  solver.step().unwrap();

  // y (1 + z + z^2/2 + z^3/6 + z^4/24) with z = 0.3
  let z: f64 = 0.3;
  let factor = 1.0 + z + z * z / 2.0 + z.powi(3) / 6.0 + z.powi(4) / 24.0;
  assert_float_eq!(
    solver.trajectory()[1].at(0).unwrap(),
    2.0 * factor,
    1e-12
  );
}

#[test]
fn zero_iterations() {
  let mut solver =
    Solver::new(lambda_problem(), RK4, SolverConfig::new(0.5, 0)).unwrap();

  assert!(solver.is_complete());
  solver.solve().unwrap();

  assert_eq!(solver.iteration(), 0);
  assert_eq!(solver.times(), &[0.0]);
  assert_eq!(
    solver.trajectory(),
    &[NumericVector::from_vec(vec![2.0])][..]
  );
}

#[test]
fn step_after_completion_fails() {
  let mut solver =
    Solver::new(lambda_problem(), Euler, SolverConfig::new(0.5, 2)).unwrap();
  solver.solve().unwrap();

  assert_eq!(
    solver.step(),
    Err(OdeError::AlreadyComplete { max_iterations: 2 })
  );
  assert_eq!(solver.times().len(), 3);
  assert_eq!(solver.iteration(), 2);

  // solving again is a no-op
  solver.solve().unwrap();
  assert_eq!(solver.times().len(), 3);
}

#[cfg(test)]
struct BreaksAfter {
  initial_state: NumericVector<f64>,
  break_time: f64,
}

#[cfg(test)]
impl Problem for BreaksAfter {
  type S = f64;

  fn name(&self) -> &str {
    "breaks after"
  }

  fn dimension(&self) -> usize {
    1
  }

  fn initial_time(&self) -> f64 {
    0.0
  }

  fn initial_state(&self) -> &NumericVector<f64> {
    &self.initial_state
  }

  fn evaluate(
    &self,
    t: f64,
    y: &NumericVector<f64>,
  ) -> Result<NumericVector<f64>> {
    if t >= self.break_time {
      // wrong dimension, rejected by the stepper's vector arithmetic
      Ok(NumericVector::zeros(y.dimension() + 1))
    } else {
      Ok(y.clone())
    }
  }
}

#[test]
fn failed_step_keeps_recorded_samples() {
  let problem = BreaksAfter {
    initial_state: NumericVector::from_vec(vec![1.0]),
    break_time: 1.0,
  };
  let mut solver =
    Solver::new(problem, Euler, SolverConfig::new(0.5, 10)).unwrap();

  assert_eq!(
    solver.solve(),
    Err(OdeError::DimensionMismatch { left: 1, right: 2 })
  );

  // samples at t = 0, 0.5, 1.0 were recorded, the step from 1.0 failed
  assert_eq!(solver.iteration(), 2);
  assert_eq!(solver.times(), &[0.0, 0.5, 1.0]);
  assert_eq!(solver.trajectory().len(), 3);
  assert_float_eq!(solver.trajectory()[2].at(0).unwrap(), 2.25, 1e-12);

  // the failure is not skipped over
  assert!(solver.step().is_err());
  assert_eq!(solver.iteration(), 2);
}

#[cfg(test)]
struct ThreeParticles {
  initial_state: NumericVector<f64>,
}

#[cfg(test)]
impl Problem for ThreeParticles {
  type S = f64;

  fn name(&self) -> &str {
    "three particles"
  }

  fn dimension(&self) -> usize {
    2
  }

  fn particle_count(&self) -> usize {
    3
  }

  fn initial_time(&self) -> f64 {
    0.0
  }

  fn initial_state(&self) -> &NumericVector<f64> {
    &self.initial_state
  }

  fn evaluate(
    &self,
    _: f64,
    y: &NumericVector<f64>,
  ) -> Result<NumericVector<f64>> {
    Ok(y.clone())
  }
}

#[test]
fn inconsistent_initial_state_dimension() {
  let problem = ThreeParticles {
    initial_state: NumericVector::zeros(5),
  };
  assert_eq!(problem.state_dimension(), 6);

  match Solver::new(problem, Euler, SolverConfig::new(0.5, 10)) {
    Err(OdeError::InvalidConfiguration(message)) => {
      assert!(message.contains("6 components"), "{}", message);
      assert!(message.contains("got 5"), "{}", message);
    }
    _ => panic!("5 components for 3 particles of 2 should be rejected"),
  }

  let consistent = ThreeParticles {
    initial_state: NumericVector::zeros(6),
  };
  assert!(Solver::new(consistent, Euler, SolverConfig::new(0.5, 10)).is_ok());
}

#[test]
fn solve_with_reports_every_step() {
  let config = SolverConfig::new(0.5, 4).with_trace(true);
  let mut solver = Solver::new(lambda_problem(), RK4, config).unwrap();

  let mut seen = Vec::new();
  solver
    .solve_with(|solver| seen.push((solver.iteration(), solver.times().len())))
    .unwrap();

  assert_eq!(seen, vec![(1, 2), (2, 3), (3, 4), (4, 5)]);

  let mut plain =
    Solver::new(lambda_problem(), RK4, SolverConfig::new(0.5, 4)).unwrap();
  plain.solve().unwrap();
  assert_eq!(solver.trajectory(), plain.trajectory());
}

#[test]
fn reading_is_idempotent() {
  let mut solver =
    Solver::new(lambda_problem(), RK4, SolverConfig::new(0.5, 4)).unwrap();
  solver.solve().unwrap();

  let times = solver.times().to_vec();
  let trajectory = solver.trajectory().to_vec();

  assert_eq!(solver.times(), &times[..]);
  assert_eq!(solver.trajectory(), &trajectory[..]);
}

#[test]
fn invalid_time_step() {
  for time_step in [0.0, -0.5, std::f64::NAN, std::f64::INFINITY].iter() {
    let result =
      Solver::new(lambda_problem(), RK4, SolverConfig::new(*time_step, 10));
    match result {
      Err(OdeError::InvalidConfiguration(_)) => {}
      _ => panic!("time step {} should be rejected", time_step),
    }
  }
}

#[test]
fn invalid_initial_state() {
  let problem = LinearProblem::new(NumericVector::from_vec(vec![]), 0.0, 0.6);
  match Solver::new(problem, RK4, SolverConfig::new(0.5, 10)) {
    Err(OdeError::InvalidConfiguration(_)) => {}
    _ => panic!("empty initial state should be rejected"),
  }
}

#[test]
fn default_config() {
  let config = SolverConfig::<f64>::default();
  assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
  assert_eq!(config.time_step, 1.0);
  assert!(!config.trace);
}

#[cfg(test)]
#[derive(Debug, Arbitrary)]
enum StepperOption {
  Euler,
  Midpoint,
  RK4,
}

#[cfg(test)]
impl StepperOption {
  fn run(
    &self,
    problem: LinearProblem<f64>,
    config: SolverConfig<f64>,
  ) -> (Vec<f64>, Vec<NumericVector<f64>>) {
    fn run_with<St: Stepper>(
      problem: LinearProblem<f64>,
      stepper: St,
      config: SolverConfig<f64>,
    ) -> (Vec<f64>, Vec<NumericVector<f64>>) {
      let mut solver = Solver::new(problem, stepper, config).unwrap();
      solver.solve().unwrap();
      (solver.times().to_vec(), solver.trajectory().to_vec())
    }

    match self {
      StepperOption::Euler => run_with(problem, Euler, config),
      StepperOption::Midpoint => run_with(problem, Midpoint, config),
      StepperOption::RK4 => run_with(problem, RK4, config),
    }
  }
}

#[cfg(test)]
proptest! {
#[test]
fn trajectory_invariants(
  stepper_option: StepperOption,
  initial in prop::collection::vec(-10.0f64..10.0, 1..4),
  initial_time in -5.0f64..5.0,
  lambda in -1.0f64..1.0,
  time_step in 0.001f64..0.5,
  max_iterations in 0usize..50,
) {
  let initial = NumericVector::from_vec(initial);
  let problem = LinearProblem::new(initial.clone(), initial_time, lambda);

  let (times, trajectory) =
    stepper_option.run(problem, SolverConfig::new(time_step, max_iterations));

  prop_assert_eq!(times.len(), max_iterations + 1);
  prop_assert_eq!(trajectory.len(), max_iterations + 1);
  prop_assert_eq!(&trajectory[0], &initial);
  prop_assert_eq!(times[0], initial_time);

  for window in times.windows(2) {
    prop_assert!(window[1] > window[0]);
    assert_float_eq!(window[1] - window[0], time_step, 1e-9);
  }

  for state in &trajectory {
    prop_assert_eq!(state.dimension(), initial.dimension());
  }
}
}

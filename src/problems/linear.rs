use crate::error::Result;
use crate::ode::Problem;
use crate::NumericVector;
use alga::general::RealField;

#[cfg(test)]
use crate::assert_float_eq;

/// `dy/dt = lambda y`, componentwise.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProblem<S: RealField> {
  initial_state: NumericVector<S>,
  initial_time: S,
  lambda: S,
}

impl<S: RealField + From<f32>> LinearProblem<S> {
  pub fn new(
    initial_state: NumericVector<S>,
    initial_time: S,
    lambda: S,
  ) -> Self {
    Self {
      initial_state,
      initial_time,
      lambda,
    }
  }

  pub fn lambda(&self) -> S {
    self.lambda
  }

  /// Exact solution `y_0 e^(lambda (t - t_0))`.
  pub fn analytic(&self, t: S) -> NumericVector<S> {
    self
      .initial_state
      .scale((self.lambda * (t - self.initial_time)).exp())
  }
}

impl<S: RealField + From<f32>> Problem for LinearProblem<S> {
  type S = S;

  fn name(&self) -> &str {
    "Linear ODE"
  }

  fn dimension(&self) -> usize {
    self.initial_state.dimension()
  }

  fn initial_time(&self) -> S {
    self.initial_time
  }

  fn initial_state(&self) -> &NumericVector<S> {
    &self.initial_state
  }

  fn evaluate(&self, _: S, y: &NumericVector<S>) -> Result<NumericVector<S>> {
    Ok(y.scale(self.lambda))
  }
}

#[test]
fn evaluate_scales_by_lambda() {
  let problem =
    LinearProblem::new(NumericVector::from_vec(vec![2.0f64, -1.0]), 0.0, 0.6);

  let y = NumericVector::from_vec(vec![3.0f64, 4.0]);
  let dydt = problem.evaluate(7.0, &y).unwrap();

  assert_float_eq!(dydt.at(0).unwrap(), 1.8);
  assert_float_eq!(dydt.at(1).unwrap(), 2.4);
  // pure: input and initial condition untouched
  assert_eq!(y.as_slice(), &[3.0, 4.0]);
  assert_eq!(problem.initial_state().as_slice(), &[2.0, -1.0]);
}

#[test]
fn dimensions() {
  let problem =
    LinearProblem::new(NumericVector::from_vec(vec![2.0f64, -1.0]), 1.0, 0.6);

  assert_eq!(problem.dimension(), 2);
  assert_eq!(problem.particle_count(), 1);
  assert_eq!(problem.state_dimension(), 2);
  assert_eq!(problem.initial_time(), 1.0);
  assert!(problem.validate().is_ok());
}

#[test]
fn analytic() {
  let problem =
    LinearProblem::new(NumericVector::from_vec(vec![2.0f64]), 1.0, 0.6);

  assert_float_eq!(problem.analytic(1.0).at(0).unwrap(), 2.0);
  assert_float_eq!(
    problem.analytic(6.0).at(0).unwrap(),
    2.0 * (3.0f64).exp()
  );
}

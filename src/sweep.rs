use crate::error::Result;
use crate::ode::{Problem, Solver, Stepper};
use rayon::prelude::*;

#[cfg(test)]
use crate::assert_float_eq;
#[cfg(test)]
use crate::ode::{SolverConfig, RK4};
#[cfg(test)]
use crate::problems::LinearProblem;
#[cfg(test)]
use crate::NumericVector;

/// Solves independent runs (e.g. a parameter sweep) in parallel. Each run
/// is still stepped sequentially; results keep the input order.
pub fn solve_all<P, St>(
  solvers: Vec<Solver<P, St>>,
) -> Vec<Result<Solver<P, St>>>
where
  P: Problem + Send,
  St: Stepper + Send,
{
  solvers
    .into_par_iter()
    .map(|mut solver| {
      solver.solve()?;
      Ok(solver)
    })
    .collect()
}

#[test]
fn sweep_matches_sequential() {
  let lambdas = [-0.5f64, 0.1, 0.6, 1.0];
  let make = |lambda| {
    Solver::new(
      LinearProblem::new(NumericVector::from_vec(vec![2.0]), 0.0, lambda),
      RK4,
      SolverConfig::new(0.1, 20),
    )
    .unwrap()
  };

  let swept = solve_all(lambdas.iter().map(|l| make(*l)).collect());

  assert_eq!(swept.len(), lambdas.len());
  for (lambda, swept) in lambdas.iter().zip(swept) {
    let swept = swept.unwrap();
    assert_eq!(swept.problem().lambda(), *lambda);

    let mut sequential = make(*lambda);
    sequential.solve().unwrap();

    assert_eq!(swept.times(), sequential.times());
    assert_eq!(swept.trajectory(), sequential.trajectory());
    assert_float_eq!(
      swept.last_sample().1.at(0).unwrap(),
      2.0 * (2.0 * lambda).exp(),
      1e-4
    );
  }
}

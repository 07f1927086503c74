//! Planar gravitational N-body problem.
//!
//! The state packs every position before every velocity:
//! `[x_0, y_0, ..., x_{n-1}, y_{n-1}, vx_0, vy_0, ..., vx_{n-1}, vy_{n-1}]`,
//! so the derivative is `[velocities; accelerations]`. A body's identity is
//! its index in that layout.

use crate::error::{OdeError, Result};
use crate::ode::Problem;
use crate::NumericVector;
use nalgebra::Vector2;

#[cfg(test)]
use crate::assert_float_eq;
#[cfg(test)]
use crate::ode::{Solver, SolverConfig, RK4};

pub type NVec2 = Vector2<f64>;

pub const SPATIAL_DIMENSION: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
  pub mass: f64,
  pub position: NVec2,
  pub velocity: NVec2,
}

impl Body {
  pub fn new(mass: f64, position: NVec2, velocity: NVec2) -> Self {
    Self {
      mass,
      position,
      velocity,
    }
  }
}

#[derive(Debug, Clone)]
pub struct NBodyProblem {
  masses: Vec<f64>,
  gravity: f64,
  softening: f64, // epsilon^2, added to every squared separation
  initial_time: f64,
  initial_state: NumericVector<f64>,
}

impl NBodyProblem {
  pub fn new(
    bodies: &[Body],
    initial_time: f64,
    gravity: f64,
    softening: f64,
  ) -> Result<Self> {
    if bodies.is_empty() {
      return Err(OdeError::InvalidConfiguration(
        "n-body problem needs at least one body".to_string(),
      ));
    }
    if let Some((idx, body)) = bodies
      .iter()
      .enumerate()
      .find(|(_, body)| !(body.mass > 0.0 && body.mass.is_finite()))
    {
      return Err(OdeError::InvalidConfiguration(format!(
        "body {} has non-positive mass {}",
        idx, body.mass
      )));
    }
    if !gravity.is_finite() {
      return Err(OdeError::InvalidConfiguration(format!(
        "gravitational constant must be finite, got {}",
        gravity
      )));
    }
    if !(softening >= 0.0 && softening.is_finite()) {
      return Err(OdeError::InvalidConfiguration(format!(
        "softening must be non-negative, got {}",
        softening
      )));
    }

    let initial_state = NumericVector::from_vec(
      bodies
        .iter()
        .map(|b| b.position.iter())
        .flatten()
        .chain(bodies.iter().map(|b| b.velocity.iter()).flatten())
        .cloned()
        .collect(),
    );

    Ok(Self {
      masses: bodies.iter().map(|b| b.mass).collect(),
      gravity,
      softening,
      initial_time,
      initial_state,
    })
  }

  pub fn masses(&self) -> &[f64] {
    &self.masses
  }

  pub fn gravity(&self) -> f64 {
    self.gravity
  }

  pub fn softening(&self) -> f64 {
    self.softening
  }

  fn check_state(&self, state: &NumericVector<f64>) -> Result<()> {
    if state.dimension() != self.state_dimension() {
      return Err(OdeError::DimensionMismatch {
        left: self.state_dimension(),
        right: state.dimension(),
      });
    }

    Ok(())
  }

  fn position(&self, state: &[f64], idx: usize) -> NVec2 {
    let start = idx * SPATIAL_DIMENSION;
    NVec2::new(state[start], state[start + 1])
  }

  fn velocity(&self, state: &[f64], idx: usize) -> NVec2 {
    self.position(state, idx + self.masses.len())
  }

  /// Unpacks `state` into bodies, in index order.
  pub fn bodies(&self, state: &NumericVector<f64>) -> Result<Vec<Body>> {
    self.check_state(state)?;
    let state = state.as_slice();

    Ok(
      self
        .masses
        .iter()
        .enumerate()
        .map(|(idx, mass)| {
          Body::new(
            *mass,
            self.position(state, idx),
            self.velocity(state, idx),
          )
        })
        .collect(),
    )
  }

  pub fn accelerations(
    &self,
    state: &NumericVector<f64>,
  ) -> Result<Vec<NVec2>> {
    self.check_state(state)?;
    let state = state.as_slice();
    let n = self.masses.len();

    let mut accels = vec![NVec2::zeros(); n];

    for i in 0..n {
      let x_i = self.position(state, i);
      for j in (i + 1)..n {
        let r = self.position(state, j) - x_i;
        let d2 = r.dot(&r) + self.softening;

        // coincident bodies without softening exert no force
        if d2 == 0.0 {
          continue;
        }

        let inv_r = d2.sqrt().recip();
        let coef = self.gravity * inv_r * inv_r * inv_r;

        accels[i] += coef * self.masses[j] * r;
        accels[j] -= coef * self.masses[i] * r;
      }
    }

    Ok(accels)
  }

  pub fn total_momentum(&self, state: &NumericVector<f64>) -> Result<NVec2> {
    Ok(
      self
        .bodies(state)?
        .iter()
        .fold(NVec2::zeros(), |acc, b| acc + b.mass * b.velocity),
    )
  }

  /// Kinetic plus softened potential energy.
  pub fn total_energy(&self, state: &NumericVector<f64>) -> Result<f64> {
    let bodies = self.bodies(state)?;

    let kinetic: f64 = bodies
      .iter()
      .map(|b| 0.5 * b.mass * b.velocity.dot(&b.velocity))
      .sum();

    let mut potential = 0.0;
    for (i, b_i) in bodies.iter().enumerate() {
      for b_j in &bodies[(i + 1)..] {
        let r = b_j.position - b_i.position;
        let d2 = r.dot(&r) + self.softening;
        if d2 > 0.0 {
          potential -= self.gravity * b_i.mass * b_j.mass / d2.sqrt();
        }
      }
    }

    Ok(kinetic + potential)
  }
}

impl Problem for NBodyProblem {
  type S = f64;

  fn name(&self) -> &str {
    "N-Body"
  }

  fn dimension(&self) -> usize {
    2 * SPATIAL_DIMENSION
  }

  fn particle_count(&self) -> usize {
    self.masses.len()
  }

  fn initial_time(&self) -> f64 {
    self.initial_time
  }

  fn initial_state(&self) -> &NumericVector<f64> {
    &self.initial_state
  }

  fn evaluate(
    &self,
    _: f64,
    y: &NumericVector<f64>,
  ) -> Result<NumericVector<f64>> {
    let accels = self.accelerations(y)?;
    let half = self.masses.len() * SPATIAL_DIMENSION;

    Ok(NumericVector::from_vec(
      y.as_slice()[half..]
        .iter()
        .cloned()
        .chain(accels.iter().map(|a| a.iter().cloned()).flatten())
        .collect(),
    ))
  }
}

#[cfg(test)]
fn pair(separation: f64, softening: f64) -> NBodyProblem {
  NBodyProblem::new(
    &[
      Body::new(1.0, NVec2::new(0.0, 0.0), NVec2::new(0.0, 1.0)),
      Body::new(3.0, NVec2::new(separation, 0.0), NVec2::new(2.0, 0.0)),
    ],
    0.0,
    1.0,
    softening,
  )
  .unwrap()
}

#[test]
fn state_layout() {
  let problem = pair(2.0, 0.0);

  assert_eq!(problem.dimension(), 4);
  assert_eq!(problem.particle_count(), 2);
  assert_eq!(problem.state_dimension(), 8);
  assert!(problem.validate().is_ok());
  assert_eq!(
    problem.initial_state().as_slice(),
    &[0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 2.0, 0.0]
  );

  let bodies = problem.bodies(problem.initial_state()).unwrap();
  assert_eq!(bodies[1].mass, 3.0);
  assert_eq!(bodies[1].position, NVec2::new(2.0, 0.0));
  assert_eq!(bodies[0].velocity, NVec2::new(0.0, 1.0));
}

#[test]
fn inverse_square_pair() {
  let problem = pair(2.0, 0.0);
  let dydt = problem.evaluate(0.0, problem.initial_state()).unwrap();

  // velocities are copied through
  assert_eq!(&dydt.as_slice()[..4], &[0.0, 1.0, 2.0, 0.0]);
  // G m / r^2 towards the other body
  assert_float_eq!(dydt.at(4).unwrap(), 3.0 / 4.0);
  assert_float_eq!(dydt.at(5).unwrap(), 0.0);
  assert_float_eq!(dydt.at(6).unwrap(), -1.0 / 4.0);
  assert_float_eq!(dydt.at(7).unwrap(), 0.0);
}

#[test]
fn softened_pair() {
  let problem = pair(1.0, 3.0);
  let accels = problem.accelerations(problem.initial_state()).unwrap();

  // 1 / (1 + 3)^(3/2)
  assert_float_eq!(accels[0][0], 3.0 / 8.0);
  assert_float_eq!(accels[1][0], -1.0 / 8.0);
}

#[test]
fn coincident_bodies_are_guarded() {
  let problem = pair(0.0, 0.0);
  let accels = problem.accelerations(problem.initial_state()).unwrap();

  for accel in accels {
    assert_eq!(accel, NVec2::zeros());
  }
  assert!(problem.total_energy(problem.initial_state()).unwrap().is_finite());
}

#[test]
fn wrong_state_dimension() {
  let problem = pair(2.0, 0.0);

  assert_eq!(
    problem.evaluate(0.0, &NumericVector::zeros(3)),
    Err(OdeError::DimensionMismatch { left: 8, right: 3 })
  );
}

#[test]
fn invalid_construction() {
  let body = Body::new(1.0, NVec2::zeros(), NVec2::zeros());
  let massless = Body::new(0.0, NVec2::zeros(), NVec2::zeros());

  for result in vec![
    NBodyProblem::new(&[], 0.0, 1.0, 0.0),
    NBodyProblem::new(&[body.clone(), massless], 0.0, 1.0, 0.0),
    NBodyProblem::new(&[body.clone()], 0.0, 1.0, -1.0),
    NBodyProblem::new(&[body], 0.0, std::f64::NAN, 0.0),
  ] {
    match result {
      Err(OdeError::InvalidConfiguration(_)) => {}
      other => panic!("expected invalid configuration, got {:?}", other),
    }
  }
}

#[test]
fn circular_orbit() {
  let problem = NBodyProblem::new(
    &[
      Body::new(1.0, NVec2::zeros(), NVec2::zeros()),
      Body::new(1e-6, NVec2::new(1.0, 0.0), NVec2::new(0.0, 1.0)),
    ],
    0.0,
    1.0,
    0.0,
  )
  .unwrap();
  let initial_energy = problem.total_energy(problem.initial_state()).unwrap();
  let initial_momentum =
    problem.total_momentum(problem.initial_state()).unwrap();

  let mut solver =
    Solver::new(problem, RK4, SolverConfig::new(0.01, 628)).unwrap();
  solver.solve().unwrap();

  let problem = solver.problem();
  for state in solver.trajectory() {
    let bodies = problem.bodies(state).unwrap();
    let radius = (bodies[1].position - bodies[0].position).norm();
    assert_float_eq!(radius, 1.0, 1e-3);
  }

  let (_, last) = solver.last_sample();
  let energy = problem.total_energy(last).unwrap();
  let momentum = problem.total_momentum(last).unwrap();
  assert_float_eq!(energy, initial_energy, 1e-9);
  assert_float_eq!(momentum[0], initial_momentum[0], 1e-12);
  assert_float_eq!(momentum[1], initial_momentum[1], 1e-12);

  // one full period brings the satellite back to the start
  let bodies = problem.bodies(last).unwrap();
  assert_float_eq!(bodies[1].position[0], 1.0, 1e-2);
  assert_float_eq!(bodies[1].position[1], 0.0, 1e-2);
}

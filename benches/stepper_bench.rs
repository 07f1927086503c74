use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector2;
use ode_solver::ode::{
  EulerSettings, MidpointSettings, RK4Settings, StepperType, SwappableStepper,
};
use ode_solver::{
  Body, LinearProblem, NBodyProblem, NumericVector, Problem, Stepper,
};

fn ring_of_bodies(count: usize) -> NBodyProblem {
  let bodies = (0..count)
    .map(|idx| {
      let angle = 2.0 * std::f64::consts::PI * idx as f64 / count as f64;
      let position = Vector2::new(angle.cos(), angle.sin());
      Body::new(1.0, position, Vector2::new(-position[1], position[0]))
    })
    .collect::<Vec<_>>();

  NBodyProblem::new(&bodies, 0.0, 1.0, 1e-4)
    .expect("ring of bodies should be a valid problem")
}

fn stepper_types() -> Vec<StepperType> {
  vec![
    StepperType::Euler(EulerSettings {}),
    StepperType::Midpoint(MidpointSettings {}),
    StepperType::RK4(RK4Settings {}),
  ]
}

fn linear(c: &mut Criterion) {
  let problem =
    LinearProblem::new(NumericVector::from_vec(vec![2.0; 64]), 0.0, 0.6);

  for stepper_type in stepper_types() {
    let stepper = SwappableStepper::new(stepper_type.clone());

    c.bench_function(&format!("stepper {:?} linear x 64", stepper_type), |b| {
      b.iter(|| {
        stepper.advance(
          black_box(&problem),
          black_box(0.0),
          black_box(problem.initial_state()),
          black_box(0.01),
        )
      })
    });
  }
}

fn n_body(c: &mut Criterion) {
  for stepper_type in stepper_types() {
    for body_count in [2, 10, 100].iter() {
      let problem = ring_of_bodies(*body_count);
      let stepper = SwappableStepper::new(stepper_type.clone());

      c.bench_function(
        &format!("stepper {:?} n-body x {}", stepper_type, body_count),
        |b| {
          b.iter(|| {
            stepper.advance(
              black_box(&problem),
              black_box(0.0),
              black_box(problem.initial_state()),
              black_box(0.01),
            )
          })
        },
      );
    }
  }
}

criterion_group!(benches, linear, n_body);
criterion_main!(benches);

use crate::error::{OdeError, Result};
use alga::general::RealField;
use nalgebra::DVector;
use std::fmt;
use std::slice::Iter;

#[cfg(test)]
use crate::assert_float_eq;
#[cfg(test)]
use proptest::prelude::*;

/// Fixed-dimension vector with value semantics: every arithmetic operation
/// returns a new vector and leaves both operands untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericVector<S: RealField> {
  data: DVector<S>,
}

impl<S: RealField> NumericVector<S> {
  pub fn from_vec(values: Vec<S>) -> Self {
    Self {
      data: DVector::from_iterator(values.len(), values),
    }
  }

  pub fn from_slice(values: &[S]) -> Self {
    Self::from_vec(values.to_vec())
  }

  pub fn zeros(dimension: usize) -> Self {
    Self {
      data: DVector::zeros(dimension),
    }
  }

  pub fn dimension(&self) -> usize {
    self.data.len()
  }

  pub fn at(&self, index: usize) -> Result<S> {
    if index < self.dimension() {
      Ok(self.data[index])
    } else {
      Err(OdeError::IndexOutOfRange {
        index,
        dimension: self.dimension(),
      })
    }
  }

  fn check_dimension(&self, other: &Self) -> Result<()> {
    if self.dimension() == other.dimension() {
      Ok(())
    } else {
      Err(OdeError::DimensionMismatch {
        left: self.dimension(),
        right: other.dimension(),
      })
    }
  }

  #[allow(clippy::should_implement_trait)]
  pub fn add(&self, other: &Self) -> Result<Self> {
    self.check_dimension(other)?;

    Ok(Self {
      data: &self.data + &other.data,
    })
  }

  pub fn subtract(&self, other: &Self) -> Result<Self> {
    self.check_dimension(other)?;

    Ok(Self {
      data: &self.data - &other.data,
    })
  }

  pub fn scale(&self, scalar: S) -> Self {
    Self {
      data: &self.data * scalar,
    }
  }

  /// Zero divisors are rejected rather than producing non-finite components.
  pub fn divide(&self, scalar: S) -> Result<Self> {
    if scalar == S::zero() {
      return Err(OdeError::DivisionByZero);
    }

    Ok(Self {
      data: &self.data / scalar,
    })
  }

  pub fn norm(&self) -> S {
    self.data.norm()
  }

  pub fn iter(&self) -> Iter<'_, S> {
    self.data.as_slice().iter()
  }

  pub fn as_slice(&self) -> &[S] {
    self.data.as_slice()
  }
}

impl<S: RealField> From<Vec<S>> for NumericVector<S> {
  fn from(values: Vec<S>) -> Self {
    Self::from_vec(values)
  }
}

impl<'a, S: RealField> IntoIterator for &'a NumericVector<S> {
  type Item = &'a S;

  type IntoIter = Iter<'a, S>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<S: RealField> fmt::Display for NumericVector<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[")?;
    for (idx, value) in self.iter().enumerate() {
      if idx > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", value)?;
    }
    write!(f, "]")
  }
}

#[test]
fn construction() {
  let v = NumericVector::from_vec(vec![1.0f64, 2.0, 3.0]);
  assert_eq!(v.dimension(), 3);
  assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
  assert_eq!(NumericVector::from_slice(&[1.0f64, 2.0, 3.0]), v);

  let zeros = NumericVector::<f64>::zeros(4);
  assert_eq!(zeros.dimension(), 4);
  assert!(zeros.iter().all(|v| *v == 0.0));

  assert_eq!(NumericVector::<f64>::from_vec(Vec::new()).dimension(), 0);
}

#[test]
fn at_checks_bounds() {
  let v = NumericVector::from_vec(vec![4.0f64, 5.0]);
  assert_eq!(v.at(0), Ok(4.0));
  assert_eq!(v.at(1), Ok(5.0));
  assert_eq!(
    v.at(2),
    Err(OdeError::IndexOutOfRange {
      index: 2,
      dimension: 2
    })
  );
}

#[test]
fn mismatched_dimensions_fail() {
  let a = NumericVector::from_vec(vec![1.0f64, 2.0]);
  let b = NumericVector::from_vec(vec![1.0f64, 2.0, 3.0]);

  let expected = Err(OdeError::DimensionMismatch { left: 2, right: 3 });
  assert_eq!(a.add(&b), expected);
  assert_eq!(a.subtract(&b), expected);
}

#[test]
fn operands_are_not_mutated() {
  let a = NumericVector::from_vec(vec![1.0f64, 2.0]);
  let b = NumericVector::from_vec(vec![3.0f64, 4.0]);

  let sum = a.add(&b).unwrap();
  let scaled = a.scale(3.0);

  assert_eq!(sum.as_slice(), &[4.0, 6.0]);
  assert_eq!(scaled.as_slice(), &[3.0, 6.0]);
  assert_eq!(a.as_slice(), &[1.0, 2.0]);
  assert_eq!(b.as_slice(), &[3.0, 4.0]);
}

#[test]
fn divide_by_zero_fails() {
  let a = NumericVector::from_vec(vec![1.0f64, 2.0]);
  assert_eq!(a.divide(0.0), Err(OdeError::DivisionByZero));
  assert_eq!(a.divide(2.0).unwrap().as_slice(), &[0.5, 1.0]);
}

#[test]
fn display() {
  let v = NumericVector::from_vec(vec![2.0f64, 0.5]);
  assert_eq!(format!("{}", v), "[2, 0.5]");
  assert_eq!(format!("{}", NumericVector::<f64>::zeros(0)), "[]");
}

#[test]
fn norm() {
  let v = NumericVector::from_vec(vec![3.0f64, 4.0]);
  assert_float_eq!(v.norm(), 5.0);
}

#[cfg(test)]
proptest! {
#[test]
fn add_then_subtract_is_identity(
  pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 0..16),
) {
  let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
  let a = NumericVector::from_vec(a);
  let b = NumericVector::from_vec(b);

  let back = a.add(&b).unwrap().subtract(&b).unwrap();

  for (orig, back) in a.iter().zip(back.iter()) {
    assert_float_eq!(orig, back, 1e-9);
  }
}

#[test]
fn scale_then_divide_is_identity(
  values in prop::collection::vec(-1e3f64..1e3, 0..16),
  scalar in prop_oneof![-1e3f64..-1e-3, 1e-3f64..1e3],
) {
  let a = NumericVector::from_vec(values);

  let back = a.scale(scalar).divide(scalar).unwrap();

  prop_assert_eq!(back.dimension(), a.dimension());
  for (orig, back) in a.iter().zip(back.iter()) {
    assert_float_eq!(orig, back, 1e-9);
  }
}
}

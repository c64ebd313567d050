//! Geometric utility objects.

use crate::num::BFloat;
use std::{
    fmt,
    ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

#[cfg(feature = "for-testing")]
use approx::{AbsDiffEq, RelativeEq};

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Creates an array for iterating over all three dimensions except the given one.
    pub fn slice_except(dim: Self) -> [Self; 2] {
        match dim {
            Self::X => [Self::Y, Self::Z],
            Self::Y => [Self::X, Self::Z],
            Self::Z => [Self::X, Self::Y],
        }
    }

    /// Returns the dimension with the given number, if valid.
    pub fn from_num(num: usize) -> Option<Self> {
        match num {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
            }
        )
    }
}

use Dim3::{X, Y, Z};

/// Represents any quantity with three dimensional components.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct In3D<T>([T; 3]);

impl<T> In3D<T> {
    /// Creates a new 3D quantity given the three components.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D quantity by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> T,
    {
        Self::new(
            create_component(X),
            create_component(Y),
            create_component(Z),
        )
    }

    /// Creates a new 3D quantity with the given value copied into all components.
    pub fn same(a: T) -> Self
    where
        T: Copy,
    {
        Self([a, a, a])
    }

    /// Creates a new tuple containing copies of the three components.
    pub fn to_tuple(&self) -> (T, T, T)
    where
        T: Copy,
    {
        (self[X], self[Y], self[Z])
    }
}

impl<T> Index<Dim3> for In3D<T> {
    type Output = T;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim3> for In3D<T> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<'a, T> IntoIterator for &'a In3D<T> {
    type Item = &'a T;
    type IntoIter = ::std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: fmt::Display> fmt::Display for In3D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str("]")
    }
}

/// A 3D index.
pub type Idx3<I> = In3D<I>;

/// A 3D vector.
///
/// Used both for field values and for positions in lattice-index space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec3<F>(In3D<F>);

impl<F: BFloat> Vec3<F> {
    /// Creates a new 3D vector given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self(In3D::with_each_component(create_component))
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Creates a new vector with all component equal to the given value.
    pub fn equal_components(a: F) -> Self {
        Self::new(a, a, a)
    }

    /// Creates a new unit vector along the given dimension.
    pub fn unit(dim: Dim3) -> Self {
        Self::with_each_component(|d| if d == dim { F::one() } else { F::zero() })
    }

    /// Creates a new vector from the given vector, which may have a different component type.
    pub fn from<U: BFloat>(other: &Vec3<U>) -> Self {
        Self::new(
            F::from(other[X]).expect("Conversion failed"),
            F::from(other[Y]).expect("Conversion failed"),
            F::from(other[Z]).expect("Conversion failed"),
        )
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self.dot(self)
    }

    /// Computes the length (Euclidean norm) of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Whether the vector is the zero vector.
    pub fn is_zero(&self) -> bool {
        self[X] == F::zero() && self[Y] == F::zero() && self[Z] == F::zero()
    }

    /// Whether all components are finite.
    pub fn is_finite(&self) -> bool {
        self[X].is_finite() && self[Y].is_finite() && self[Z].is_finite()
    }

    /// Computes the dot product of the vector with another vector.
    pub fn dot(&self, other: &Self) -> F {
        self[X] * other[X] + self[Y] * other[Y] + self[Z] * other[Z]
    }

    /// Computes the cross product of the vector with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[Y] * other[Z] - self[Z] * other[Y],
            self[Z] * other[X] - self[X] * other[Z],
            self[X] * other[Y] - self[Y] * other[X],
        )
    }

    /// Returns a unit length copy of the vector, or the zero vector
    /// if the vector has zero length.
    pub fn normalized(&self) -> Self {
        let length = self.length();
        if length == F::zero() {
            Self::zero()
        } else {
            self / length
        }
    }

    /// Returns the component of the vector perpendicular to the given unit vector.
    pub fn rejected_from(&self, unit: &Self) -> Self {
        self - unit * self.dot(unit)
    }

    /// Computes the distance between the points given by two position vectors.
    pub fn distance(a: &Self, b: &Self) -> F {
        (a - b).length()
    }

    /// Computes the angle at the origin between the rays towards `a` and `c`.
    ///
    /// The result lies in `[0, π]`, and is zero if either vector is zero.
    pub fn angle(a: &Self, c: &Self) -> F {
        F::atan2(a.cross(c).length(), a.dot(c))
    }

    /// Computes the dihedral angle of the chain origin → `b` → `c` → `d`.
    ///
    /// The result lies in `(-π, π]`.
    pub fn dihedral(b: &Self, c: &Self, d: &Self) -> F {
        let b1 = *b;
        let b2 = c - b;
        let b3 = d - c;
        let n1 = b1.cross(&b2);
        let n2 = b2.cross(&b3);
        let y = b1.dot(&n2) * b2.length();
        let x = n1.dot(&n2);
        let theta = F::atan2(y, x);
        if theta == -F::PI() {
            F::PI()
        } else {
            theta
        }
    }
}

impl<F: BFloat> Index<Dim3> for Vec3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Vec3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<F: BFloat> Index<usize> for Vec3<F> {
    type Output = F;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.0 .0[idx]
    }
}

impl<F: BFloat> IndexMut<usize> for Vec3<F> {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.0 .0[idx]
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] + other[X], self[Y] + other[Y], self[Z] + other[Z])
    }
}

impl<F: BFloat> Add<Vec3<F>> for &Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Vec3<F>) -> Self::Output {
        self + &other
    }
}

impl<F: BFloat> Add<Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<F: BFloat> Add<&Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn add(self, other: &Self) -> Self::Output {
        &self + other
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] - other[X], self[Y] - other[Y], self[Z] - other[Z])
    }
}

impl<F: BFloat> Sub<Vec3<F>> for &Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Vec3<F>) -> Self::Output {
        self - &other
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Sub<&Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn sub(self, other: &Self) -> Self::Output {
        &self - other
    }
}

impl<F: BFloat> Mul<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        Self::Output::new(factor * self[X], factor * self[Y], factor * self[Z])
    }
}

impl<F: BFloat> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, factor: F) -> Self::Output {
        &self * factor
    }
}

impl<F: BFloat> Div<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn div(self, divisor: F) -> Self::Output {
        Self::Output::new(self[X] / divisor, self[Y] / divisor, self[Z] / divisor)
    }
}

impl<F: BFloat> Div<F> for Vec3<F> {
    type Output = Self;
    fn div(self, divisor: F) -> Self::Output {
        &self / divisor
    }
}

impl<F: BFloat> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self[X], -self[Y], -self[Z])
    }
}

impl<'a, F: BFloat> IntoIterator for &'a Vec3<F> {
    type Item = <&'a In3D<F> as IntoIterator>::Item;
    type IntoIter = <&'a In3D<F> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str(")")
    }
}

#[cfg(feature = "for-testing")]
impl<F> AbsDiffEq for Vec3<F>
where
    F: BFloat + AbsDiffEq,
    F::Epsilon: Copy,
{
    type Epsilon = F::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Dim3::slice()
            .iter()
            .all(|&dim| F::abs_diff_eq(&self[dim], &other[dim], epsilon))
    }
}

#[cfg(feature = "for-testing")]
impl<F> RelativeEq for Vec3<F>
where
    F: BFloat + RelativeEq,
    F::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        F::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        Dim3::slice()
            .iter()
            .all(|&dim| F::relative_eq(&self[dim], &other[dim], epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-1.0, 0.5, 2.0);
        assert_eq!(a + b, Vec3::new(0.0, 2.5, 5.0));
        assert_eq!(a - b, Vec3::new(2.0, 1.5, 1.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn components_are_indexable_by_dim_and_number() {
        let mut v = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(v[Y], 5.0);
        assert_eq!(v[2], 6.0);
        v[0] = -4.0;
        assert_eq!(v[X], -4.0);
    }

    #[test]
    fn cross_product_follows_right_hand_rule() {
        let x = Vec3::<f64>::unit(X);
        let y = Vec3::<f64>::unit(Y);
        assert_eq!(x.cross(&y), Vec3::unit(Z));
        assert_eq!(y.cross(&x), -Vec3::unit(Z));
    }

    #[test]
    fn normalizing_zero_vector_gives_zero_vector() {
        assert!(Vec3::<f64>::zero().normalized().is_zero());
        let v = Vec3::new(3.0, 0.0, 4.0).normalized();
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(v[X], 0.6, epsilon = 1e-15);
    }

    #[test]
    fn angle_between_vectors_is_correct() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(Vec3::angle(&a, &Vec3::new(0.0, 2.0, 0.0)), FRAC_PI_2);
        assert_abs_diff_eq!(Vec3::angle(&a, &Vec3::new(-3.0, 0.0, 0.0)), PI);
        assert_abs_diff_eq!(Vec3::angle(&a, &Vec3::new(5.0, 0.0, 0.0)), 0.0);
        assert_abs_diff_eq!(Vec3::angle(&a, &Vec3::zero()), 0.0);
    }

    #[test]
    fn dihedral_angle_is_signed() {
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(1.0, 1.0, 0.0);
        let up = Vec3::new(1.0, 1.0, 1.0);
        let down = Vec3::new(1.0, 1.0, -1.0);
        assert_abs_diff_eq!(Vec3::dihedral(&b, &c, &up), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(Vec3::dihedral(&b, &c, &down), -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn trans_dihedral_is_positive_pi() {
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(1.0, 1.0, 0.0);
        let d = Vec3::new(2.0, 1.0, 0.0);
        assert_abs_diff_eq!(Vec3::dihedral(&b, &c, &d), PI, epsilon = 1e-12);
        let cis = Vec3::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(Vec3::dihedral(&b, &c, &cis), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejection_removes_parallel_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let r = v.rejected_from(&Vec3::unit(Z));
        assert_eq!(r, Vec3::new(1.0, 2.0, 0.0));
    }
}

//! Matrix element type constraints
//!
//! Ingested matrices hold `i32` counts; transformed matrices hold `f64`.

/// Value type tag carried by a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// 32-bit signed integers
    Integer,
    /// 64-bit floating point
    Double,
}

impl ValueType {
    /// Tag string used by the host object schema
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Double => "double",
        }
    }
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for types that can be stored as matrix values
pub trait MatrixElement: Copy + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Value type tag for this element type
    fn value_type() -> ValueType;

    /// The implicit value of a lacunar leaf
    fn one() -> Self;

    /// Additive combination, used when duplicate coordinates are merged
    fn combine(self, other: Self) -> Self;

    /// Convert to f64 for transforms
    fn to_f64(self) -> f64;

    fn is_one(self) -> bool {
        self == Self::one()
    }

    /// Whether the value is zero and must not be stored
    fn is_zero(self) -> bool;
}

impl MatrixElement for i32 {
    fn value_type() -> ValueType {
        ValueType::Integer
    }

    fn one() -> Self {
        1
    }

    /// Sums saturate at the `i32` range, with a warning
    fn combine(self, other: Self) -> Self {
        self.checked_add(other).unwrap_or_else(|| {
            let clamped = self.saturating_add(other);
            tracing::warn!(
                left = self,
                right = other,
                clamped,
                "duplicate entries overflow i32; clamping the sum"
            );
            clamped
        })
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn is_zero(self) -> bool {
        self == 0
    }
}

impl MatrixElement for f64 {
    fn value_type() -> ValueType {
        ValueType::Double
    }

    fn one() -> Self {
        1.0
    }

    fn combine(self, other: Self) -> Self {
        self + other
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn is_zero(self) -> bool {
        self == 0.0
    }
}

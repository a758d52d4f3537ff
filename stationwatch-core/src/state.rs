//! State validation
//!
//! Upstream collaborators must hand the subject a complete, valid snapshot.
//! The subject checks this before mutating anything, so a rejected snapshot
//! never reaches an observer.

/// Trait for state values that can be validated before they are published
pub trait Validatable {
    /// Check if the value is fit to become the subject's state
    fn is_valid(&self) -> bool;

    /// Short reason reported when [`is_valid`](Self::is_valid) is false
    fn rejection_reason(&self) -> &'static str {
        "state failed validation"
    }
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }

    fn rejection_reason(&self) -> &'static str {
        "not a finite number"
    }
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }

    fn rejection_reason(&self) -> &'static str {
        "not a finite number"
    }
}

macro_rules! always_valid {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Validatable for $ty {
                fn is_valid(&self) -> bool {
                    true
                }
            }
        )*
    };
}

always_valid!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool, char, String);

use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::{fail, KernelError};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }

    /// Quantity requested for a loan, which must be at least one.
    pub fn positive(quantity: i32) -> Result<Self, Report<KernelError>> {
        if quantity > 0 {
            Ok(Self(quantity))
        } else {
            Err(fail(
                KernelError::Validation,
                "Quantity must be a positive integer",
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loan_quantities_must_be_positive() {
        assert_eq!(Quantity::positive(3).unwrap(), Quantity::new(3));
        for quantity in [0, -1] {
            let err = Quantity::positive(quantity).unwrap_err();
            assert_eq!(*err.current_context(), KernelError::Validation);
        }
    }
}

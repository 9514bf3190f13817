//! Availability state machine for a product.
//!
//! `Active -> Active` on update, `Active -> Inactive` on removal.
//! `Inactive` is terminal: nothing moves a product back.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Availability {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("product is no longer available")]
    Terminal,
}

impl Availability {
    pub fn from_flag(available: bool) -> Self {
        if available { Availability::Active } else { Availability::Inactive }
    }

    /// Value stored in the `available` column.
    pub fn flag(self) -> bool {
        matches!(self, Availability::Active)
    }

    /// Field updates keep a product active; an inactive one cannot be edited.
    pub fn update(self) -> Result<Availability, LifecycleError> {
        match self {
            Availability::Active => Ok(Availability::Active),
            Availability::Inactive => Err(LifecycleError::Terminal),
        }
    }

    /// Soft delete.
    pub fn retire(self) -> Result<Availability, LifecycleError> {
        match self {
            Availability::Active => Ok(Availability::Inactive),
            Availability::Inactive => Err(LifecycleError::Terminal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_products_start_active() {
        assert_eq!(Availability::default(), Availability::Active);
        assert!(Availability::default().flag());
    }

    #[test]
    fn flag_round_trips() {
        assert_eq!(Availability::from_flag(true), Availability::Active);
        assert_eq!(Availability::from_flag(false), Availability::Inactive);
        assert!(!Availability::Inactive.flag());
    }

    #[test]
    fn retire_moves_active_to_inactive() {
        assert_eq!(Availability::Active.retire(), Ok(Availability::Inactive));
    }

    #[test]
    fn inactive_is_terminal() {
        assert_eq!(Availability::Inactive.retire(), Err(LifecycleError::Terminal));
        assert_eq!(Availability::Inactive.update(), Err(LifecycleError::Terminal));
    }

    #[test]
    fn update_keeps_active() {
        assert_eq!(Availability::Active.update(), Ok(Availability::Active));
    }
}

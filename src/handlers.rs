pub mod catalog;
pub mod dashboard;
pub mod events;
pub mod purchases;
pub mod sales;
pub mod suppliers;

use validator::ValidationError;

use crate::common::money::Money;

// ---
// Validação customizada compartilhada pelos payloads
// ---
pub(crate) fn validate_amount(val: &Money) -> Result<(), ValidationError> {
    if !val.is_valid_input() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &1_000_000_000.0);
        err.message = Some("invalid_amount".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_money_is_rejected_with_translation_key() {
        let err = validate_amount(&Money::from_cents(-1)).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("invalid_amount"));
        assert!(validate_amount(&Money::from_cents(100_000_000_001)).is_err());
        assert!(validate_amount(&Money::ZERO).is_ok());
    }
}

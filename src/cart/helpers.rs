//! Shopping Cart Handler Helpers
//!
//! Small, pure functions shared by the cart handlers and models.

use validator::ValidationErrors;

/// Joins the messages of every field error into one string.
///
/// Fields are visited in name order so the result is stable. A field error
/// without a custom message falls back to its validation code.
///
/// Example output: `"product id is required quantity is required"`.
pub fn field_error_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, field_errors)| field_errors.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => error.code.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn falls_back_to_code_without_message() {
        let mut errors = ValidationErrors::new();
        errors.add("quantity", ValidationError::new("range"));
        assert_eq!(field_error_message(&errors), "range");
    }

    #[test]
    fn orders_messages_by_field_name() {
        let mut errors = ValidationErrors::new();
        let mut late = ValidationError::new("required");
        late.message = Some("second".into());
        let mut early = ValidationError::new("required");
        early.message = Some("first".into());
        errors.add("b_field", late);
        errors.add("a_field", early);
        assert_eq!(field_error_message(&errors), "first second");
    }
}

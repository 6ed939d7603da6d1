use crate::core::ServiceError;
use crate::core::error::GENERIC_ERROR_MESSAGE;

/// Toast text for a failed form submission.
pub fn describe_error(err: &ServiceError) -> String {
    let text = match err {
        ServiceError::Validation(issues) => match issues.first() {
            Some(issue) if issue.path.is_empty() => issue.message.clone(),
            Some(issue) => format!("Invalid {} - {}", issue.path_label(), issue.message),
            None => String::new(),
        },
        ServiceError::Mutation(mutation) => mutation.error.clone(),
    };

    if text.trim().is_empty() {
        format!("{GENERIC_ERROR_MESSAGE}.")
    } else {
        text
    }
}

use rutero_client::ClientError;

use super::format::key_value_rows;

const FALLBACK_STEP: &str = "Retry the command.";

pub fn explain(error: &ClientError) -> String {
    let headline = if error.is_internal() {
        "rutero could not finish this command."
    } else {
        "Something in the request needs fixing."
    };

    let mut lines = vec![headline.to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Error:", error.code.clone()),
            ("Details:", error.message.clone()),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push("What to do next:".to_string());

    let steps = if error.recovery_steps.is_empty() {
        vec![FALLBACK_STEP.to_string()]
    } else {
        error.recovery_steps.clone()
    };
    lines.extend(
        steps
            .iter()
            .zip(1..)
            .map(|(step, number)| format!("  {number}. {step}")),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use rutero_client::ClientError;

    use super::explain;

    #[test]
    fn user_errors_list_code_details_and_steps() {
        let error = ClientError::invalid_argument_with_recovery(
            "bad input",
            vec!["run rutero --help".to_string()],
        );

        let rendered = explain(&error);
        assert!(rendered.starts_with("Something in the request needs fixing."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("What to do next:\n  1. run rutero --help"));
    }

    #[test]
    fn internal_errors_use_their_own_headline_and_default_step() {
        let error = ClientError::new("reference_data_unavailable", "gazetteer missing", Vec::new());
        let rendered = explain(&error);
        assert!(rendered.starts_with("rutero could not finish this command."));
        assert!(rendered.ends_with("  1. Retry the command."));
    }
}

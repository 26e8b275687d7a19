//! Prompt texts sent to the assistant

pub fn explain_selection(filetype: &str) -> String {
    format!("Explain the following {filetype} code: what it does, how it works and anything surprising about it.")
}

pub fn explain_function(filetype: &str) -> String {
    format!(
        "Explain this {filetype} function: its purpose, parameters, return value and side effects."
    )
}

pub fn generate_function(filetype: &str, description: &str, with_file: bool) -> String {
    let mut prompt = format!(
        "Write a {filetype} function that does the following: {}\n\
         Reply with the complete function in a single fenced code block.",
        description.trim()
    );
    if with_file {
        prompt.push_str("\nThe attached file is where it will go; follow its conventions.");
    }
    prompt
}

pub fn generate_tests(filetype: &str) -> String {
    format!(
        "Write unit tests for the following {filetype} code using the usual test framework for the language. \
         Cover edge cases. Reply with the tests in a single fenced code block."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_filetype_and_request() {
        assert!(explain_selection("lua").contains("lua code"));
        assert!(explain_function("rust").contains("rust function"));
        let prompt = generate_function("python", "  parses ISO dates ", true);
        assert!(prompt.contains("following: parses ISO dates\n"));
        assert!(prompt.ends_with("follow its conventions."));
        assert!(!generate_function("python", "x", false).contains("attached"));
        assert!(generate_tests("go").contains("go code"));
    }
}

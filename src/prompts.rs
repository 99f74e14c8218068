pub const PORTRAIT: &str = include_str!("../data/prompts/portrait.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Build the image prompt for a personality description.
pub fn portrait(description: &str) -> String {
    render(PORTRAIT, &[("description", description)])
}

/// Join the developer instructions and the user's own message into one user turn.
pub fn analysis_user_turn(developer_message: &str, user_message: &str) -> String {
    format!("{}\n\n{}", developer_message, user_message)
}

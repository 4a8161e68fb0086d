use std::sync::OnceLock;

use regex::Regex;

/// Placeholder pattern: `{{ env.VAR }}` with an optional
/// `| default("fallback")` clause
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be a valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// Expansion happens before deserialization so config structs hold plain
/// `String`/`SecretString` values. TOML comment lines are left untouched.
/// A placeholder for an unset variable is an error unless it carries a
/// `default("...")` clause.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            output.push_str(&expand_line(line)?);
        }
    }

    Ok(output)
}

/// Expand placeholders within a single line
fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder_re().captures_iter(line) {
        let matched = captures.get(0).expect("capture 0 always present");
        let var_name = &captures[1];
        let fallback = captures.get(2).map(|m| m.as_str());

        expanded.push_str(&line[cursor..matched.start()]);

        match std::env::var(var_name) {
            Ok(value) => expanded.push_str(&value),
            Err(_) => match fallback {
                Some(default) => expanded.push_str(default),
                None => return Err(format!("environment variable not found: `{var_name}`")),
            },
        }

        cursor = matched.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

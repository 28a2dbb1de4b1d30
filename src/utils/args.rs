//! Argument normalization utilities.
//!
//! Transforms flag tokens before clap parsing so tools can keep the
//! single-dash long flag style (`-example=world`, `-example world`).

/// Rewrite single-dash long flags to their double-dash form.
///
/// `-example=world` becomes `--example=world`. Single-letter flags (`-v`),
/// double-dash flags, a bare `-`, negative numbers and everything after a
/// `--` separator pass through unchanged.
pub fn normalize_long_flags(args: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(args.len());
    let mut found_separator = false;

    for arg in args {
        if found_separator {
            result.push(arg.clone());
            continue;
        }
        if arg == "--" {
            found_separator = true;
            result.push(arg.clone());
            continue;
        }
        if is_single_dash_long(arg) {
            result.push(format!("-{}", arg));
        } else {
            result.push(arg.clone());
        }
    }

    result
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split('=').next().unwrap_or("");
    name.chars().count() > 1 && name.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// True when a token looks like a flag rather than a value.
pub fn is_flag(arg: &str) -> bool {
    arg.starts_with('-')
}

/// True when the token asks for help.
pub fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

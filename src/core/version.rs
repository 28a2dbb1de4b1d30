use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::{io, parser};
use crate::validator::{validate, Field, Rule};

/// Shape of the version declaration line, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    /// `const VERSION string = "v0.0.3"`
    Plain,
    /// `pub const VERSION: &str = "v0.0.3";`
    Rust,
}

impl Declaration {
    pub fn for_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "rs") {
            Declaration::Rust
        } else {
            Declaration::Plain
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            Declaration::Plain => line.starts_with("const VERSION string"),
            Declaration::Rust => {
                line.strip_prefix("pub ").unwrap_or(line).starts_with("const VERSION: &str")
            }
        }
    }

    /// Format a fresh declaration. For Rust the visibility of `existing` is kept.
    pub fn render(&self, existing: &str, version: &str) -> String {
        match self {
            Declaration::Plain => format!("const VERSION string = \"{}\"", version),
            Declaration::Rust => {
                let vis = if existing.starts_with("pub ") { "pub " } else { "" };
                format!("{}const VERSION: &str = \"{}\";", vis, version)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bump {
    #[default]
    Patch,
    Minor,
    Major,
}

impl Bump {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bump::Patch => "patch",
            Bump::Minor => "minor",
            Bump::Major => "major",
        }
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bump {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "patch" => Ok(Bump::Patch),
            "minor" => Ok(Bump::Minor),
            "major" => Ok(Bump::Major),
            _ => Err(()),
        }
    }
}

/// Increment a dotted version string.
///
/// The third `.`-separated segment is the patch and must be numeric; other
/// segments are kept as written, so `V1.2.3` and `v1.2.3.4` bump cleanly.
/// `Minor` and `Major` also need a numeric minor, or a major made of digits
/// after an optional letter prefix such as `v`. Returns None otherwise, or
/// when there are fewer than three segments.
pub fn increment_version(version: &str, bump: Bump) -> Option<String> {
    let mut parts: Vec<String> = version.split('.').map(str::to_string).collect();
    if parts.len() < 3 {
        return None;
    }

    let patch: u64 = parts[2].parse().ok()?;

    match bump {
        Bump::Patch => {
            parts[2] = patch.checked_add(1)?.to_string();
        }
        Bump::Minor => {
            let minor: u64 = parts[1].parse().ok()?;
            parts[1] = minor.checked_add(1)?.to_string();
            parts[2] = "0".to_string();
        }
        Bump::Major => {
            let digits_at = parts[0].find(|c: char| c.is_ascii_digit())?;
            let (prefix, digits) = parts[0].split_at(digits_at);
            if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return None;
            }
            let major: u64 = digits.parse().ok()?;
            parts[0] = format!("{}{}", prefix, major.checked_add(1)?);
            parts[1] = "0".to_string();
            parts[2] = "0".to_string();
        }
    }

    Some(parts.join("."))
}

/// Replace the first declaration line in `content`.
///
/// All other lines are copied unchanged; empty lines at the end of the
/// content are dropped and the result ends with a single newline. Returns
/// None when no line declares the version.
pub fn rewrite_declaration(
    content: &str,
    declaration: Declaration,
    new_version: &str,
) -> Option<String> {
    let mut replaced = false;
    let mut output = String::with_capacity(content.len() + new_version.len());

    for line in parser::lines_trimmed_end(content) {
        if !replaced && declaration.matches(line) {
            output.push_str(&declaration.render(line, new_version));
            replaced = true;
        } else {
            output.push_str(line);
        }
        output.push('\n');
    }

    replaced.then_some(output)
}

fn require_version_file(version_file: &str) -> Result<()> {
    validate(&[Field::new("version_file", version_file).with_rules(&[Rule::NotEmpty, Rule::IsFile])])
}

/// Read the quoted version literal from the first declaration line.
pub fn read_version(version_file: &str) -> Result<String> {
    require_version_file(version_file)?;

    let path = Path::new(version_file);
    let content = io::read_file(path, "read version file")?;
    let declaration = Declaration::for_path(path);

    content
        .split('\n')
        .find(|line| declaration.matches(line))
        .and_then(parser::extract_quoted)
        .ok_or_else(|| Error::version_not_found(version_file))
}

/// Compute the next version of the file's current declaration.
pub fn read_next(version_file: &str, bump: Bump) -> Result<String> {
    let current = read_version(version_file)?;
    increment_version(&current, bump).ok_or_else(|| {
        Error::version_invalid(
            version_file,
            &current,
            "expected a numeric patch segment after MAJOR.MINOR",
        )
    })
}

/// The current version with its patch segment incremented.
pub fn read_next_patch(version_file: &str) -> Result<String> {
    read_next(version_file, Bump::Patch)
}

/// Rewrite the declaration line in `version_file` to carry `new_version`.
///
/// The file is replaced atomically. No implicit increment happens here;
/// callers resolve an empty request before calling (see [`bump_version`]).
pub fn update_version(version_file: &str, new_version: &str) -> Result<()> {
    validate(&[
        Field::new("version_file", version_file).with_rules(&[Rule::NotEmpty, Rule::IsFile]),
        Field::new("new_version", new_version).rule(Rule::NotEmpty),
    ])?;

    let path = Path::new(version_file);
    let content = io::read_file(path, "read version file")?;

    let updated = rewrite_declaration(&content, Declaration::for_path(path), new_version)
        .ok_or_else(|| Error::version_not_found(version_file))?;

    io::write_file_atomic(path, &updated, "write version file")?;
    log_status!("version", "Updated {} to {}", version_file, new_version);

    Ok(())
}

/// Resolve a requested version and write it.
///
/// `None`, an empty string or `patch` means the next patch release; `minor`
/// and `major` bump those segments; anything else is written as given.
/// Returns the version written.
pub fn bump_version(version_file: &str, requested: Option<&str>) -> Result<String> {
    let requested = requested.unwrap_or("").trim();

    let new_version = if requested.is_empty() {
        read_next(version_file, Bump::Patch)?
    } else if let Ok(bump) = requested.parse::<Bump>() {
        read_next(version_file, bump)?
    } else {
        requested.to_string()
    };

    update_version(version_file, &new_version)?;
    Ok(new_version)
}

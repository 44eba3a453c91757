use glob::{Pattern, PatternError};

/// Image name pattern.
///
/// A pattern without `*` or `?` matches any name containing it. A pattern with
/// wildcards is matched against the whole name, `*` standing for any run of
/// characters and `?` for exactly one. Brackets are always literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Contains(String),
    Glob { raw: String, pattern: Pattern },
}

impl NamePattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let raw = if raw.is_empty() { "*" } else { raw };

        if !raw.contains(['*', '?']) {
            return Ok(Self::Contains(raw.to_string()));
        }

        Ok(Self::Glob {
            raw: raw.to_string(),
            pattern: Pattern::new(&to_glob(raw))?,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Contains(needle) => name.contains(needle.as_str()),
            Self::Glob { pattern, .. } => pattern.matches(name),
        }
    }

    /// Value for the `name` filter of DescribeImages, which always matches
    /// the full name and understands the same wildcards.
    pub fn server_filter(&self) -> String {
        match self {
            Self::Contains(needle) => format!("*{}*", needle),
            Self::Glob { raw, .. } => raw.clone(),
        }
    }
}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Contains(needle) => write!(f, "{}", needle),
            Self::Glob { raw, .. } => write!(f, "{}", raw),
        }
    }
}

// ec2 name filters only know `*` and `?`: brackets become literal character
// classes and runs of `*` collapse, since glob reserves `**` for path components
fn to_glob(raw: &str) -> String {
    let mut glob = String::with_capacity(raw.len());
    let mut last = None;

    for c in raw.chars() {
        match c {
            '[' => glob.push_str("[[]"),
            ']' => glob.push_str("[]]"),
            '*' if last == Some('*') => {}
            _ => glob.push(c),
        }
        last = Some(c);
    }

    glob
}

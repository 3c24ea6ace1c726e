//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format resolution paths, type names,
//! and "did you mean?" suggestions in error and log output.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use wiring_support::rendering::render_chain;
///
/// let chain = vec!["Container.foo", "SubContainer.bar", "Container.foo"];
/// let rendered = render_chain(&chain);
/// assert_eq!(rendered, "Container.foo → SubContainer.bar → Container.foo");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Renders a resolution path one hop per line, container names aligned.
///
/// ```text
/// [Container]     foo
///                 ↓
/// [SubContainer]  bar  (via (this << 1).foo)
///                 ↓
/// [Container]     foo
/// ```
pub fn render_path_vertical(entries: &[PathEntry]) -> String {
    let mut result = String::new();
    let width = entries
        .iter()
        .map(|e| e.container.chars().count())
        .max()
        .unwrap_or(0);

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            result.push_str(&" ".repeat(width + 4));
            result.push_str("↓\n");
        }

        result.push_str(&format!(
            "[{:<width$}]  {}",
            entry.container,
            entry.attribute,
            width = width,
        ));

        if let Some(ref via) = entry.via {
            result.push_str(&format!("  (via {via})"));
        }

        result.push('\n');
    }

    result
}

/// One hop of a resolution path for vertical rendering.
#[derive(Debug, Clone)]
pub struct PathEntry {
    /// Name of the container the attribute was looked up in
    pub container: String,
    /// The attribute being resolved
    pub attribute: String,
    /// Optional: the deferred expression that led here
    pub via: Option<String>,
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use wiring_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Suggests declared names close to a name that was not found.
///
/// Candidates within an edit distance of a third of the requested
/// name's length (at least 1) are returned, closest first.
///
/// ```
/// use wiring_support::rendering::suggest_similar;
///
/// let names = ["database", "logger", "settings"];
/// assert_eq!(suggest_similar("databse", &names, 3), vec!["database"]);
/// ```
pub fn suggest_similar(
    requested: &str,
    available: &[impl AsRef<str>],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let budget = (requested_lower.chars().count() / 3).max(1);

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let distance = edit_distance(&requested_lower, &name.to_lowercase());
            (distance <= budget).then_some((name, distance))
        })
        .collect();

    scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

use regex::Regex;

/// Derive a URL slug from a food name: lowercase, runs of non-alphanumerics collapsed to a single
/// hyphen, leading and trailing hyphens trimmed.
pub fn slugify(name: &str) -> String {
    let re = Regex::new(r"[^a-z0-9]+").unwrap();
    let lowered = name.to_lowercase();
    re.replace_all(&lowered, "-").trim_matches('-').to_string()
}

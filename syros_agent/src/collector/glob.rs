//! Comma-separated glob include/exclude filtering for the virtualization
//! collector (§4.1 "enumerates VMs/hosts/datastores under an
//! include/exclude filter (comma-separated glob patterns evaluated
//! against VM/host names)").

use regex::Regex;

pub struct NameFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl NameFilter {
    pub fn new(include: &str, exclude: &str) -> NameFilter {
        NameFilter {
            include: compile_patterns(include),
            exclude: compile_patterns(exclude),
        }
    }

    /// A name passes if it matches any include pattern (or no include
    /// patterns were given) and matches no exclude pattern.
    pub fn matches(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|re| re.is_match(name));
        let excluded = self.exclude.iter().any(|re| re.is_match(name));
        included && !excluded
    }
}

fn compile_patterns(raw: &str) -> Vec<Regex> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|glob| Regex::new(&glob_to_regex(glob)).ok())
        .collect()
}

fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::from("^");
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c if "\\.+*?()|[]{}^$#&~".contains(c) => {
                pattern.push('\\');
                pattern.push(c);
            }
            c => pattern.push(c),
        }
    }
    pattern.push('$');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_patterns_includes_everything() {
        let f = NameFilter::new("", "");
        assert!(f.matches("anything"));
    }

    #[test]
    fn include_glob_matches_prefix() {
        let f = NameFilter::new("prod-*", "");
        assert!(f.matches("prod-web-01"));
        assert!(!f.matches("stg-web-01"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = NameFilter::new("prod-*", "prod-legacy-*");
        assert!(f.matches("prod-web-01"));
        assert!(!f.matches("prod-legacy-01"));
    }
}

//! Port-binding selection (§4.1.1).
//!
//! Chooses a single representative host port out of a container's full
//! `container-port -> host-port` binding map, honoring the
//! gliderlabs/registrator `SERVICE_<port>_NAME` env convention when more
//! than one port is bound. Mirrors the original `GetPortFromEnv` mapper
//! one-for-one, collapsing its duplicated final "any first" branch into a
//! single fallback per spec.md's Open Questions.

use std::collections::BTreeMap;

/// `binding` is a container-port -> host-port map; `env` is the
/// container's raw `KEY=VALUE` environment entries.
pub fn select(binding: &BTreeMap<String, String>, env: &[String]) -> String {
    if binding.is_empty() {
        return String::new();
    }
    if binding.len() == 1 {
        return binding.values().next().cloned().unwrap_or_default();
    }
    if env.is_empty() {
        return any_first(binding);
    }
    for host_port in binding.values() {
        if host_port.is_empty() {
            continue;
        }
        let needle = format!("SERVICE_{}_NAME", host_port);
        if env.iter().any(|e| e.contains(&needle)) {
            return host_port.clone();
        }
    }
    any_first(binding)
}

fn any_first(binding: &BTreeMap<String, String>) -> String {
    binding
        .values()
        .find(|v| !v.is_empty())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_binding_is_empty() {
        assert_eq!(select(&BTreeMap::new(), &[]), "");
    }

    #[test]
    fn single_binding_wins_regardless_of_env() {
        let b = map(&[("80/tcp", "8080")]);
        assert_eq!(select(&b, &["SOMETHING=else".into()]), "8080");
    }

    #[test]
    fn no_env_picks_any_first_stably() {
        let b = map(&[("80/tcp", "8080")]);
        assert_eq!(select(&b, &[]), "8080");
    }

    #[test]
    fn registrator_metadata_disambiguates() {
        let b = map(&[("80/tcp", "8080"), ("443/tcp", "8443")]);
        let env = vec!["SERVICE_8443_NAME=api".to_string()];
        assert_eq!(select(&b, &env), "8443");
    }

    #[test]
    fn no_match_falls_back_to_any_first() {
        let b = map(&[("80/tcp", "8080"), ("443/tcp", "8443")]);
        let env = vec!["UNRELATED=1".to_string()];
        let picked = select(&b, &env);
        assert!(picked == "8080" || picked == "8443");
    }
}

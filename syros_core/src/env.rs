//! Environment-variable configuration loading, shared by the agent and
//! indexer binaries.
//!
//! Follows the same shape as the definitions crate's own Vault client:
//! a small `Fail`-derived error kind plus `env::var(..).context(..)?`
//! call sites, rather than a config-file parser — spec.md §6 only
//! specifies *recognized options*, not a file format.

use std::env;
use std::fmt::{self, Display};

use failure::{Backtrace, Context, Fail, ResultExt};

use crate::{Error, Result};

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum CfgErrKind {
    #[fail(display = "required config '{}' not specified", _0)]
    Missing(String),
    #[fail(display = "config '{}' has invalid value '{}'", _0, _1)]
    Invalid(String, String),
}

#[derive(Debug)]
pub struct CfgError {
    inner: Context<CfgErrKind>,
}

impl Fail for CfgError {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }
    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}
impl Display for CfgError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}
impl From<CfgErrKind> for CfgError {
    fn from(kind: CfgErrKind) -> CfgError {
        CfgError { inner: Context::new(kind) }
    }
}
impl From<Context<CfgErrKind>> for CfgError {
    fn from(inner: Context<CfgErrKind>) -> CfgError {
        CfgError { inner }
    }
}

/// Read a required string variable.
pub fn required(name: &str) -> Result<String> {
    Ok(env::var(name).context(CfgErrKind::Missing(name.to_string()))?)
}

/// Read a string variable, falling back to `default` if unset.
pub fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a numeric variable, falling back to `default` if unset.
pub fn optional_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(v) => v.parse::<u64>().map_err(|_| -> Error {
            CfgError::from(CfgErrKind::Invalid(name.to_string(), v)).into()
        }),
        Err(_) => Ok(default),
    }
}

/// Split a comma-delimited list, trimming whitespace and dropping empties.
/// Used for `DockerApiAddresses`/`ConsulApiAddresses`-style options.
pub fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        assert_eq!(
            comma_list(" a , b ,,c"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn empty_list_is_empty() {
        assert!(comma_list("").is_empty());
    }
}

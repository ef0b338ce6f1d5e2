//! Version query parsing and evaluation.
//!
//! A version query is the part after `@` in a selector (`example.com/foo@v1.2`)
//! and the constraint passed to a [`QueryService`](crate::query::QueryService).
//!
//! # Query Syntax Reference
//!
//! | Syntax | Description | Example |
//! |--------|-------------|---------|
//! | `latest` | Highest release, else pre-release, else pseudo-version | `latest` |
//! | `upgrade` | Same as `latest` at this layer | `upgrade` |
//! | Exact | A canonical version | `v1.2.3`, `v2.0.0-rc.1` |
//! | Prefix | Highest version with that major or major.minor | `v1`, `v1.2` |
//! | Comparison | Nearest version satisfying the bound | `<v2.0.0`, `>=v1.4` |
//! | Revision | Any other token, matched verbatim | `abc123` |
//!
//! For `<` and `<=` the nearest version is the highest one below the bound; for
//! `>` and `>=` it is the lowest one above. Releases are preferred over
//! pre-releases in every query kind except an exact match.

use semver::Version;
use std::cmp::Ordering;

use super::{is_pseudo_version, is_stable, parse_module_version, precedence};
use crate::core::ModinvError;

/// Comparison operator of a [`VersionQuery::Compare`] query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
}

impl CompareOp {
    fn admits(self, ordering: Ordering) -> bool {
        match self {
            Self::Less => ordering == Ordering::Less,
            Self::LessEq => ordering != Ordering::Greater,
            Self::Greater => ordering == Ordering::Greater,
            Self::GreaterEq => ordering != Ordering::Less,
        }
    }

    const fn wants_highest(self) -> bool {
        matches!(self, Self::Less | Self::LessEq)
    }
}

/// A parsed version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionQuery {
    /// `latest`
    Latest,
    /// `upgrade`
    Upgrade,
    /// A canonical version that must be known verbatim.
    Exact(String),
    /// `vMAJOR` or `vMAJOR.MINOR`
    Prefix {
        /// Required major version
        major: u64,
        /// Required minor version, if given
        minor: Option<u64>,
    },
    /// `<v`, `<=v`, `>v`, `>=v`
    Compare {
        /// The operator
        op: CompareOp,
        /// The bound, canonicalized
        bound: Version,
    },
    /// Any other token, treated as a revision identifier.
    Revision(String),
}

impl VersionQuery {
    /// Parses a query string.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::InvalidVersionConstraint`] for an empty query or
    /// a comparison whose bound is not a version.
    pub fn parse(query: &str) -> Result<Self, ModinvError> {
        let query = query.trim();
        let invalid = || ModinvError::InvalidVersionConstraint {
            constraint: query.to_string(),
        };

        if query.is_empty() {
            return Err(invalid());
        }

        match query {
            "latest" => return Ok(Self::Latest),
            "upgrade" => return Ok(Self::Upgrade),
            _ => {}
        }

        let operators = [
            ("<=", CompareOp::LessEq),
            (">=", CompareOp::GreaterEq),
            ("<", CompareOp::Less),
            (">", CompareOp::Greater),
        ];
        for (token, op) in operators {
            if let Some(rest) = query.strip_prefix(token) {
                let bound = canonicalize(rest.trim()).ok_or_else(invalid)?;
                return Ok(Self::Compare {
                    op,
                    bound,
                });
            }
        }

        if parse_module_version(query).is_some() {
            return Ok(Self::Exact(query.to_string()));
        }

        if let Some((major, minor)) = parse_prefix(query) {
            return Ok(Self::Prefix {
                major,
                minor,
            });
        }

        Ok(Self::Revision(query.to_string()))
    }

    /// Selects the version this query resolves to among `versions`.
    ///
    /// Returns `None` when nothing matches.
    #[must_use]
    pub fn select<'a>(&self, versions: &'a [String]) -> Option<&'a String> {
        let parsed: Vec<(&String, Version)> = versions
            .iter()
            .filter_map(|v| parse_module_version(v).map(|parsed| (v, parsed)))
            .collect();

        match self {
            Self::Latest | Self::Upgrade => super::VersionComparator::latest(versions),
            Self::Exact(version) | Self::Revision(version) => {
                versions.iter().find(|candidate| *candidate == version)
            }
            Self::Prefix {
                major,
                minor,
            } => {
                let matching = parsed.iter().filter(|(raw, v)| {
                    v.major == *major
                        && minor.is_none_or(|m| v.minor == m)
                        && !is_pseudo_version(raw)
                });
                prefer_stable(matching, true)
            }
            Self::Compare {
                op,
                bound,
            } => {
                let matching = parsed.iter().filter(|(_, v)| op.admits(precedence(v, bound)));
                prefer_stable(matching, op.wants_highest())
            }
        }
    }
}

/// Picks the highest (or lowest) release among `candidates`, falling back to
/// pre-releases when no release qualifies.
fn prefer_stable<'v, 'a: 'v>(
    candidates: impl Iterator<Item = &'v (&'a String, Version)> + Clone,
    highest: bool,
) -> Option<&'a String> {
    let pick = |stable_only: bool| {
        let iter = candidates.clone().filter(|(raw, _)| !stable_only || is_stable(raw));
        let chosen = if highest {
            iter.max_by(|(_, a), (_, b)| precedence(a, b))
        } else {
            iter.min_by(|(_, a), (_, b)| precedence(a, b))
        };
        chosen.map(|(raw, _)| *raw)
    };

    pick(true).or_else(|| pick(false))
}

/// Parses `vMAJOR` or `vMAJOR.MINOR`.
fn parse_prefix(query: &str) -> Option<(u64, Option<u64>)> {
    let digits = query.strip_prefix('v')?;
    let mut parts = digits.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(m) => Some(m.parse().ok()?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor))
}

/// Accepts full versions and the `vX` / `vX.Y` shorthands as comparison bounds.
fn canonicalize(bound: &str) -> Option<Version> {
    if let Some(version) = parse_module_version(bound) {
        return Some(version);
    }
    parse_prefix(bound).map(|(major, minor)| Version::new(major, minor.unwrap_or(0), 0))
}

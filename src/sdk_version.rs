//! SDK version constraint derivation
//!
//! An exact runtime version pin is too strict for SDK selection: any SDK in
//! the same major.minor line can build and run that runtime. This module
//! relaxes an exact version into the wildcarded constraint handed to the
//! dependency resolver.

/// Derives an SDK version constraint from an exact runtime version.
///
/// The patch component is replaced with `*`; components after the first
/// wildcard are dropped. An empty version yields the universal constraint.
///
/// # Example
///
/// ```
/// use dotpack::sdk_version::sdk_constraint;
///
/// assert_eq!(sdk_constraint("6.0.3"), "6.0.*");
/// assert_eq!(sdk_constraint("6.0"), "6.0.*");
/// assert_eq!(sdk_constraint(""), "*");
/// ```
pub fn sdk_constraint(version: &str) -> String {
    if version.is_empty() {
        return "*".to_string();
    }

    let mut pieces: Vec<&str> = version.splitn(3, '.').collect();
    if pieces.len() < 3 {
        pieces.push("*");
    }

    let mut parts: Vec<&str> = Vec::new();
    let count = pieces.len();
    for (i, piece) in pieces.into_iter().enumerate() {
        // The last slot is always the patch position, supplied or padded.
        let part = if i + 1 == count { "*" } else { piece };
        parts.push(part);

        if part == "*" {
            break;
        }
    }

    parts.join(".")
}

//! Route normalization for metric labels.
//!
//! Request paths that carry resource identifiers (`/api/users/123`) would
//! create one label value per resource. [`normalize_route`] collapses those
//! identifier segments into a single placeholder so the `route` label stays
//! bounded by the number of declared endpoints.
//!
//! # Rules
//!
//! 1. A route template resolved by the router is trusted as-is.
//! 2. Paths outside the `/api/` namespace (`/health`, `/metrics`, ...) are
//!    fixed and pass through unchanged.
//! 3. Otherwise every identifier-shaped segment becomes [`ID_PLACEHOLDER`].
//!
//! Normalization is total and idempotent: the placeholder itself matches
//! none of the identifier shapes.

/// Placeholder substituted for identifier segments.
pub const ID_PLACEHOLDER: &str = ":id";

/// Path marker for the API namespace. Only paths containing it are rewritten.
pub const API_PATH_MARKER: &str = "/api/";

/// Minimum length of a segment treated as an opaque token.
pub const MIN_OPAQUE_TOKEN_LEN: usize = 10;

/// Hex group lengths of a hyphenated UUID (8-4-4-4-12).
const UUID_GROUP_LENS: [usize; 5] = [8, 4, 4, 4, 12];

/// Identifier shapes recognized in a path segment.
///
/// Checked in declaration order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierShape {
    /// Hyphenated UUID, any case.
    Uuid,
    /// One or more ASCII decimal digits.
    Numeric,
    /// Ten or more characters from `[A-Za-z0-9_-]`.
    OpaqueToken,
}

/// Normalize a request path into a bounded-cardinality route label.
///
/// # Examples
///
/// ```
/// use demo_service::observability::route::normalize_route;
///
/// assert_eq!(normalize_route("/api/users/123", None), "/api/users/:id");
/// assert_eq!(normalize_route("/health", None), "/health");
/// assert_eq!(
///     normalize_route("/api/users/999", Some("/api/users/:id")),
///     "/api/users/:id"
/// );
/// ```
pub fn normalize_route(raw_path: &str, matched_template: Option<&str>) -> String {
    if let Some(template) = matched_template {
        return template.to_string();
    }

    if !raw_path.contains(API_PATH_MARKER) {
        return raw_path.to_string();
    }

    raw_path
        .split('/')
        .map(|segment| match classify_segment(segment) {
            Some(_) => ID_PLACEHOLDER,
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Classify a single path segment, returning the first identifier shape it matches.
pub fn classify_segment(segment: &str) -> Option<IdentifierShape> {
    if is_uuid(segment) {
        Some(IdentifierShape::Uuid)
    } else if is_numeric(segment) {
        Some(IdentifierShape::Numeric)
    } else if is_opaque_token(segment) {
        Some(IdentifierShape::OpaqueToken)
    } else {
        None
    }
}

fn is_uuid(segment: &str) -> bool {
    let mut groups = segment.split('-');
    let groups_match = UUID_GROUP_LENS.iter().all(|&len| {
        groups
            .next()
            .is_some_and(|group| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()))
    });
    groups_match && groups.next().is_none()
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn is_opaque_token(segment: &str) -> bool {
    // All accepted bytes are ASCII, so byte length equals character count.
    segment.len() >= MIN_OPAQUE_TOKEN_LEN
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

//! Resource identifier matching
//!
//! Resolves a literal resource identifier (an ARN) to the resource type whose
//! template it structurally matches. Templates and identifiers are compared
//! segment by segment after splitting on `:` and `/`.

use log::{trace, warn};
use regex::Regex;
use std::sync::OnceLock;

use crate::catalog::{ResourceType, Store};
use crate::errors::{CatalogError, Result};

/// Minimum number of `:`-separated fields in an ARN
const ARN_FIELD_COUNT: usize = 6;

const PLACEHOLDER_PATTERN: &str = r"\$\{([^}]*)\}";

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches `${Name}` placeholder tokens, capturing the name.
pub(crate) fn placeholder_regex() -> Result<&'static Regex> {
    if let Some(regex) = PLACEHOLDER_REGEX.get() {
        return Ok(regex);
    }
    let regex = Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| CatalogError::configuration_with_source("invalid placeholder pattern", e))?;
    Ok(PLACEHOLDER_REGEX.get_or_init(|| regex))
}

/// Split an identifier or template into positional segments.
#[must_use]
pub fn split_segments(value: &str) -> Vec<&str> {
    value.split([':', '/']).collect()
}

#[derive(Debug, Clone)]
enum TemplateSegment {
    /// Must equal the identifier segment exactly
    Literal(String),
    /// A whole-segment `${Name}`; matches any non-empty value
    Placeholder,
    /// Literal text mixed with placeholders, e.g. `db-${Id}`
    Pattern(Regex),
}

/// A parsed resource identifier template.
#[derive(Debug, Clone)]
pub struct ArnTemplate {
    raw: String,
    segments: Vec<TemplateSegment>,
    placeholders: Vec<String>,
}

impl ArnTemplate {
    /// Parse a template such as `arn:${Partition}:s3:::${BucketName}/${ObjectName}`.
    ///
    /// # Errors
    /// `CatalogError::MalformedIdentifier` for empty placeholders (`${}`) and
    /// unterminated `${`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::malformed(raw, "empty resource template"));
        }

        let regex = placeholder_regex()?;
        let segments = split_segments(trimmed)
            .into_iter()
            .map(|segment| parse_segment(regex, raw, segment))
            .collect::<Result<Vec<_>>>()?;
        let placeholders = regex
            .captures_iter(trimmed)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect();

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
            placeholders,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the placeholders, in order of appearance
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of segments without any placeholder
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, TemplateSegment::Literal(_)))
            .count()
    }

    /// Length of the leading run of literal segments
    #[must_use]
    pub fn literal_prefix_len(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| matches!(s, TemplateSegment::Literal(_)))
            .count()
    }

    /// Structural match against an identifier's segments.
    #[must_use]
    pub fn matches(&self, identifier_segments: &[&str]) -> bool {
        self.segments.len() == identifier_segments.len()
            && self
                .segments
                .iter()
                .zip(identifier_segments)
                .all(|(template, value)| match template {
                    TemplateSegment::Literal(literal) => literal == value,
                    TemplateSegment::Placeholder => !value.is_empty(),
                    TemplateSegment::Pattern(pattern) => pattern.is_match(value),
                })
    }

    /// Specificity used to break ties between matching templates
    fn specificity(&self) -> (usize, usize) {
        (self.literal_count(), self.literal_prefix_len())
    }
}

fn parse_segment(regex: &Regex, raw: &str, segment: &str) -> Result<TemplateSegment> {
    if !segment.contains("${") {
        return Ok(TemplateSegment::Literal(segment.to_string()));
    }

    let mut empty_placeholder = false;
    let mut pattern = String::from("^");
    let mut last = 0;
    for caps in regex.captures_iter(segment) {
        let Some(whole) = caps.get(0) else { continue };
        if caps.get(1).map_or(true, |m| m.as_str().trim().is_empty()) {
            empty_placeholder = true;
        }
        pattern.push_str(&regex::escape(&segment[last..whole.start()]));
        pattern.push_str(".+");
        last = whole.end();
    }
    let tail = &segment[last..];
    if last == 0 || tail.contains("${") {
        return Err(CatalogError::malformed(raw, "unterminated placeholder"));
    }
    if empty_placeholder {
        return Err(CatalogError::malformed(raw, "empty placeholder"));
    }
    pattern.push_str(&regex::escape(tail));
    pattern.push('$');

    if is_single_placeholder(regex, segment) {
        return Ok(TemplateSegment::Placeholder);
    }

    Regex::new(&pattern)
        .map(TemplateSegment::Pattern)
        .map_err(|e| CatalogError::malformed(raw, format!("unusable placeholder pattern: {e}")))
}

/// Whether the segment is exactly one placeholder
fn is_single_placeholder(regex: &Regex, segment: &str) -> bool {
    regex
        .find(segment)
        .is_some_and(|m| m.start() == 0 && m.end() == segment.len())
}

/// Validate the overall shape of a literal identifier.
///
/// # Errors
/// `CatalogError::MalformedIdentifier` when the identifier is empty, contains
/// whitespace, lacks the `arn:` prefix or has fewer than six fields.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        return Err(CatalogError::malformed(identifier, "empty resource identifier"));
    }
    if identifier.chars().any(char::is_whitespace) {
        return Err(CatalogError::malformed(
            identifier,
            "resource identifiers cannot contain whitespace",
        ));
    }
    if !identifier.starts_with("arn:") {
        return Err(CatalogError::malformed(identifier, "expected an 'arn:' prefix"));
    }
    if identifier.split(':').count() < ARN_FIELD_COUNT {
        return Err(CatalogError::malformed(
            identifier,
            "expected 'arn:partition:service:region:account:resource'",
        ));
    }
    Ok(())
}

/// The service field of a literal identifier.
///
/// # Errors
/// `CatalogError::MalformedIdentifier` as for [`validate_identifier`], or when
/// the service field is empty.
pub fn service_of(identifier: &str) -> Result<&str> {
    validate_identifier(identifier)?;
    match identifier.split(':').nth(2) {
        Some(service) if !service.is_empty() => Ok(service),
        _ => Err(CatalogError::malformed(identifier, "empty service field")),
    }
}

/// Resolve the resource type a literal identifier belongs to.
///
/// Candidates are every resource type of the named service (all member
/// prefixes for a legacy alias). A template matches when it has the same
/// number of segments and every literal segment is equal. When several
/// templates match, the one with the most literal segments wins, then the one
/// with the longest leading run of literal segments.
///
/// Returns `Ok(None)` when no template matches.
///
/// # Errors
/// * `MalformedIdentifier` if the identifier is not a well-formed ARN
/// * `UnknownService` if the service is not in the catalog
/// * `AmbiguousResourceType` if the best candidates tie on both measures
pub fn match_resource_type<'s>(
    store: &'s Store,
    service: &str,
    identifier: &str,
) -> Result<Option<&'s ResourceType>> {
    validate_identifier(identifier)?;
    let services = store.resolve_service(service)?;
    let segments = split_segments(identifier);

    let mut best: Vec<&ResourceType> = Vec::new();
    for resource_type in services.iter().flat_map(|s| s.resource_types()) {
        if !resource_type.template().matches(&segments) {
            continue;
        }
        trace!(
            "{identifier} matches template {} ({})",
            resource_type.arn_format(),
            resource_type.name()
        );
        match best.first() {
            Some(current) => {
                let ordering = resource_type
                    .template()
                    .specificity()
                    .cmp(&current.template().specificity());
                match ordering {
                    std::cmp::Ordering::Greater => best = vec![resource_type],
                    std::cmp::Ordering::Equal => best.push(resource_type),
                    std::cmp::Ordering::Less => {}
                }
            }
            None => best.push(resource_type),
        }
    }

    match best.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        tied => {
            let candidates: Vec<String> = tied.iter().map(|r| r.name().to_string()).collect();
            warn!(
                "Resource identifier {identifier} matches equally specific resource types in {service}: {candidates:?}"
            );
            Err(CatalogError::AmbiguousResourceType {
                service: service.to_string(),
                identifier: identifier.to_string(),
                candidates,
            })
        }
    }
}

//! Image tag parsing
//!
//! Tags encode an image name and a semantic version as `<image>/v<semver>`,
//! e.g. `ubuntu/v20.04.1`. Tags that do not follow that shape are not errors;
//! they simply belong to no image.
//!
//! Date-style versions such as `22.04.0` carry leading zeros that strict
//! semver rejects, so the numeric core is normalized before parsing.

use crate::types::TaggedVersion;
use regex::Regex;
use semver::Version;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::trace;

static IMAGE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)/v(.+)$").expect("image tag regex is valid"));

/// Split a raw tag into `(image_name, version_string)`.
///
/// The image capture is greedy: `a/v1/v2.0.0` yields `("a/v1", "2.0.0")`.
pub fn parse_tag(raw: &str) -> Option<(&str, &str)> {
    let caps = IMAGE_TAG_RE.captures(raw)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Strip leading zeros from the numeric MAJOR.MINOR.PATCH fields.
///
/// Pre-release and build suffixes are left untouched.
pub fn normalize_version(version: &str) -> Cow<'_, str> {
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);

    if !core.split('.').any(has_leading_zero) {
        return Cow::Borrowed(version);
    }

    let fields: Vec<&str> = core
        .split('.')
        .map(|field| {
            if has_leading_zero(field) {
                match field.trim_start_matches('0') {
                    "" => "0",
                    trimmed => trimmed,
                }
            } else {
                field
            }
        })
        .collect();

    Cow::Owned(format!("{}{}", fields.join("."), suffix))
}

fn has_leading_zero(field: &str) -> bool {
    field.len() > 1 && field.starts_with('0') && field.bytes().all(|b| b.is_ascii_digit())
}

/// Version of `raw` if it is a semver tag of `image`
pub fn parse_image_version(raw: &str, image: &str) -> Option<TaggedVersion> {
    let (name, version) = parse_tag(raw)?;
    if name != image {
        return None;
    }

    match Version::parse(&normalize_version(version)) {
        Ok(parsed) => Some(TaggedVersion::new(parsed, version)),
        Err(e) => {
            trace!("Skipping non-semver tag {}: {}", raw, e);
            None
        }
    }
}

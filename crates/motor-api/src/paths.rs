//! URL path derivation for motor data endpoints.
//!
//! Endpoint paths are derived from provider type names: the `Map` suffix is
//! dropped and the remaining `UpperCamel` name becomes a `lower-hyphen` slug.
//!
//! ```rust
//! use motor_api::paths::{derive_path, motor_data_path};
//!
//! assert_eq!(derive_path("OilFilterTorqueMap").unwrap(), "oil-filter-torque");
//! assert_eq!(
//!     motor_data_path("drain-plug"),
//!     "/v1/vehicle-specifications/{vehicleToEngineConfigId}/drain-plug"
//! );
//! ```

use crate::registry::RegistrationError;

/// Base path of every vehicle specification endpoint.
pub const VEHICLE_SPECIFICATIONS_PREFIX: &str = "/v1/vehicle-specifications";

/// Name of the configuration id path variable.
pub const ID_VARIABLE_NAME: &str = "vehicleToEngineConfigId";

const MAP_SUFFIX: &str = "Map";

/// Derives the endpoint slug for a provider type name.
///
/// A hyphen is inserted before every upper-case letter except the first, and
/// the result is lower-cased. Digits never start a new word.
///
/// # Errors
///
/// Returns [`RegistrationError::MalformedTypeName`] if the name does not end
/// in `Map`, is exactly `Map`, does not start with an upper-case ASCII
/// letter, or contains anything other than ASCII letters and digits.
pub fn derive_path(type_name: &str) -> Result<String, RegistrationError> {
    let malformed = |reason: &'static str| RegistrationError::MalformedTypeName {
        type_name: type_name.to_string(),
        reason,
    };

    let stem = type_name
        .strip_suffix(MAP_SUFFIX)
        .ok_or_else(|| malformed("name must end in `Map`"))?;
    if stem.is_empty() {
        return Err(malformed("name must not be just `Map`"));
    }
    if !stem.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err(malformed("name must start with an upper-case letter"));
    }
    if !stem.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(malformed("name must only contain ASCII letters and digits"));
    }

    let mut slug = String::with_capacity(stem.len() + 4);
    for (i, c) in stem.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
        } else {
            slug.push(c);
        }
    }
    Ok(slug)
}

/// Checks an explicitly chosen slug.
///
/// # Errors
///
/// Returns [`RegistrationError::MalformedSlug`] unless the slug is non-empty
/// lower-case ASCII words separated by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), RegistrationError> {
    let well_formed = slug.split('-').all(|word| {
        !word.is_empty()
            && word
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    });
    if well_formed {
        Ok(())
    } else {
        Err(RegistrationError::MalformedSlug {
            slug: slug.to_string(),
        })
    }
}

/// Returns the documented (`OpenAPI`) path of a motor data endpoint.
#[must_use]
pub fn motor_data_path(slug: &str) -> String {
    format!("{VEHICLE_SPECIFICATIONS_PREFIX}/{{{ID_VARIABLE_NAME}}}/{slug}")
}

/// Converts an `OpenAPI` path template into an axum route template.
///
/// `{name}` segments become `:name`; everything else is kept.
#[must_use]
pub fn route_template(openapi_path: &str) -> String {
    openapi_path
        .split('/')
        .map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .map_or_else(|| segment.to_string(), |name| format!(":{name}"))
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the raw, still percent-encoded id segment of a request path
/// under [`VEHICLE_SPECIFICATIONS_PREFIX`].
#[must_use]
pub fn raw_id_segment(request_path: &str) -> Option<&str> {
    let rest = request_path
        .strip_prefix(VEHICLE_SPECIFICATIONS_PREFIX)?
        .strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    (!segment.is_empty()).then_some(segment)
}

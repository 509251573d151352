use crate::errors::ValidationError;

pub const MAX_NAME_LEN: usize = 253;
pub const MAX_LABEL_LEN: usize = 63;

/// Checks a presentation-format domain name (trailing dot optional).
///
/// Labels must be 1..=63 bytes of printable ASCII other than `.`; the whole
/// name must fit the 253 character presentation limit.
pub fn validate_domain_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return if name == "." {
            Ok(())
        } else {
            Err(ValidationError::MissingName)
        };
    }

    if trimmed.len() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    for label in trimmed.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(ValidationError::InvalidName(name.to_string()));
        }
        if !label.bytes().all(is_label_byte) {
            return Err(ValidationError::InvalidName(name.to_string()));
        }
    }

    Ok(())
}

#[inline]
pub(crate) fn is_label_byte(b: u8) -> bool {
    b.is_ascii_graphic() && b != b'.'
}

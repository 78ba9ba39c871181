//! Value validators shared by the user and group schemas.

const FORBIDDEN_NAME_CHARS: &[char] = &[
    '\t', ',', ':', '+', '&', '#', '%', '^', '(', ')', '!', '@', '~', '*', '?', '<', '>', '=', ' ',
];

pub const MAX_NAME_LEN: usize = 16;
pub const MAX_ID: i64 = 65535;

/// Checks a username or group name.
///
/// Names are 2 to 16 characters, must not start with `-` or `$`, may only
/// carry `$` as the last character and contain no whitespace or shell
/// metacharacters.
pub fn validate_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(format!(
            "expected length between 1 and {}, got {}",
            MAX_NAME_LEN, len
        ));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(format!("must not contain {:?}", c));
    }

    let chars: Vec<char> = name.chars().collect();
    let Some((first, rest)) = chars.split_first() else {
        return Err("must not be empty".to_string());
    };
    let Some((last, middle)) = rest.split_last() else {
        return Err("must be at least 2 characters long".to_string());
    };

    if matches!(first, '-' | '$') || first.is_whitespace() {
        return Err(
            "must not begin with a hyphen and `$` can only be included as the last character"
                .to_string(),
        );
    }

    if middle.iter().any(|c| *c == '$' || c.is_whitespace()) {
        return Err("`$` can only be included as the last character".to_string());
    }

    if last.is_control() {
        return Err(format!("must not end with {:?}", last));
    }

    Ok(())
}

/// Checks a UID or GID.
pub fn validate_unix_id(id: i64) -> Result<(), String> {
    if !(0..=MAX_ID).contains(&id) {
        return Err(format!("expected to be in the range (0 - {}), got {}", MAX_ID, id));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.contains('?') {
        return Err("must not contain '?'".to_string());
    }
    Ok(())
}

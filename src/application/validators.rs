use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Passwords must be at least 8 characters.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
}

/// Optional display names must be at least 2 characters after trimming.
pub fn is_valid_name(name: &str) -> bool {
    name.trim().len() >= 2
}

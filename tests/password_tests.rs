use std::collections::HashSet;

use tea_shop_backend::util::password::*;

#[test]
fn test_hash_password_success() {
    let hash = PasswordUtilsImpl::hash_password("test_password_123").unwrap();

    assert_ne!(hash, "test_password_123");
    assert!(hash.starts_with("$argon2"));
    let parts: Vec<&str> = hash.split('$').collect();
    assert!(parts.len() >= 5, "Hash should have at least 5 parts separated by $");
}

#[test]
fn test_hashes_are_salted() {
    let hashes: HashSet<String> = (0..5)
        .map(|_| PasswordUtilsImpl::hash_password("same_password").unwrap())
        .collect();
    assert_eq!(hashes.len(), 5);
}

#[test]
fn test_verify_password() {
    let hash = PasswordUtilsImpl::hash_password("oolong-42").unwrap();
    assert!(PasswordUtilsImpl::verify_password("oolong-42", &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("oolong-43", &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("", &hash).unwrap());
}

#[test]
fn test_verify_unicode_password() {
    let password = "珍珠奶茶🧋";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();
    assert!(PasswordUtilsImpl::verify_password(password, &hash).unwrap());
}

#[test]
fn test_verify_invalid_hash_format() {
    let result = PasswordUtilsImpl::verify_password("anything", "not-a-phc-string");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}

#[test]
fn test_validate_password_strength() {
    let cases = [
        ("secret", true),
        ("abcdef1234", true),
        ("tea123", true),
        ("12345", false),
        ("", false),
        ("      ", false),
    ];
    for (password, ok) in cases {
        assert_eq!(
            PasswordUtilsImpl::validate_password_strength(password).is_ok(),
            ok,
            "unexpected result for {:?}",
            password
        );
    }
}

#[test]
fn test_strength_counts_characters_not_bytes() {
    // six characters, more than six bytes
    assert!(PasswordUtilsImpl::validate_password_strength("茶茶茶茶茶茶").is_ok());
    let errors = PasswordUtilsImpl::validate_password_strength("茶茶").unwrap_err();
    assert!(errors[0].contains(&MIN_PASSWORD_LENGTH.to_string()));
}

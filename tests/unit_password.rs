use campus::utils::password::{digest_password, verify_password};

#[test]
fn test_digest_is_hex_string() {
    let digest = digest_password("testpassword123");

    assert_eq!(digest.len(), 32);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(digest, "testpassword123");
}

#[test]
fn test_digest_is_deterministic() {
    let first = digest_password("samepassword");
    let second = digest_password("samepassword");

    assert_eq!(first, second);
}

#[test]
fn test_digest_empty_password() {
    // MD5 of the empty string
    assert_eq!(digest_password(""), "d41d8cd98f00b204e9800998ecf8427e");
}

#[test]
fn test_verify_correct_password() {
    let stored = digest_password("correctpassword");

    assert!(verify_password("correctpassword", &stored));
}

#[test]
fn test_verify_incorrect_password() {
    let stored = digest_password("correctpassword");

    assert!(!verify_password("wrongpassword", &stored));
}

#[test]
fn test_verify_single_character_difference() {
    let stored = digest_password("password");

    assert!(!verify_password("passwordx", &stored));
}

#[test]
fn test_verify_is_case_insensitive_on_stored_digest() {
    let stored = digest_password("password").to_uppercase();

    assert!(verify_password("password", &stored));
}

#[test]
fn test_verify_is_case_sensitive_on_password() {
    let stored = digest_password("Password123");

    assert!(!verify_password("password123", &stored));
    assert!(!verify_password("PASSWORD123", &stored));
}

#[test]
fn test_digest_special_characters() {
    let password = "p@ssw0rd!#$%^&*()";
    let stored = digest_password(password);

    assert!(verify_password(password, &stored));
}

#[test]
fn test_digest_unicode_characters() {
    let password = "mật khẩu 密码";
    let stored = digest_password(password);

    assert!(verify_password(password, &stored));
}

#[test]
fn test_verify_empty_stored_digest() {
    assert!(!verify_password("anything", ""));
}

use campus::config::jwt::JwtConfig;
use campus::utils::jwt::{create_access_token, verify_token};

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        issuer: "campus-api".to_string(),
        audience: "campus-admin".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();

    let result = create_access_token(42, "admin@example.com", &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_verify_token_round_trip() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(42, "admin@example.com", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.email, "admin@example.com");
    assert_eq!(claims.iss, "campus-api");
    assert_eq!(claims.aud, "campus-admin");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_token_carries_configured_expiry() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(1, "a@b.c", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("invalid.token.here", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(1, "a@b.c", &jwt_config).unwrap();

    let mut other_config = get_test_jwt_config();
    other_config.secret = "a_completely_different_secret".to_string();

    assert!(verify_token(&token, &other_config).is_err());
}

#[test]
fn test_verify_token_wrong_issuer() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(1, "a@b.c", &jwt_config).unwrap();

    let mut other_config = get_test_jwt_config();
    other_config.issuer = "someone-else".to_string();

    assert!(verify_token(&token, &other_config).is_err());
}

#[test]
fn test_verify_token_wrong_audience() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(1, "a@b.c", &jwt_config).unwrap();

    let mut other_config = get_test_jwt_config();
    other_config.audience = "another-app".to_string();

    assert!(verify_token(&token, &other_config).is_err());
}

#[test]
fn test_tampered_token_rejected() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(1, "a@b.c", &jwt_config).unwrap();

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('x');

    assert!(verify_token(&tampered, &jwt_config).is_err());
}

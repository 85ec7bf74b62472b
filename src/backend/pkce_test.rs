use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

// =============================================================================
// challenge_for
// =============================================================================

#[test]
fn challenge_matches_rfc7636_appendix_b() {
    assert_eq!(
        challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

// =============================================================================
// generate
// =============================================================================

#[test]
fn generate_produces_hex_verifier_and_matching_challenge() {
    let pair = generate();
    assert_eq!(pair.verifier.len(), 64);
    assert!(pair.verifier.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(pair.challenge, challenge_for(&pair.verifier));
    assert_eq!(pair.challenge.len(), 43);
    assert!(!pair.challenge.contains('='));
}

#[test]
fn generate_is_unique() {
    assert_ne!(generate().verifier, generate().verifier);
}

#[test]
fn flow_ids_are_hex_and_unique() {
    let id = flow_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(id, flow_id());
}

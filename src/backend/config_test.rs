use super::*;

fn some(s: &str) -> Option<String> {
    Some(s.to_owned())
}

#[test]
fn new_accepts_real_values_and_trims_slash() {
    let cfg = BackendConfig::new(some("https://abc.supabase.co/"), some("anon"), BackendTimeouts::default()).unwrap();
    assert_eq!(cfg.url, "https://abc.supabase.co");
    assert_eq!(cfg.anon_key, "anon");
    assert_eq!(cfg.timeouts, BackendTimeouts::default());
}

#[test]
fn missing_url_or_key_is_rejected() {
    let cases = [
        (None, some("anon")),
        (some("https://abc.supabase.co"), None),
        (some("   "), some("anon")),
        (some("https://abc.supabase.co"), some("")),
        (None, None),
    ];
    for (url, key) in cases {
        let err = BackendConfig::new(url.clone(), key.clone(), BackendTimeouts::default()).unwrap_err();
        assert!(matches!(err, BackendError::MissingConfig { .. }), "{url:?}/{key:?} gave {err}");
    }
}

#[test]
fn missing_url_names_the_url_variable() {
    let err = BackendConfig::new(None, some("anon"), BackendTimeouts::default()).unwrap_err();
    assert!(err.to_string().contains("SUPABASE_URL"));
}

#[test]
fn placeholder_values_are_rejected() {
    for value in PLACEHOLDER_VALUES {
        let err = BackendConfig::new(some(value), some("anon"), BackendTimeouts::default()).unwrap_err();
        assert!(matches!(err, BackendError::PlaceholderConfig { .. }), "url {value}");
        let err =
            BackendConfig::new(some("https://abc.supabase.co"), some(value), BackendTimeouts::default()).unwrap_err();
        assert!(matches!(err, BackendError::PlaceholderConfig { .. }), "key {value}");
    }
}

#[test]
fn is_placeholder_is_case_insensitive_and_matches_project_template() {
    assert!(is_placeholder("YOUR-SUPABASE-URL"));
    assert!(is_placeholder("https://your-project-ref.supabase.co"));
    assert!(!is_placeholder("https://xyzcompany.supabase.co"));
}

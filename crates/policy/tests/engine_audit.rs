//! End-to-end engine runs against a realistic fact bundle.

use tenken_policy::core::facts::{
    ComponentCensus, ComponentCount, ComponentKind, DeclaredPermission, ExportedComponent,
    LinkDeclaration, PackageId,
};
use tenken_policy::core::DeclaredSdk;
use tenken_policy::{
    ManifestFacts, PolicyEngine, SdkRange, Severity, StaticLinkVerifier, TriBool,
    VerificationStatus,
};

/// A messaging-style app straddling several behavioural thresholds.
fn sample_facts() -> ManifestFacts {
    ManifestFacts {
        package: PackageId {
            name: "com.example.messenger".to_string(),
            version_code: Some("142".to_string()),
            version_name: Some("3.2.1".to_string()),
        },
        declared_sdk: DeclaredSdk {
            min: Some(21),
            max: None,
        },
        components: ComponentCensus {
            activities: ComponentCount {
                total: 12,
                exported: 2,
            },
            receivers: ComponentCount {
                total: 3,
                exported: 1,
            },
            providers: ComponentCount {
                total: 1,
                exported: 1,
            },
            services: ComponentCount {
                total: 4,
                exported: 1,
            },
            ..Default::default()
        },
        required_permissions: vec![
            "android.permission.INTERNET".to_string(),
            "android.permission.CAMERA".to_string(),
            "android.permission.READ_CONTACTS".to_string(),
        ],
        declared_permissions: vec![DeclaredPermission {
            name: "com.example.messenger.BROADCAST".to_string(),
            protection_level: "normal".to_string(),
        }],
        allow_backup: TriBool::Unspecified,
        full_backup_content: Some("backup_rules.xml".to_string()),
        entry_point: Some("com.example.messenger.MainActivity".to_string()),
        exported_components: vec![
            ExportedComponent {
                name: "com.example.messenger.MainActivity".to_string(),
                kind: ComponentKind::Activity,
                permission: None,
                read_permission: None,
                write_permission: None,
            },
            ExportedComponent {
                name: "com.example.messenger.ShareProvider".to_string(),
                kind: ComponentKind::Provider,
                permission: None,
                read_permission: None,
                write_permission: None,
            },
            ExportedComponent {
                name: "com.example.messenger.LinkActivity".to_string(),
                kind: ComponentKind::Activity,
                permission: None,
                read_permission: None,
                write_permission: None,
            },
        ],
        links: vec![LinkDeclaration {
            component: "com.example.messenger.LinkActivity".to_string(),
            kind: ComponentKind::Activity,
            auto_verify: true,
            hosts: vec!["chat.example.com".to_string()],
            uris: vec!["https://chat.example.com/open".to_string()],
        }],
        ..Default::default()
    }
}

#[test]
fn test_full_audit_produces_expected_result_codes() {
    let engine = PolicyEngine::with_default_rules();
    let range = SdkRange::new(21, 34).unwrap();
    let report = engine.run(&sample_facts(), range);

    // no uses-sdk disagreement: declared min matches, max undeclared
    assert_eq!(report.result_code("package-info"), Some(0));
    // CAMERA and READ_CONTACTS
    assert_eq!(report.result_code("required-permissions"), Some(2));
    // the normal-protection custom permission
    assert_eq!(report.result_code("custom-permissions"), Some(1));
    // range straddles 31, only the legacy rules file is present
    assert_eq!(report.result_code("backup"), Some(1));
    // the exported provider; entry point and link activity excluded
    assert_eq!(report.result_code("exported-components"), Some(1));
    // one auto-verify host
    assert_eq!(report.result_code("links"), Some(1));
    // no config, min 21: cleartext allowed by default
    assert_eq!(report.result_code("cleartext-traffic"), Some(1));

    assert_eq!(report.max_severity(), Some(Severity::Critical));
}

#[test]
fn test_engine_is_idempotent_given_constant_verifier() {
    let verifier = StaticLinkVerifier::always(VerificationStatus::Verified);
    let engine =
        PolicyEngine::with_default_rules().with_verifier(std::sync::Arc::new(verifier));
    let facts = sample_facts();
    let range = SdkRange::new(21, 34).unwrap();

    let first = engine.run(&facts, range);
    let second = engine.run(&facts, range);

    assert_eq!(first, second);
    assert_eq!(
        first.to_json().unwrap(),
        second.to_json().unwrap(),
        "serialized reports must be byte-identical"
    );
}

#[test]
fn test_empty_manifest_still_audits_every_group() {
    let engine = PolicyEngine::with_default_rules();
    let range = SdkRange::new(1, 32).unwrap();
    let report = engine.run(&ManifestFacts::default(), range);

    // neutral rules report zero, never nothing
    assert_eq!(report.result_code("required-permissions"), Some(0));
    assert_eq!(report.result_code("custom-permissions"), Some(0));
    assert_eq!(report.result_code("backup"), Some(0));
    assert_eq!(report.result_code("exported-components"), Some(0));
    assert_eq!(report.result_code("unexported-providers"), Some(0));
    assert_eq!(report.result_code("links"), Some(0));

    // default window spans both backup thresholds with no rules files
    let backup_warnings = report
        .findings()
        .iter()
        .filter(|f| f.rule_id == "backup" && f.severity == Severity::Warning)
        .count();
    assert_eq!(backup_warnings, 2);
}

#[test]
fn test_narrow_modern_range_changes_verdicts() {
    let engine = PolicyEngine::with_default_rules();
    let range = SdkRange::new(31, 34).unwrap();
    let mut facts = sample_facts();
    facts.data_extraction_rules = Some("extraction_rules.xml".to_string());
    let report = engine.run(&facts, range);

    // only the modern half applies: legacy file is inert, modern file satisfies
    assert_eq!(report.result_code("backup"), Some(2));
    // min 31 >= 28: cleartext disallowed by default
    assert_eq!(report.result_code("cleartext-traffic"), Some(0));
}

#[test]
fn test_link_verification_statuses_reach_the_report() {
    let verifier = StaticLinkVerifier::always(VerificationStatus::NotFound)
        .with_host("chat.example.com", VerificationStatus::Verified);
    let engine =
        PolicyEngine::with_default_rules().with_verifier(std::sync::Arc::new(verifier));
    let range = SdkRange::new(21, 34).unwrap();
    let report = engine.run(&sample_facts(), range);

    assert!(report.findings().iter().any(|f| f
        .message
        .contains("https://chat.example.com/.well-known/assetlinks.json")));
}

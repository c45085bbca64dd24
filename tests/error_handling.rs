mod common;

use std::io::Write;
use std::sync::atomic::AtomicBool;

use common::{comparator, GRADES};
use copydetect::{
    compare_sources, Comparator, CompareError, ConfigError, DetectionConfig, InputError,
    SourceFile, REASON_INSUFFICIENT_TOKENS, REASON_PARSE_ERROR,
};
use decision::DecisionError;
use tempfile::NamedTempFile;

#[test]
fn whitespace_only_source_is_rejected() {
    let err = comparator()
        .compare_files(
            SourceFile::new("a.py", GRADES),
            SourceFile::new("empty.py", ""),
        )
        .unwrap_err();
    assert_eq!(
        err,
        CompareError::Input(InputError::Empty {
            filename: "empty.py".into()
        })
    );
}

#[test]
fn oversized_source_is_rejected() {
    let cfg = DetectionConfig {
        max_source_bytes: 64,
        ..DetectionConfig::default()
    };
    let err = compare_sources(
        SourceFile::new("big.py", GRADES),
        SourceFile::new("small.py", "x = 1\n"),
        &cfg,
    )
    .unwrap_err();
    match err {
        CompareError::Input(InputError::TooLarge {
            filename, limit, ..
        }) => {
            assert_eq!(filename, "big.py");
            assert_eq!(limit, 64);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_config_prevents_comparison() {
    let cases = [
        "confidence_token_weight: 0.9\n",
        "ast_threshold: -0.1\n",
        "kgram_size: 0\n",
        "winnowing_window: 0\n",
        "token_weight: 0\nast_weight: 0\nhash_weight: 0\n",
        "agreement_strong_max: 0.5\nagreement_moderate_max: 0.3\n",
    ];
    for yaml in cases {
        let err = DetectionConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{yaml}: {err}");
    }

    let bad = DetectionConfig {
        decision_threshold: 1.5,
        ..DetectionConfig::default()
    };
    assert!(matches!(
        Comparator::new(bad),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn config_file_with_bad_yaml_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "token_threshold: [0.7").unwrap();
    let err = DetectionConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::YamlParse(_)));
}

#[test]
fn unlexable_input_degrades_instead_of_failing() {
    let garbage = "x = 1 $ 2\ny = `tick`\nprint(x ? y)\n";
    let cmp = comparator();
    let unit = cmp.prepare(SourceFile::new("garbage.py", garbage)).unwrap();
    assert!(unit.tokens().has_errors());
    assert!(unit.artifacts.parse_error().is_some());

    let v = cmp
        .compare_files(
            SourceFile::new("garbage.py", garbage),
            SourceFile::new("ok.py", "x = 1\n"),
        )
        .unwrap()
        .verdict;
    assert!(v.token_score.is_some());
    assert_eq!(v.ast_score, None);
    assert!(v.partial);
}

#[test]
fn deep_nesting_makes_ast_unavailable() {
    let depth = 1500;
    let deep = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
    let v = comparator()
        .compare_files(
            SourceFile::new("deep.py", deep),
            SourceFile::new("flat.py", "x = 1\n"),
        )
        .unwrap()
        .verdict;
    assert_eq!(v.ast_score, None);
    let reasons: Vec<&str> = v.unavailable.iter().map(|u| u.reason.as_str()).collect();
    assert!(reasons.contains(&REASON_PARSE_ERROR));
    assert!(reasons.contains(&REASON_INSUFFICIENT_TOKENS));
}

#[test]
fn configured_syntax_depth_limits_ast_detector() {
    let nested = format!("x = {}1{}\n", "(".repeat(40), ")".repeat(40));
    let shallow = DetectionConfig::from_yaml("max_syntax_depth: 16\n").unwrap();
    let v = compare_sources(
        SourceFile::new("nested.py", nested.clone()),
        SourceFile::new("copy.py", nested.clone()),
        &shallow,
    )
    .unwrap()
    .verdict;
    assert_eq!(v.ast_score, None);
    assert_eq!(v.token_score, Some(1.0));

    let v = compare_sources(
        SourceFile::new("nested.py", nested.clone()),
        SourceFile::new("copy.py", nested),
        &DetectionConfig::default(),
    )
    .unwrap()
    .verdict;
    assert_eq!(v.ast_score, Some(1.0));
}

#[test]
fn no_usable_detector_is_insufficient_signal() {
    let cfg = DetectionConfig {
        token_weight: 0.0,
        ..DetectionConfig::default()
    };
    let err = compare_sources(
        SourceFile::new("a.py", "def f(:\n"),
        SourceFile::new("b.py", "pass\n"),
        &cfg,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CompareError::Decision(DecisionError::InsufficientSignal(_))
    ));
}

#[test]
fn batch_continues_past_bad_files() {
    let files = vec![
        SourceFile::new("a.py", GRADES),
        SourceFile::new("empty.py", "\n\n"),
        SourceFile::new("b.py", GRADES),
        SourceFile::new("c.py", "def f(:\n"),
    ];
    let cfg = DetectionConfig {
        token_weight: 0.0,
        ..DetectionConfig::default()
    };
    let report = Comparator::new(cfg)
        .unwrap()
        .compare_batch(files, &AtomicBool::new(false))
        .unwrap();
    assert_eq!(report.input_errors.len(), 1);
    assert_eq!(report.input_errors[0].filename, "empty.py");
    assert_eq!(report.pairs_total, 3);
    // Pairs with c.py have only the zero-weight token detector left.
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|f| f.right == "c.py"));
    assert_eq!(report.verdicts.len(), 1);
    assert!(report.verdicts[0].identical_content);
}

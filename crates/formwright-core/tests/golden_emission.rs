//! Golden tests for emitted source
//!
//! Each corpus case is emitted and compared byte-for-byte with its stored
//! snapshot. Run with `UPDATE_GOLDEN=1` to rewrite snapshots.

use formwright_golden::{GoldenConfig, GoldenTestRunner};

/// Run all golden tests in the corpus
#[test]
fn golden_test_suite() {
    let runner = GoldenTestRunner::new(GoldenConfig::from_env());

    match runner.run_batch("*") {
        Ok(results) => {
            println!("All {} golden tests passed!", results.len());
        }
        Err(e) => {
            panic!("Golden tests failed: {}", e);
        }
    }
}

/// Every case in the corpus is discoverable and enabled
#[test]
fn golden_corpus_stats() {
    let runner = GoldenTestRunner::new(GoldenConfig::from_env());

    let stats = runner
        .get_statistics()
        .expect("Failed to get corpus statistics");
    assert!(stats.total_tests >= 3);
    assert_eq!(stats.disabled_tests, 0);

    let tests = runner.list_tests().expect("Failed to list tests");
    assert!(tests.contains(&"basic/contact_form".to_string()));
    assert!(tests.contains(&"invalid/duplicate_names".to_string()));
}

// Individual test cases using the macro
mod individual_tests {
    use formwright_golden::{golden_test, golden_test_batch};

    golden_test!(test_contact_form, "basic/contact_form");
    golden_test!(test_visibility_chain, "conditions/visibility_chain");
    golden_test!(test_duplicate_names, "invalid/duplicate_names");

    golden_test_batch!("conditions");
}

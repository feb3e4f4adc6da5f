//! End-to-end integration tests
//!
//! These tests validate the complete processing pipeline using predefined
//! CSV fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Applies all operations through the engine
//! 3. Generates the report CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path account lifecycles for every account kind
//! - Approval, rejection and closing
//! - Monthly interest accrual
//! - Transfers, including refused ones, and the ledger report
//! - Malformed rows and refused operations
//!
//! Each test is run twice: once with the synchronous strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_bank_engine::cli::{ReportKind, StrategyType};
    use rust_bank_engine::config::BankConfig;
    use rust_bank_engine::strategy::{create_strategy, BatchConfig};
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a test fixture by processing input.csv and comparing with expected.csv
    ///
    /// The async strategy runs with a batch size of 3 so most fixtures span
    /// several batches.
    fn run_test_fixture(fixture_name: &str, report: ReportKind, strategy_type: StrategyType) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let strategy = create_strategy(
            strategy_type,
            BankConfig::default(),
            Some(BatchConfig::new(3, 4)),
            report,
        );

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process operations: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures with both processing strategies
    #[rstest]
    #[case("happy_path", ReportKind::Accounts)]
    #[case("approval_workflow", ReportKind::Accounts)]
    #[case("interest_accrual", ReportKind::Accounts)]
    #[case("transfers", ReportKind::Accounts)]
    #[case("ledger_report", ReportKind::Ledger)]
    #[case("malformed_data", ReportKind::Accounts)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] report: ReportKind,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, report, strategy);
    }
}

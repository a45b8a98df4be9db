//! 통계 집계 모듈
//!
//! Feature 트리 순회를 통한 카운터 계산, 파일 간 합산(fold),
//! 콘솔 요약 출력과 KEY=VALUE 통계 싱크 기록을 담당합니다.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::error::{CukeGateError, Result};
use crate::report::{Feature, Status};

/// 상태별 "실패로 취급하지 않음" 플래그
///
/// `failed` 플래그만 실패 경로 전체(카운터, 상세 기록, 시나리오/Feature
/// 실패 판정)를 비활성화합니다. skipped/pending/undefined 플래그는
/// 해당 상태의 카운터 증가만 막습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFlags {
    pub failed_as_not_failing: bool,
    pub skipped_as_not_failing: bool,
    pub pending_as_not_failing: bool,
    pub undefined_as_not_failing: bool,
}

/// 실패한 스텝의 상세 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedStepDetail {
    pub feature: String,
    pub scenario: String,
    pub step: String,
    pub error_message: String,
}

/// 집계 결과 누산기
///
/// 파일 단위로 생성된 뒤 `merge`를 통해 하나의 전체 집계로 합산됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    /// 전체 Feature 수
    pub feature_count: usize,
    /// 전체 시나리오 수
    pub scenario_count: usize,
    /// 방문한 전체 스텝 수
    pub step_count: usize,
    /// 통과한 스텝 수
    pub passed_tests: usize,
    /// 실패한 스텝 수
    pub failed_tests: usize,
    /// 건너뛴 스텝 수
    pub skipped_tests: usize,
    /// 보류된 스텝 수
    pub pending_tests: usize,
    /// 미정의 스텝 수
    pub undefined_tests: usize,
    /// 누적 실행 시간 (밀리초)
    pub duration_ms: f64,
    /// 실패 스텝 상세 목록
    pub failed_steps: Vec<FailedStepDetail>,
    /// 실패한 Feature 수
    pub total_failed_features: usize,
    /// 통과한 Feature 수
    pub total_passed_features: usize,
    /// 실패한 시나리오 수
    pub total_failed_scenarios: usize,
    /// 통과한 시나리오 수
    pub total_passed_scenarios: usize,
    /// 실패한 스텝 총계
    pub total_failed_steps: usize,
    /// 통과한 스텝 총계
    pub total_passed_steps: usize,
}

/// 0으로 나누기를 방지한 백분율 계산
///
/// 분모가 0이면 0.0을 반환하므로 NaN/Inf가 비교 연산으로 전파되지 않습니다.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl Results {
    /// 실패 스텝 비율 (step_count 대비, %)
    pub fn failure_rate(&self) -> f64 {
        percentage(self.failed_tests, self.step_count)
    }

    /// 건너뛴 스텝 비율 (step_count 대비, %)
    pub fn skipped_rate(&self) -> f64 {
        percentage(self.skipped_tests, self.step_count)
    }

    /// 다른 집계 결과를 필드 단위로 합산
    ///
    /// 모든 카운터는 더하고, 실패 스텝 목록은 이어 붙이고, 실행 시간은
    /// 합산합니다. 교환법칙과 결합법칙을 만족하므로 워커 완료 순서와
    /// 무관하게 동일한 집계가 나옵니다.
    pub fn merge(&mut self, other: &Results) {
        self.feature_count += other.feature_count;
        self.scenario_count += other.scenario_count;
        self.step_count += other.step_count;
        self.passed_tests += other.passed_tests;
        self.failed_tests += other.failed_tests;
        self.skipped_tests += other.skipped_tests;
        self.pending_tests += other.pending_tests;
        self.undefined_tests += other.undefined_tests;
        self.duration_ms += other.duration_ms;
        self.failed_steps.extend(other.failed_steps.iter().cloned());
        self.total_failed_features += other.total_failed_features;
        self.total_passed_features += other.total_passed_features;
        self.total_failed_scenarios += other.total_failed_scenarios;
        self.total_passed_scenarios += other.total_passed_scenarios;
        self.total_failed_steps += other.total_failed_steps;
        self.total_passed_steps += other.total_passed_steps;
    }

    /// 집계 요약을 콘솔에 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 Cucumber 테스트 리포트 요약".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!("  {} 전체 Feature:     {}", "📁".bright_cyan(), self.feature_count);
        println!("  {} 전체 시나리오:    {}", "📄".bright_cyan(), self.scenario_count);
        println!("  {} 전체 스텝:        {}", "🔍".bright_cyan(), self.step_count);
        println!(
            "  {} 실패 Feature:     {}",
            "❌".bright_red(),
            self.total_failed_features.to_string().red()
        );
        println!(
            "  {} 실패 시나리오:    {}",
            "❌".bright_red(),
            self.total_failed_scenarios.to_string().red()
        );
        println!(
            "  {} 실패 스텝:        {}",
            "❌".bright_red(),
            self.total_failed_steps.to_string().red()
        );
        println!(
            "  {} 통과 Feature:     {}",
            "✅".bright_green(),
            self.total_passed_features.to_string().green()
        );
        println!(
            "  {} 통과 시나리오:    {}",
            "✅".bright_green(),
            self.total_passed_scenarios.to_string().green()
        );
        println!(
            "  {} 통과 스텝:        {}",
            "✅".bright_green(),
            self.total_passed_steps.to_string().green()
        );
        println!(
            "  {} 건너뜀:           {}",
            "⏸️".bright_yellow(),
            self.skipped_tests.to_string().yellow()
        );
        println!(
            "  {} 보류:             {}",
            "🔄".bright_yellow(),
            self.pending_tests.to_string().yellow()
        );
        println!(
            "  {} 미정의:           {}",
            "❓".bright_magenta(),
            self.undefined_tests.to_string().magenta()
        );
        println!(
            "  {} 실행 시간:        {:.2} ms",
            "⏱️".bright_cyan(),
            self.duration_ms
        );
        println!("{}", "═".repeat(50).bright_blue());

        if !self.failed_steps.is_empty() {
            println!("\n{}", "❌ 실패 스텝 상세:".bright_red().bold());
            println!("{}", "-".repeat(50).bright_blue());
            for (i, detail) in self.failed_steps.iter().enumerate() {
                println!("  {}. Feature:  {}", i + 1, detail.feature);
                println!("     Scenario: {}", detail.scenario);
                println!("     Step:     {}", detail.step);
                println!("     Error:    {}", detail.error_message.red());
                println!("{}", "-".repeat(50).bright_blue());
            }
        }
    }
}

/// Feature 트리를 순회하여 통계를 계산
///
/// 스텝 방문마다 step_count를 올리고 상태별 카운터를 누적합니다.
/// failed 상태는 `failed_as_not_failing`이 설정되면 실패 경로 전체에서
/// 제외되며, skipped/pending/undefined는 각자의 플래그가 해당 카운터의
/// 증가만 억제합니다. 스텝 duration(나노초)은 밀리초로 변환해 float으로
/// 누적합니다.
pub fn compute_stats(features: &[Feature], flags: &StatusFlags) -> Results {
    let mut results = Results::default();

    for feature in features {
        results.feature_count += 1;
        let mut feature_failed = false;

        for element in &feature.elements {
            results.scenario_count += 1;
            let mut scenario_failed = false;

            for step in &element.steps {
                results.step_count += 1;
                match step.result.status {
                    Status::Passed => {
                        results.passed_tests += 1;
                        results.total_passed_steps += 1;
                    }
                    Status::Failed => {
                        if !flags.failed_as_not_failing {
                            results.failed_tests += 1;
                            results.total_failed_steps += 1;
                            scenario_failed = true;
                            feature_failed = true;
                            results.failed_steps.push(FailedStepDetail {
                                feature: feature.name.clone(),
                                scenario: element.name.clone(),
                                step: step.name.clone(),
                                error_message: step
                                    .result
                                    .error_message
                                    .clone()
                                    .unwrap_or_default(),
                            });
                        }
                    }
                    Status::Skipped => {
                        if !flags.skipped_as_not_failing {
                            results.skipped_tests += 1;
                        }
                    }
                    Status::Pending => {
                        if !flags.pending_as_not_failing {
                            results.pending_tests += 1;
                        }
                    }
                    Status::Undefined => {
                        if !flags.undefined_as_not_failing {
                            results.undefined_tests += 1;
                        }
                    }
                    Status::Unknown => {}
                }
                results.duration_ms += step.result.duration as f64 / 1e6;
            }

            if scenario_failed {
                results.total_failed_scenarios += 1;
            } else {
                results.total_passed_scenarios += 1;
            }
        }

        if feature_failed {
            results.total_failed_features += 1;
        } else {
            results.total_passed_features += 1;
        }
    }

    results
}

/// KEY=VALUE 통계 라인을 싱크 파일에 이어 쓰기
///
/// 기록 순서는 고정되어 있어 출력이 결정적입니다. 비율은 소수점
/// 둘째 자리 백분율 문자열입니다.
pub fn write_stats_file(results: &Results, path: &Path) -> Result<()> {
    let entries = [
        ("FAILED_FEATURES", results.total_failed_features.to_string()),
        ("FAILED_SCENARIOS", results.total_failed_scenarios.to_string()),
        ("FAILED_STEPS", results.total_failed_steps.to_string()),
        ("PASSED_FEATURES", results.total_passed_features.to_string()),
        ("PASSED_SCENARIOS", results.total_passed_scenarios.to_string()),
        ("PASSED_STEPS", results.total_passed_steps.to_string()),
        ("SKIPPED_STEPS", results.skipped_tests.to_string()),
        ("PENDING_STEPS", results.pending_tests.to_string()),
        ("UNDEFINED_STEPS", results.undefined_tests.to_string()),
        ("TOTAL_FEATURES", results.feature_count.to_string()),
        ("TOTAL_SCENARIOS", results.scenario_count.to_string()),
        ("TOTAL_STEPS", results.step_count.to_string()),
        ("FAILURE_RATE", format!("{:.2}", results.failure_rate())),
        ("SKIPPED_RATE", format!("{:.2}", results.skipped_rate())),
    ];

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CukeGateError::StatsWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    for (key, value) in entries {
        writeln!(file, "{key}={value}").map_err(|e| CukeGateError::StatsWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Element, Step, StepResult};

    fn step(name: &str, status: Status, duration: i64, error: Option<&str>) -> Step {
        Step {
            keyword: "Given ".to_string(),
            name: name.to_string(),
            line: 1,
            result: StepResult {
                status,
                duration,
                error_message: error.map(str::to_string),
            },
        }
    }

    fn scenario(name: &str, steps: Vec<Step>) -> Element {
        Element {
            id: String::new(),
            keyword: "Scenario".to_string(),
            name: name.to_string(),
            description: String::new(),
            line: 1,
            element_type: "scenario".to_string(),
            steps,
        }
    }

    fn feature(name: &str, elements: Vec<Element>) -> Feature {
        Feature {
            id: name.to_lowercase().replace(' ', "-"),
            uri: format!("features/{name}.feature"),
            keyword: "Feature".to_string(),
            name: name.to_string(),
            description: String::new(),
            line: 1,
            elements,
        }
    }

    fn mixed_fixture() -> Vec<Feature> {
        vec![
            feature(
                "Login",
                vec![
                    scenario(
                        "valid login",
                        vec![
                            step("open page", Status::Passed, 1_000_000, None),
                            step("submit", Status::Passed, 2_000_000, None),
                        ],
                    ),
                    scenario(
                        "invalid login",
                        vec![
                            step("open page", Status::Passed, 1_000_000, None),
                            step("submit", Status::Failed, 3_000_000, Some("wrong password")),
                            step("see dashboard", Status::Skipped, 0, None),
                        ],
                    ),
                ],
            ),
            feature(
                "Search",
                vec![scenario(
                    "pending search",
                    vec![
                        step("open page", Status::Passed, 1_000_000, None),
                        step("type query", Status::Pending, 0, None),
                        step("see results", Status::Undefined, 0, None),
                    ],
                )],
            ),
        ]
    }

    #[test]
    fn test_compute_stats_counters() {
        let results = compute_stats(&mixed_fixture(), &StatusFlags::default());

        assert_eq!(results.feature_count, 2);
        assert_eq!(results.scenario_count, 3);
        assert_eq!(results.step_count, 8);
        assert_eq!(results.passed_tests, 4);
        assert_eq!(results.failed_tests, 1);
        assert_eq!(results.skipped_tests, 1);
        assert_eq!(results.pending_tests, 1);
        assert_eq!(results.undefined_tests, 1);
        assert_eq!(results.total_failed_features, 1);
        assert_eq!(results.total_passed_features, 1);
        assert_eq!(results.total_failed_scenarios, 1);
        assert_eq!(results.total_passed_scenarios, 2);
        assert!((results.duration_ms - 8.0).abs() < 1e-9);

        assert_eq!(results.failed_steps.len(), 1);
        assert_eq!(results.failed_steps[0].feature, "Login");
        assert_eq!(results.failed_steps[0].scenario, "invalid login");
        assert_eq!(results.failed_steps[0].step, "submit");
        assert_eq!(results.failed_steps[0].error_message, "wrong password");
    }

    #[test]
    fn test_pass_fail_conservation_invariants() {
        let results = compute_stats(&mixed_fixture(), &StatusFlags::default());

        assert_eq!(
            results.total_failed_features + results.total_passed_features,
            results.feature_count
        );
        assert_eq!(
            results.total_failed_scenarios + results.total_passed_scenarios,
            results.scenario_count
        );
    }

    #[test]
    fn test_failed_as_not_failing_breaks_step_conservation() {
        let flags = StatusFlags {
            failed_as_not_failing: true,
            ..StatusFlags::default()
        };
        let results = compute_stats(&mixed_fixture(), &flags);

        // failed 스텝은 어떤 상태 카운터에도 잡히지 않으므로
        // step_count가 상태별 합보다 커집니다.
        let status_sum = results.passed_tests
            + results.failed_tests
            + results.skipped_tests
            + results.pending_tests
            + results.undefined_tests;
        assert_eq!(results.failed_tests, 0);
        assert_eq!(results.step_count, 8);
        assert_eq!(status_sum, 7);
        assert!(results.failed_steps.is_empty());

        // 실패 경로 전체가 비활성화되어 시나리오/Feature도 통과로 집계
        assert_eq!(results.total_failed_features, 0);
        assert_eq!(results.total_failed_scenarios, 0);
    }

    #[test]
    fn test_suppression_flags_gate_only_their_counter() {
        let flags = StatusFlags {
            skipped_as_not_failing: true,
            pending_as_not_failing: true,
            undefined_as_not_failing: true,
            ..StatusFlags::default()
        };
        let results = compute_stats(&mixed_fixture(), &flags);

        assert_eq!(results.skipped_tests, 0);
        assert_eq!(results.pending_tests, 0);
        assert_eq!(results.undefined_tests, 0);
        // failed 경로는 영향 없음
        assert_eq!(results.failed_tests, 1);
        assert_eq!(results.step_count, 8);
    }

    #[test]
    fn test_merge_is_commutative() {
        let fixture = mixed_fixture();
        let a = compute_stats(&fixture[..1], &StatusFlags::default());
        let b = compute_stats(&fixture[1..], &StatusFlags::default());

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab.feature_count, ba.feature_count);
        assert_eq!(ab.step_count, ba.step_count);
        assert_eq!(ab.failed_tests, ba.failed_tests);
        assert_eq!(ab.total_passed_scenarios, ba.total_passed_scenarios);
        assert!((ab.duration_ms - ba.duration_ms).abs() < 1e-9);
        assert_eq!(ab.failed_steps.len(), ba.failed_steps.len());
    }

    #[test]
    fn test_merge_with_default_is_identity() {
        let results = compute_stats(&mixed_fixture(), &StatusFlags::default());
        let mut merged = Results::default();
        merged.merge(&results);
        assert_eq!(merged, results);
    }

    #[test]
    fn test_percentage_guards_zero_total() {
        assert_eq!(percentage(5, 0), 0.0);
        assert!((percentage(21, 100) - 21.0).abs() < 1e-9);
        let empty = Results::default();
        assert_eq!(empty.failure_rate(), 0.0);
        assert_eq!(empty.skipped_rate(), 0.0);
    }

    #[test]
    fn test_write_stats_file_appends_fixed_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stats.env");

        let mut results = Results::default();
        results.feature_count = 2;
        results.scenario_count = 4;
        results.step_count = 12;
        results.failed_tests = 3;
        results.skipped_tests = 2;
        results.total_failed_features = 2;
        results.total_failed_scenarios = 3;
        results.total_passed_scenarios = 1;
        results.total_failed_steps = 3;
        results.total_passed_steps = 7;

        write_stats_file(&results, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "FAILED_FEATURES=2");
        assert_eq!(lines[1], "FAILED_SCENARIOS=3");
        assert_eq!(lines[2], "FAILED_STEPS=3");
        assert_eq!(lines[9], "TOTAL_FEATURES=2");
        assert_eq!(lines[11], "TOTAL_STEPS=12");
        assert_eq!(lines[12], "FAILURE_RATE=25.00");
        assert_eq!(lines[13], "SKIPPED_RATE=16.67");

        // append 모드: 두 번 쓰면 라인이 누적됨
        write_stats_file(&results, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 28);
    }
}

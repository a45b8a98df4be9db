//! 임계값 평가 모듈
//!
//! 집계 결과에 절대 개수/백분율 한도를 순서대로 적용하여 빌드 실패
//! 여부를 판정합니다. 첫 번째 위반에서 즉시 중단합니다(short-circuit).

use crate::error::{CukeGateError, Result};
use crate::stats::{percentage, Results};

/// 최대 12개의 독립 한도 (0은 비활성)
///
/// Feature/시나리오 한도는 Feature/시나리오 단위 실패 수와 비교합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thresholds {
    pub failed_features_number: u32,
    pub failed_features_percentage: f64,
    pub failed_scenarios_number: u32,
    pub failed_scenarios_percentage: f64,
    pub failed_steps_number: u32,
    pub failed_steps_percentage: f64,
    pub pending_steps_number: u32,
    pub pending_steps_percentage: f64,
    pub skipped_steps_number: u32,
    pub skipped_steps_percentage: f64,
    pub undefined_steps_number: u32,
    pub undefined_steps_percentage: f64,
}

impl Thresholds {
    /// 설정 값 검증 (백분율 한도는 음수 불가)
    pub fn validate(&self) -> Result<()> {
        let percentages = [
            self.failed_features_percentage,
            self.failed_scenarios_percentage,
            self.failed_steps_percentage,
            self.pending_steps_percentage,
            self.skipped_steps_percentage,
            self.undefined_steps_percentage,
        ];
        if percentages.iter().any(|p| *p < 0.0) {
            return Err(CukeGateError::Config {
                reason: "threshold values must be non-negative. Check the configured values"
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// 개수 한도 검사 (limit이 0이면 비활성)
fn check_count(observed: usize, limit: u32, dimension: &str) -> Result<()> {
    if limit > 0 && observed > limit as usize {
        return Err(CukeGateError::ThresholdExceeded {
            dimension: dimension.to_string(),
            observed: observed.to_string(),
            limit: limit.to_string(),
        });
    }
    Ok(())
}

/// 백분율 한도 검사 (limit이 0이면 비활성, 분모 0이면 0%로 취급)
fn check_percentage(part: usize, total: usize, limit: f64, dimension: &str) -> Result<()> {
    if limit > 0.0 {
        let rate = percentage(part, total);
        if rate > limit {
            return Err(CukeGateError::ThresholdExceeded {
                dimension: dimension.to_string(),
                observed: format!("{rate:.2}%"),
                limit: format!("{limit:.2}%"),
            });
        }
    }
    Ok(())
}

/// 집계 결과에 모든 활성 한도를 순서대로 적용
///
/// 평가 순서: 실패 Feature/시나리오/스텝 개수 → 대응 백분율 →
/// pending 개수/백분율 → skipped 개수/백분율 → undefined 개수/백분율.
/// 첫 위반을 에러로 반환하고 나머지 검사는 수행하지 않습니다.
pub fn evaluate(results: &Results, thresholds: &Thresholds) -> Result<()> {
    check_count(
        results.total_failed_features,
        thresholds.failed_features_number,
        "failed features count",
    )?;
    check_count(
        results.total_failed_scenarios,
        thresholds.failed_scenarios_number,
        "failed scenarios count",
    )?;
    check_count(
        results.failed_tests,
        thresholds.failed_steps_number,
        "failed steps count",
    )?;

    check_percentage(
        results.total_failed_features,
        results.feature_count,
        thresholds.failed_features_percentage,
        "failed features percentage",
    )?;
    check_percentage(
        results.total_failed_scenarios,
        results.scenario_count,
        thresholds.failed_scenarios_percentage,
        "failed scenarios percentage",
    )?;
    check_percentage(
        results.failed_tests,
        results.step_count,
        thresholds.failed_steps_percentage,
        "failed steps percentage",
    )?;

    check_count(
        results.pending_tests,
        thresholds.pending_steps_number,
        "pending steps count",
    )?;
    check_percentage(
        results.pending_tests,
        results.step_count,
        thresholds.pending_steps_percentage,
        "pending steps percentage",
    )?;

    check_count(
        results.skipped_tests,
        thresholds.skipped_steps_number,
        "skipped steps count",
    )?;
    check_percentage(
        results.skipped_tests,
        results.step_count,
        thresholds.skipped_steps_percentage,
        "skipped steps percentage",
    )?;

    check_count(
        results.undefined_tests,
        thresholds.undefined_steps_number,
        "undefined steps count",
    )?;
    check_percentage(
        results.undefined_tests,
        results.step_count,
        thresholds.undefined_steps_percentage,
        "undefined steps percentage",
    )?;

    Ok(())
}

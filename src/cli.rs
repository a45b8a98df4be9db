//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.
//! 옵션들은 도메인 설정(ProcessOptions, StatusFlags, Thresholds)으로
//! 변환되어 코어에 전달됩니다.

use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::processor::ProcessOptions;
use crate::report::SortingMethod;
use crate::stats::StatusFlags;
use crate::thresholds::Thresholds;

/// 통계 싱크 경로를 지정하는 환경 변수 (CI 러너가 주입)
pub const OUTPUT_ENV_VAR: &str = "CUKEGATE_OUTPUT";

/// cukegate CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "cukegate",
    author = "YourName <your@email.com>",
    version,
    about = "CUCUMBER REPORT GATE - Cucumber JSON 리포트를 집계하고 빌드 실패 여부를 판정하는 CLI 도구",
    long_about = r#"
CUCUMBER REPORT GATE
====================

디렉토리 내의 Cucumber JSON 리포트 파일들을 병렬로 집계하여
통과/실패/건너뜀/보류/미정의 스텝 수를 계산하고, 설정된 절대 개수·
백분율 임계값을 기준으로 빌드 실패 여부를 판정합니다.

특징:
  • 제한된 워커 풀 기반 병렬 리포트 처리
  • 파일 단위 실패 허용 (개별 파일 에러는 경고로 수집)
  • Feature/시나리오/스텝 3단계 실패 집계
  • 12종 임계값 게이트 + stop-build 즉시 중단 게이트
  • KEY=VALUE 통계 싱크 출력 (CI 연동)

예제:
  cukegate -d ./reports
  cukegate -d ./reports -i "**/*.json" -e "**/draft*"
  cukegate -d ./reports --merge-features-by-id --sorting alphabetical
  cukegate -d ./reports --failed-steps-percentage 20.0
  cukegate -d ./reports --stop-build-on-failed-report
"#
)]
pub struct Args {
    /// Cucumber JSON 리포트가 있는 디렉토리
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// 포함 글로브 패턴 (디렉토리 기준 상대 경로)
    #[arg(short, long, default_value = "**/*.json")]
    pub include: String,

    /// 제외 글로브 패턴 (매치되는 파일은 후보에서 제거)
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// 빈 JSON 파일을 파싱 에러 대신 무시
    #[arg(long)]
    pub skip_empty_files: bool,

    /// 동일 id를 가진 Feature들을 하나로 병합
    #[arg(long)]
    pub merge_features_by_id: bool,

    /// Feature 정렬 방식
    #[arg(long, value_enum, default_value_t = SortingMethod::Natural)]
    pub sorting: SortingMethod,

    /// failed 스텝을 실패로 취급하지 않음 (실패 경로 전체 비활성)
    #[arg(long)]
    pub failed_as_not_failing: bool,

    /// skipped 스텝 카운터 비활성
    #[arg(long)]
    pub skipped_as_not_failing: bool,

    /// pending 스텝 카운터 비활성
    #[arg(long)]
    pub pending_as_not_failing: bool,

    /// undefined 스텝 카운터 비활성
    #[arg(long)]
    pub undefined_as_not_failing: bool,

    /// 실패 Feature 수 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0)]
    pub failed_features_number: u32,

    /// 실패 Feature 백분율 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0.0)]
    pub failed_features_percentage: f64,

    /// 실패 시나리오 수 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0)]
    pub failed_scenarios_number: u32,

    /// 실패 시나리오 백분율 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0.0)]
    pub failed_scenarios_percentage: f64,

    /// 실패 스텝 수 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0)]
    pub failed_steps_number: u32,

    /// 실패 스텝 백분율 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0.0)]
    pub failed_steps_percentage: f64,

    /// 보류 스텝 수 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0)]
    pub pending_steps_number: u32,

    /// 보류 스텝 백분율 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0.0)]
    pub pending_steps_percentage: f64,

    /// 건너뜀 스텝 수 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0)]
    pub skipped_steps_number: u32,

    /// 건너뜀 스텝 백분율 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0.0)]
    pub skipped_steps_percentage: f64,

    /// 미정의 스텝 수 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0)]
    pub undefined_steps_number: u32,

    /// 미정의 스텝 백분율 한도 (0 = 비활성)
    #[arg(long, default_value_t = 0.0)]
    pub undefined_steps_percentage: f64,

    /// 실패 스텝이 하나라도 있으면 임계값 평가 전에 즉시 빌드 중단
    #[arg(long)]
    pub stop_build_on_failed_report: bool,

    /// KEY=VALUE 통계 파일 경로 (미지정 시 CUKEGATE_OUTPUT 환경 변수 사용)
    #[arg(long)]
    pub stats_file: Option<PathBuf>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 인자 값 검증 (임계값 범위 등)
    pub fn validate(&self) -> Result<()> {
        self.thresholds().validate()
    }

    /// 상태별 실패 취급 플래그로 변환
    pub fn status_flags(&self) -> StatusFlags {
        StatusFlags {
            failed_as_not_failing: self.failed_as_not_failing,
            skipped_as_not_failing: self.skipped_as_not_failing,
            pending_as_not_failing: self.pending_as_not_failing,
            undefined_as_not_failing: self.undefined_as_not_failing,
        }
    }

    /// 임계값 설정으로 변환
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            failed_features_number: self.failed_features_number,
            failed_features_percentage: self.failed_features_percentage,
            failed_scenarios_number: self.failed_scenarios_number,
            failed_scenarios_percentage: self.failed_scenarios_percentage,
            failed_steps_number: self.failed_steps_number,
            failed_steps_percentage: self.failed_steps_percentage,
            pending_steps_number: self.pending_steps_number,
            pending_steps_percentage: self.pending_steps_percentage,
            skipped_steps_number: self.skipped_steps_number,
            skipped_steps_percentage: self.skipped_steps_percentage,
            undefined_steps_number: self.undefined_steps_number,
            undefined_steps_percentage: self.undefined_steps_percentage,
        }
    }

    /// 파일 처리 옵션으로 변환
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions::new()
            .with_skip_empty(self.skip_empty_files)
            .with_merge_features(self.merge_features_by_id)
            .with_sorting(self.sorting)
            .with_flags(self.status_flags())
    }

    /// 통계 싱크 경로 결정 (인자 우선, 없으면 환경 변수)
    pub fn stats_path(&self) -> Option<PathBuf> {
        self.stats_file.clone().or_else(|| {
            std::env::var_os(OUTPUT_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }
}

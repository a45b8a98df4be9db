//! cukegate - CUCUMBER REPORT GATE
//!
//! 디렉토리 내 Cucumber JSON 리포트 파일들을 병렬로 집계하고, 설정된
//! 임계값을 기준으로 빌드 실패 여부를 판정하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🚀 **병렬 처리**: 제한된 워커 풀로 여러 리포트 파일 동시 집계
//! - 🔍 **패턴 탐색**: include/exclude 글로브 패턴 기반 리포트 파일 탐색
//! - 🧩 **Feature 병합**: 동일 id의 Feature를 하나로 병합 (결정적 순서)
//! - 📊 **3단계 집계**: Feature/시나리오/스텝 단위 통과·실패 카운터
//! - 🚦 **임계값 게이트**: 개수·백분율 12종 한도 + stop-build 즉시 중단
//! - 🛡️ **부분 실패 허용**: 개별 파일 에러는 경고로 수집, 나머지는 계속
//! - 📤 **통계 싱크**: KEY=VALUE 라인을 CI 출력 파일에 기록
//! - 🎨 **컬러 출력**: 가독성 높은 컬러 터미널 요약
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! cukegate -d ./reports
//!
//! # 실패 스텝 20% 초과 시 빌드 실패
//! cukegate -d ./reports --failed-steps-percentage 20.0
//!
//! # Feature 병합 + 알파벳 정렬
//! cukegate -d ./reports --merge-features-by-id --sorting alphabetical
//! ```

pub mod cli;
pub mod error;
pub mod locator;
pub mod processor;
pub mod report;
pub mod runner;
pub mod stats;
pub mod thresholds;

// Re-exports for convenient access
pub use cli::Args;
pub use error::{CukeGateError, Result};
pub use locator::{locate_files, ReportMatcher};
pub use processor::{process_file, ProcessOptions};
pub use report::{merge_features_by_id, Feature, SortingMethod, Status};
pub use runner::{process_reports, RunOutcome, MAX_WORKERS};
pub use stats::{compute_stats, write_stats_file, FailedStepDetail, Results, StatusFlags};
pub use thresholds::{evaluate, Thresholds};

//! 에러 타입 정의 모듈
//!
//! cukegate에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 에러 메시지는 CI 로그에서 grep되는 외부 계약이므로 영어로 유지합니다.

use std::path::PathBuf;
use thiserror::Error;

/// cukegate에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum CukeGateError {
    /// 잘못된 설정 값 (음수 퍼센트 임계값 등)
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// 유효하지 않은 글로브 패턴
    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 패턴과 일치하는 리포트 파일 없음
    #[error("no files found matching the report filename pattern")]
    NoFilesFound,

    /// 일치하는 파일은 있으나 읽을 수 있는 파일 없음
    #[error("no readable files found matching the report filename pattern")]
    NoReadableFiles,

    /// 리포트 파일 열기/읽기 실패
    #[error("failed to read file {}: {reason}", .file.display())]
    FileOpen { file: PathBuf, reason: String },

    /// Cucumber JSON 파싱 실패
    #[error("failed to parse Cucumber JSON for file {}: {reason}", .file.display())]
    Parse { file: PathBuf, reason: String },

    /// 모든 리포트 파일 처리 실패
    #[error("all {count} report files failed to process")]
    AllFilesFailed { count: usize },

    /// 워커 스레드 풀 초기화 실패
    #[error("failed to initialize worker pool: {reason}")]
    ThreadPool { reason: String },

    /// 임계값 초과
    #[error("{dimension} ({observed}) exceeds the threshold ({limit})")]
    ThresholdExceeded {
        dimension: String,
        observed: String,
        limit: String,
    },

    /// stop-build-on-failed-report 게이트 발동
    #[error("build failed due to failed tests. Total failed tests: {failed}")]
    BuildStopped { failed: usize },

    /// 통계 파일 쓰기 실패
    #[error("failed to write stats to {}: {reason}", .path.display())]
    StatsWrite { path: PathBuf, reason: String },
}

/// cukegate 결과 타입 별칭
pub type Result<T> = std::result::Result<T, CukeGateError>;

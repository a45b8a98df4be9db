//! 리포트 파일 처리 모듈
//!
//! 개별 Cucumber JSON 리포트의 읽기, 파싱, 병합/정렬, 통계 계산을
//! 담당합니다. 파일 하나가 워커 하나의 작업 단위입니다.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{CukeGateError, Result};
use crate::report::{merge_features_by_id, sort_features_alphabetically, Feature, SortingMethod};
use crate::stats::{compute_stats, Results, StatusFlags};

/// 리포트 처리 옵션
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// 빈 파일을 에러 대신 무시(0값 기여)로 처리
    pub skip_empty: bool,
    /// 동일 id Feature 병합 활성화
    pub merge_features: bool,
    /// Feature 정렬 방식
    pub sorting: SortingMethod,
    /// 상태별 실패 취급 플래그
    pub flags: StatusFlags,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            skip_empty: false,
            merge_features: false,
            sorting: SortingMethod::Natural,
            flags: StatusFlags::default(),
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// 빈 파일 무시 설정
    pub fn with_skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    /// Feature 병합 설정
    pub fn with_merge_features(mut self, merge_features: bool) -> Self {
        self.merge_features = merge_features;
        self
    }

    /// 정렬 방식 설정
    pub fn with_sorting(mut self, sorting: SortingMethod) -> Self {
        self.sorting = sorting;
        self
    }

    /// 상태 플래그 설정
    pub fn with_flags(mut self, flags: StatusFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// 단일 리포트 파일을 처리하여 파일 단위 집계를 반환
///
/// 빈 파일은 `skip_empty`가 설정된 경우 0값 `Results`로 처리됩니다.
/// 그 외에는 최상위 Feature 배열로 엄격하게 디코딩합니다.
pub fn process_file(path: &Path, options: &ProcessOptions) -> Result<Results> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| CukeGateError::FileOpen {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .len();

    if file_size == 0 && options.skip_empty {
        return Ok(Results::default());
    }

    let mut features = if file_size >= options.mmap_threshold {
        // 대용량 리포트: 메모리 매핑 사용
        parse_with_mmap(path)?
    } else {
        // 일반 리포트: 버퍼 리더 사용
        parse_with_reader(path)?
    };

    if options.merge_features {
        features = merge_features_by_id(features);
    }

    if options.sorting == SortingMethod::Alphabetical {
        sort_features_alphabetically(&mut features);
    }

    Ok(compute_stats(&features, &options.flags))
}

/// 버퍼 리더를 사용한 Feature 배열 파싱
fn parse_with_reader(path: &Path) -> Result<Vec<Feature>> {
    let file = File::open(path).map_err(|e| CukeGateError::FileOpen {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| CukeGateError::Parse {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 메모리 매핑을 사용한 Feature 배열 파싱 (대용량 리포트용)
fn parse_with_mmap(path: &Path) -> Result<Vec<Feature>> {
    let file = File::open(path).map_err(|e| CukeGateError::FileOpen {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mmap = unsafe {
        Mmap::map(&file).map_err(|e| CukeGateError::FileOpen {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    serde_json::from_slice(&mmap).map_err(|e| CukeGateError::Parse {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SINGLE_FEATURE: &str = r#"[
        {
            "id": "login",
            "uri": "features/login.feature",
            "keyword": "Feature",
            "name": "Login",
            "elements": [
                {
                    "name": "valid login",
                    "type": "scenario",
                    "steps": [
                        {"name": "open page", "result": {"status": "passed", "duration": 1000000}},
                        {"name": "submit", "result": {"status": "failed", "duration": 2000000, "error_message": "boom"}}
                    ]
                }
            ]
        }
    ]"#;

    fn create_report(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_process_valid_report() {
        let temp = TempDir::new().unwrap();
        let path = create_report(temp.path(), "report.json", SINGLE_FEATURE);

        let results = process_file(&path, &ProcessOptions::new()).unwrap();

        assert_eq!(results.feature_count, 1);
        assert_eq!(results.scenario_count, 1);
        assert_eq!(results.step_count, 2);
        assert_eq!(results.passed_tests, 1);
        assert_eq!(results.failed_tests, 1);
        assert_eq!(results.failed_steps[0].error_message, "boom");
        assert!((results.duration_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_process_malformed_report() {
        let temp = TempDir::new().unwrap();
        let path = create_report(temp.path(), "broken.json", r#"[{"id": broken"#);

        let err = process_file(&path, &ProcessOptions::new()).unwrap_err();
        assert!(matches!(err, CukeGateError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_process_top_level_object_rejected() {
        let temp = TempDir::new().unwrap();
        let path = create_report(temp.path(), "object.json", r#"{"id": "x"}"#);

        let err = process_file(&path, &ProcessOptions::new()).unwrap_err();
        assert!(matches!(err, CukeGateError::Parse { .. }));
    }

    #[test]
    fn test_empty_file_with_skip_empty() {
        let temp = TempDir::new().unwrap();
        let path = create_report(temp.path(), "empty.json", "");

        let options = ProcessOptions::new().with_skip_empty(true);
        let results = process_file(&path, &options).unwrap();
        assert_eq!(results, Results::default());
    }

    #[test]
    fn test_empty_file_without_skip_empty_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = create_report(temp.path(), "empty.json", "");

        let err = process_file(&path, &ProcessOptions::new()).unwrap_err();
        assert!(matches!(err, CukeGateError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = process_file(Path::new("/no/such/report.json"), &ProcessOptions::new())
            .unwrap_err();
        assert!(matches!(err, CukeGateError::FileOpen { .. }));
    }

    #[test]
    fn test_merge_option_applies() {
        let temp = TempDir::new().unwrap();
        let duplicated = r#"[
            {"id": "a", "name": "A", "elements": [{"name": "s1", "steps": []}]},
            {"id": "a", "name": "A", "elements": [{"name": "s2", "steps": []}]}
        ]"#;
        let path = create_report(temp.path(), "dup.json", duplicated);

        let unmerged = process_file(&path, &ProcessOptions::new()).unwrap();
        assert_eq!(unmerged.feature_count, 2);
        assert_eq!(unmerged.scenario_count, 2);

        let merged =
            process_file(&path, &ProcessOptions::new().with_merge_features(true)).unwrap();
        assert_eq!(merged.feature_count, 1);
        // 병합은 시나리오 수를 바꾸지 않음
        assert_eq!(merged.scenario_count, 2);
    }
}

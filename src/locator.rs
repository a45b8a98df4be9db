//! 리포트 파일 탐색 모듈
//!
//! 디렉토리 기준 include/exclude 글로브 패턴으로 Cucumber JSON 리포트
//! 파일을 찾고 읽기 가능 여부를 필터링합니다.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{CukeGateError, Result};

/// 컴파일된 include/exclude 패턴 매처
pub struct ReportMatcher {
    include: Pattern,
    exclude: Option<Pattern>,
}

impl ReportMatcher {
    /// 새 패턴 매처 생성
    ///
    /// # Arguments
    /// * `include` - 포함 글로브 패턴 (예: "**/*.json")
    /// * `exclude` - 제외 글로브 패턴 (매치되는 파일은 후보에서 제거)
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self> {
        let include = Pattern::new(include).map_err(|e| CukeGateError::InvalidPattern {
            pattern: include.to_string(),
            reason: e.to_string(),
        })?;
        let exclude = match exclude {
            Some(p) => Some(Pattern::new(p).map_err(|e| CukeGateError::InvalidPattern {
                pattern: p.to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Self { include, exclude })
    }

    /// 디렉토리 기준 상대 경로가 패턴과 일치하는지 확인
    pub fn matches(&self, relative: &Path) -> bool {
        if !self.include.matches_path(relative) {
            return false;
        }
        match &self.exclude {
            Some(p) => !p.matches_path(relative),
            None => true,
        }
    }
}

/// 디렉토리에서 패턴과 일치하는 읽기 가능한 리포트 파일을 수집
///
/// 탐색 순서는 보장되지 않으므로 하류에서 순서에 의존하면 안 됩니다.
///
/// # Errors
/// * `NoFilesFound` - 패턴과 일치하는 파일이 없음
/// * `NoReadableFiles` - 일치하는 파일이 모두 읽기 불가
pub fn locate_files(
    directory: &Path,
    include: &str,
    exclude: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let matcher = ReportMatcher::new(include, exclude)?;

    let matches: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .strip_prefix(directory)
                .map(|rel| matcher.matches(rel))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    if matches.is_empty() {
        return Err(CukeGateError::NoFilesFound);
    }

    let readable: Vec<PathBuf> = matches.into_iter().filter(|p| is_readable(p)).collect();

    if readable.is_empty() {
        return Err(CukeGateError::NoReadableFiles);
    }

    Ok(readable)
}

/// 파일이 stat 가능하고 소유자/전체 읽기 비트를 가지는지 확인
#[cfg(unix)]
fn is_readable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o444 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_readable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

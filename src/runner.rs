//! 집계 코디네이터 모듈
//!
//! 제한된 워커 풀로 리포트 파일들을 동시에 처리하고, 파일별 결과를
//! 하나의 집계로 합산합니다. 개별 파일 실패는 경고로 수집될 뿐
//! 나머지 작업을 중단시키지 않습니다.

use std::path::PathBuf;
use std::sync::Mutex;

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::error::{CukeGateError, Result};
use crate::processor::{process_file, ProcessOptions};
use crate::stats::Results;

/// 동시에 리포트를 처리하는 워커 수
pub const MAX_WORKERS: usize = 5;

/// 처리에 실패한 파일과 사유
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// 전체 실행 결과: 합산된 집계와 실패 파일 목록
#[derive(Debug)]
pub struct RunOutcome {
    pub results: Results,
    pub failed_files: Vec<FailedFile>,
}

/// 리포트 파일들을 워커 풀로 병렬 처리하여 집계
///
/// 합산은 교환법칙을 만족하는 필드 단위 덧셈이므로 워커의 완료 순서가
/// 결과에 영향을 주지 않습니다. 공유 누산기는 뮤텍스로 보호됩니다.
///
/// # Errors
/// * `ThreadPool` - 워커 풀 초기화 실패
/// * `AllFilesFailed` - 모든 파일이 처리에 실패
pub fn process_reports(
    files: &[PathBuf],
    options: &ProcessOptions,
    progress: &ProgressBar,
) -> Result<RunOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(MAX_WORKERS)
        .build()
        .map_err(|e| CukeGateError::ThreadPool {
            reason: e.to_string(),
        })?;

    let aggregate = Mutex::new(Results::default());
    let failures: Mutex<Vec<FailedFile>> = Mutex::new(Vec::new());

    pool.install(|| {
        files.par_iter().for_each(|path| {
            match process_file(path, options) {
                Ok(res) => aggregate.lock().unwrap().merge(&res),
                Err(e) => failures.lock().unwrap().push(FailedFile {
                    path: path.clone(),
                    reason: e.to_string(),
                }),
            }
            progress.inc(1);
        });
    });

    let results = aggregate.into_inner().unwrap();
    let failed_files = failures.into_inner().unwrap();

    if !files.is_empty() && failed_files.len() == files.len() {
        return Err(CukeGateError::AllFilesFailed { count: files.len() });
    }

    Ok(RunOutcome {
        results,
        failed_files,
    })
}

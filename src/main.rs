//! cukegate - CUCUMBER REPORT GATE
//!
//! 메인 엔트리포인트

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cukegate::{
    cli::Args,
    error::CukeGateError,
    locator::locate_files,
    runner::{process_reports, FailedFile, MAX_WORKERS},
    stats::write_stats_file,
    thresholds::evaluate,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // 설정 검증
    args.validate()?;

    // 헤더 출력
    print_header(&args);

    // 리포트 파일 탐색
    let files = locate_files(&args.directory, &args.include, args.exclude.as_deref())?;

    println!(
        "  {} 발견된 리포트 파일 수: {}",
        "📋".bright_white(),
        files.len().to_string().bright_green()
    );

    // 병렬 집계
    println!(
        "\n{}",
        format!("⚡ 병렬 집계 중... (워커 {}개)", MAX_WORKERS).bright_cyan()
    );
    let pb = create_progress_bar(files.len());
    let outcome = process_reports(&files, &args.process_options(), &pb)?;
    pb.finish_with_message("완료!");

    // 처리 실패 파일 경고
    print_failed_files(&outcome.failed_files, args.verbose);

    // 집계 요약은 게이트 결과와 무관하게 항상 출력
    outcome.results.print_summary();

    // 통계 싱크 기록
    if let Some(path) = args.stats_path() {
        write_stats_file(&outcome.results, &path)?;
        println!(
            "\n{} 통계 저장: {:?}",
            "📤".bright_magenta(),
            path
        );
    }

    // stop-build 게이트: 임계값 평가보다 먼저, 실패 스텝이 하나라도 있으면 중단
    if args.stop_build_on_failed_report && outcome.results.failed_tests > 0 {
        let err = CukeGateError::BuildStopped {
            failed: outcome.results.failed_tests,
        };
        eprintln!("\n{} {}", "❌".bright_red(), err.to_string().red());
        return Err(err.into());
    }

    // 임계값 평가 (첫 위반에서 중단)
    if let Err(err) = evaluate(&outcome.results, &args.thresholds()) {
        eprintln!("\n{} {}", "❌".bright_red(), err.to_string().red());
        return Err(err.into());
    }

    println!("\n{} 모든 게이트 통과\n", "✅".bright_green());

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚦 CUCUMBER REPORT GATE".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 리포트 디렉토리: {:?}", "📂".bright_cyan(), args.directory);
    println!("  {} 포함 패턴: {}", "🔍".bright_magenta(), args.include);

    if let Some(ref exclude) = args.exclude {
        println!("  {} 제외 패턴: {}", "🚫".bright_red(), exclude);
    }

    println!("  {} 정렬 방식: {}", "⚙️".bright_yellow(), args.sorting);

    if args.merge_features_by_id {
        println!("  {} {}", "🧩".bright_cyan(), "Feature 병합 모드".cyan());
    }

    if args.skip_empty_files {
        println!("  {} {}", "📭".bright_yellow(), "빈 파일 무시 모드".yellow());
    }

    if args.stop_build_on_failed_report {
        println!(
            "  {} {}",
            "🛑".bright_red(),
            "실패 리포트 즉시 중단 모드".red()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 리포트 파일 검색 중...".bright_cyan());
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb
}

/// 처리 실패 파일 경고 출력
fn print_failed_files(failed: &[FailedFile], verbose: bool) {
    if failed.is_empty() {
        return;
    }

    println!(
        "\n{}",
        format!("⚠️ 처리 실패 파일 {}개 (집계에서 제외됨):", failed.len()).bright_yellow()
    );
    for file in failed {
        println!(
            "  {} {:?}",
            "•".yellow(),
            file.path.file_name().unwrap_or_default()
        );
        if verbose {
            println!("    {}", file.reason.dimmed());
        }
    }
}

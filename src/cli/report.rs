//! Result tables printed after a run

use crate::cli::style::{CHECK, CROSS, Stylize};
use multi_repo_sync::pipeline::{StageResult, SyncReport};
use multi_repo_sync::types::{Branch, BranchPair, MergeResult, PullRequest, Release, VersionBump};
use std::fmt::Write as _;

/// One table row: a repository's result for one phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    repo: String,
    owner: String,
    ok: bool,
    result: String,
    errors: Vec<String>,
}

const NO_RESULT: &str = "No result";

fn rows<T>(results: &[StageResult<T>], describe: impl Fn(&T) -> String) -> Vec<Row> {
    results
        .iter()
        .map(|r| Row {
            repo: r.repo().repo.clone(),
            owner: r.repo().owner.clone(),
            ok: r.is_success(),
            result: r.value().map_or_else(|| NO_RESULT.to_string(), &describe),
            errors: r.errors().iter().map(ToString::to_string).collect(),
        })
        .collect()
}

fn describe_branches(pair: &BranchPair) -> String {
    format!(
        "{} ({}) -> {} ({})",
        pair.head.name,
        short_sha(&pair.head.commit_sha),
        pair.base.name,
        short_sha(&pair.base.commit_sha)
    )
}

fn describe_pr(pr: &PullRequest) -> String {
    format!("#{} {} {}", pr.number, pr.title, pr.html_url)
}

fn describe_merge(merge: &MergeResult) -> String {
    let message = merge.message.as_deref().unwrap_or("Merged");
    match &merge.sha {
        Some(sha) => format!("{message} {sha}"),
        None => message.to_string(),
    }
}

fn describe_release(release: &Release) -> String {
    format!("{} {}", release.tag_name, release.html_url)
}

fn describe_bump(bump: &VersionBump) -> String {
    bump.file.as_ref().map_or_else(
        || "No manifest".to_string(),
        |file| format!("{file} {}", short_sha(&bump.head_sha)),
    )
}

fn describe_branch(branch: &Branch) -> String {
    format!("{} {}", branch.name, short_sha(&branch.commit_sha))
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Render one phase as an aligned table
///
/// Repositories with several errors get one continuation line per extra
/// error.
pub fn render_table(title: &str, rows: &[Row]) -> String {
    const HEADERS: [&str; 5] = ["repo", "owner", "status", "result", "errors"];

    let first_error = |row: &Row| row.errors.first().cloned().unwrap_or_default();
    let width = |header: &str, cell: &dyn Fn(&Row) -> usize| {
        rows.iter()
            .map(cell)
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or_default()
    };
    let repo_w = width(HEADERS[0], &|r: &Row| r.repo.chars().count());
    let owner_w = width(HEADERS[1], &|r: &Row| r.owner.chars().count());
    let status_w = HEADERS[2].len();
    let result_w = width(HEADERS[3], &|r: &Row| r.result.chars().count());

    let mut out = String::new();
    let _ = writeln!(out, "{}", title.emphasis());
    let _ = writeln!(
        out,
        "  {}",
        format!(
            "{:<repo_w$}  {:<owner_w$}  {:<status_w$}  {:<result_w$}  {}",
            HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3], HEADERS[4]
        )
        .muted()
    );

    for row in rows {
        let glyph = if row.ok { CHECK.success() } else { CROSS.error() };
        let pad = " ".repeat(status_w.saturating_sub(1));
        let _ = writeln!(
            out,
            "  {:<repo_w$}  {:<owner_w$}  {glyph}{pad}  {:<result_w$}  {}",
            row.repo,
            row.owner,
            row.result,
            first_error(row).error()
        );
        for extra in row.errors.iter().skip(1) {
            let indent = repo_w + owner_w + status_w + result_w + 8;
            let _ = writeln!(out, "  {:indent$}  {}", "", extra.error());
        }
    }

    out
}

/// Branch check table (dry run)
pub fn branches_table(results: &[StageResult<BranchPair>]) -> String {
    render_table("Branches", &rows(results, describe_branches))
}

/// Pull request table
pub fn pull_requests_table(results: &[StageResult<PullRequest>]) -> String {
    render_table("Pull requests", &rows(results, describe_pr))
}

/// Merge table
pub fn merges_table(results: &[StageResult<MergeResult>]) -> String {
    render_table("Merges", &rows(results, describe_merge))
}

/// Release table
pub fn releases_table(results: &[StageResult<Release>]) -> String {
    render_table("Releases", &rows(results, describe_release))
}

/// Version bump table
pub fn version_bumps_table(results: &[StageResult<VersionBump>]) -> String {
    render_table("Version bumps", &rows(results, describe_bump))
}

/// Version branch table
pub fn version_branches_table(results: &[StageResult<Branch>]) -> String {
    render_table("Version branches", &rows(results, describe_branch))
}

/// Full report: one table per phase that ran, then a summary line
pub fn render_report(report: &SyncReport) -> String {
    let mut out = String::new();
    out.push_str(&pull_requests_table(&report.pull_requests));
    if let Some(bumps) = &report.version_bumps {
        out.push('\n');
        out.push_str(&version_bumps_table(bumps));
    }
    out.push('\n');
    out.push_str(&merges_table(&report.merges));
    if let Some(releases) = &report.releases {
        out.push('\n');
        out.push_str(&releases_table(releases));
    }
    if let Some(branches) = &report.version_branches {
        out.push('\n');
        out.push_str(&version_branches_table(branches));
    }

    let failed = report.failed();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} repositories completed, {} failed",
        report.succeeded().success(),
        if failed == 0 {
            failed.muted()
        } else {
            failed.warn()
        }
    );
    for (result, stage) in report.pull_requests.iter().zip(report.failed_stages()) {
        if let Some(stage) = stage {
            let _ = writeln!(
                out,
                "  {} {} failed at {stage}",
                CROSS.error(),
                result.repo().accent()
            );
        }
    }
    out
}

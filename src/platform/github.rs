//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, MergeResult, PullRequest, Release, RepoFile, RepoId};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// HTTP status GitHub answers for a missing file or ref
const NOT_FOUND: u16 = 404;

/// Request body for `POST /repos/{owner}/{repo}/releases`
///
/// Sent through octocrab's generic `post` so `generate_release_notes` and
/// `make_latest` go out in a single request.
#[derive(Serialize)]
struct CreateReleaseRequest<'a> {
    tag_name: &'a str,
    target_commitish: &'a str,
    generate_release_notes: bool,
    make_latest: &'a str,
}

/// Request body for `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Serialize)]
struct UpdateFileRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

/// Request body for `POST /repos/{owner}/{repo}/git/refs`
#[derive(Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: &'a str,
}

/// The fields of a contents response this service reads
#[derive(Deserialize)]
struct FileContents {
    path: String,
    sha: String,
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Deserialize)]
struct FileCommit {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct GitRef {
    object: CommitRef,
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == NOT_FOUND)
}

/// Decode the base64 payload GitHub returns for file contents
fn decode_contents(file: FileContents) -> Result<RepoFile> {
    let undecodable = |reason: String| Error::Manifest {
        path: file.path.clone(),
        message: reason,
    };

    if let Some(encoding) = file.encoding.as_deref()
        && encoding != "base64"
    {
        return Err(undecodable(format!("unsupported encoding {encoding}")));
    }
    let encoded: String = file
        .content
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| undecodable(e.to_string()))?;
    let content = String::from_utf8(bytes).map_err(|e| undecodable(e.to_string()))?;

    Ok(RepoFile {
        path: file.path,
        sha: file.sha,
        content,
    })
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` overrides the API base (GitHub Enterprise, test servers).
    pub fn new(token: &str, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| Error::GitHubApi(format!("invalid API url {url}: {e}")))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client })
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        head_sha: pr.head.sha.clone(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn current_user(&self) -> Result<String> {
        debug!("fetching authenticated user");
        let user = self.client.current().user().await?;
        Ok(user.login)
    }

    async fn list_branches(&self, repo: &RepoId, page: u32, per_page: u8) -> Result<Vec<Branch>> {
        debug!(%repo, page, per_page, "listing branches");
        let branches = self
            .client
            .repos(&repo.owner, &repo.repo)
            .list_branches()
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        let result: Vec<Branch> = branches
            .items
            .into_iter()
            .map(|b| Branch {
                name: b.name,
                commit_sha: b.commit.sha,
            })
            .collect();
        debug!(%repo, page, count = result.len(), "listed branches");
        Ok(result)
    }

    async fn create_pr(
        &self,
        repo: &RepoId,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(%repo, head, base, "creating PR");
        let pulls = self.client.pulls(&repo.owner, &repo.repo);
        let pr = pulls.create(title, head, base).body(body).send().await?;

        let result = pr_from_octocrab(&pr);
        debug!(%repo, pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn merge_pr(&self, repo: &RepoId, pr_number: u64) -> Result<MergeResult> {
        debug!(%repo, pr_number, "merging PR");
        let pulls = self.client.pulls(&repo.owner, &repo.repo);
        let merge = pulls.merge(pr_number).send().await?;

        let result = MergeResult {
            pr_number,
            merged: merge.merged,
            sha: merge.sha,
            message: merge.message,
        };
        debug!(%repo, pr_number, merged = result.merged, sha = ?result.sha, "merge complete");
        Ok(result)
    }

    async fn create_release(
        &self,
        repo: &RepoId,
        tag_name: &str,
        target_commitish: &str,
    ) -> Result<Release> {
        debug!(%repo, tag_name, target_commitish, "creating release");
        let route = format!("/repos/{}/{}/releases", repo.owner, repo.repo);
        let request = CreateReleaseRequest {
            tag_name,
            target_commitish,
            generate_release_notes: true,
            make_latest: "true",
        };

        let release: Release = self.client.post(route, Some(&request)).await?;
        debug!(%repo, release_id = release.id, "created release");
        Ok(release)
    }

    async fn get_file(&self, repo: &RepoId, path: &str, branch: &str) -> Result<Option<RepoFile>> {
        debug!(%repo, path, branch, "reading file");
        let route = format!("/repos/{}/{}/contents/{path}", repo.owner, repo.repo);
        let fetched: std::result::Result<FileContents, _> =
            self.client.get(route, Some(&[("ref", branch)])).await;

        match fetched {
            Ok(file) => decode_contents(file).map(Some),
            Err(e) if is_not_found(&e) => {
                debug!(%repo, path, branch, "file not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_file(
        &self,
        repo: &RepoId,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<String> {
        debug!(%repo, path, branch, "updating file");
        let route = format!("/repos/{}/{}/contents/{path}", repo.owner, repo.repo);
        let request = UpdateFileRequest {
            message,
            content: BASE64.encode(content),
            sha,
            branch,
        };

        let updated: FileCommit = self.client.put(route, Some(&request)).await?;
        debug!(%repo, path, commit = %updated.commit.sha, "updated file");
        Ok(updated.commit.sha)
    }

    async fn create_branch(&self, repo: &RepoId, name: &str, sha: &str) -> Result<Branch> {
        debug!(%repo, name, sha, "creating branch");
        let route = format!("/repos/{}/{}/git/refs", repo.owner, repo.repo);
        let request = CreateRefRequest {
            ref_name: format!("refs/heads/{name}"),
            sha,
        };

        let created: GitRef = self.client.post(route, Some(&request)).await?;
        Ok(Branch {
            name: name.to_string(),
            commit_sha: created.object.sha,
        })
    }
}

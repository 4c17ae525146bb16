//! Git repository wrapper.

use std::path::Path;

use git2::{
    Cred, CredentialType, ErrorCode, FetchOptions, Oid, RemoteCallbacks,
    Repository as Git2Repo, ResetType,
};
use tracing::debug;

use crate::{CommitId, GitError, GitResult};

/// Credential attempts before giving up on a fetch.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// A Git repository wrapper.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Discovers the repository containing the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        let inner =
            Git2Repo::discover(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self { inner })
    }

    /// Returns the repository root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Fetches `branch` from `remote` into its remote-tracking reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote is not configured or the fetch fails.
    pub fn fetch(&self, remote: &str, branch: &str) -> GitResult<()> {
        let mut handle = self
            .inner
            .find_remote(remote)
            .map_err(|_| GitError::RemoteNotFound(remote.to_string()))?;

        let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
        debug!(remote, %refspec, "fetching");

        let mut options = FetchOptions::new();
        options.remote_callbacks(self.callbacks()?);
        handle.fetch(&[refspec.as_str()], Some(&mut options), None)?;

        Ok(())
    }

    /// Returns the commit `HEAD` points to, or `None` on an unborn branch.
    ///
    /// # Errors
    ///
    /// Returns an error if `HEAD` cannot be resolved.
    pub fn head_commit(&self) -> GitResult<Option<CommitId>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id().into())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the commit of the remote-tracking reference for `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference does not exist.
    pub fn remote_commit(&self, remote: &str, branch: &str) -> GitResult<CommitId> {
        let name = format!("refs/remotes/{remote}/{branch}");
        let reference = self
            .inner
            .find_reference(&name)
            .map_err(|_| GitError::RefNotFound(name.clone()))?;
        Ok(reference.peel_to_commit()?.id().into())
    }

    /// Resets index, working tree and the current branch to `commit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit is unknown or the reset fails.
    pub fn reset_hard(&self, commit: &CommitId) -> GitResult<()> {
        let oid = Oid::from_str(commit.as_str())
            .map_err(|_| GitError::RefNotFound(commit.to_string()))?;
        let object = self
            .inner
            .find_object(oid, None)
            .map_err(|_| GitError::RefNotFound(commit.to_string()))?;

        self.inner.reset(&object, ResetType::Hard, None)?;
        debug!(commit = %commit.short(), "reset checkout");

        Ok(())
    }

    /// Builds remote callbacks trying the SSH agent, credential helpers,
    /// then default credentials.
    fn callbacks(&self) -> GitResult<RemoteCallbacks<'static>> {
        let config = self.inner.config()?;
        let mut attempts = 0;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |url, username, allowed| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("authentication failed"));
            }

            let username = username.unwrap_or("git");
            if allowed.contains(CredentialType::USERNAME) {
                Cred::username(username)
            } else if allowed.contains(CredentialType::SSH_KEY) {
                Cred::ssh_key_from_agent(username)
            } else if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                Cred::credential_helper(&config, url, Some(username))
            } else {
                Cred::default()
            }
        });

        Ok(callbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository as Git2Repository, RepositoryInitOptions, Signature};
    use std::fs;
    use tempfile::TempDir;

    fn init_upstream() -> (TempDir, Git2Repository) {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Git2Repository::init_opts(temp_dir.path(), &opts).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        (temp_dir, repo)
    }

    fn commit_file(repo: &Git2Repository, name: &str, content: &str, message: &str) -> Oid {
        let workdir = repo.workdir().unwrap();
        fs::write(workdir.join(name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn clone_of(upstream: &TempDir) -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let url = upstream.path().to_str().unwrap();
        let inner = Git2Repository::clone(url, temp_dir.path()).unwrap();
        (temp_dir, Repository { inner })
    }

    #[test]
    fn test_open_valid_repo() {
        let (temp_dir, _repo) = init_upstream();
        assert!(Repository::open(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_open_not_a_repo() {
        let temp_dir = TempDir::new().unwrap();
        let result = Repository::open(temp_dir.path());
        assert!(matches!(result, Err(GitError::NotARepo(_))));
    }

    #[test]
    fn test_discover_from_subdir() {
        let (temp_dir, _repo) = init_upstream();
        let subdir = temp_dir.path().join("src").join("configs");
        fs::create_dir_all(&subdir).unwrap();

        let repo = Repository::discover(&subdir).unwrap();
        let expected = temp_dir.path().canonicalize().unwrap();
        assert_eq!(repo.path().canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_head_commit_unborn() {
        let (temp_dir, _repo) = init_upstream();
        let repo = Repository::open(temp_dir.path()).unwrap();
        assert_eq!(repo.head_commit().unwrap(), None);
    }

    #[test]
    fn test_head_commit_after_clone() {
        let (upstream_dir, upstream) = init_upstream();
        let first = commit_file(&upstream, "requirements.txt", "pyyaml\n", "Initial commit");

        let (_clone_dir, repo) = clone_of(&upstream_dir);
        assert_eq!(repo.head_commit().unwrap(), Some(CommitId::from(first)));
    }

    #[test]
    fn test_fetch_updates_remote_tracking_only() {
        let (upstream_dir, upstream) = init_upstream();
        let first = commit_file(&upstream, "requirements.txt", "pyyaml\n", "Initial commit");
        let (_clone_dir, repo) = clone_of(&upstream_dir);

        let second = commit_file(&upstream, "requirements.txt", "pyyaml\nrequests\n", "Add requests");
        repo.fetch("origin", "main").unwrap();

        assert_eq!(repo.remote_commit("origin", "main").unwrap(), CommitId::from(second));
        assert_eq!(repo.head_commit().unwrap(), Some(CommitId::from(first)));
    }

    #[test]
    fn test_fetch_unknown_remote() {
        let (upstream_dir, upstream) = init_upstream();
        commit_file(&upstream, "README", "hello\n", "Initial commit");
        let (_clone_dir, repo) = clone_of(&upstream_dir);

        let result = repo.fetch("upstream", "main");
        assert!(matches!(result, Err(GitError::RemoteNotFound(name)) if name == "upstream"));
    }

    #[test]
    fn test_fetch_unknown_branch() {
        let (upstream_dir, upstream) = init_upstream();
        commit_file(&upstream, "README", "hello\n", "Initial commit");
        let (_clone_dir, repo) = clone_of(&upstream_dir);

        assert!(repo.fetch("origin", "does-not-exist").is_err());
    }

    #[test]
    fn test_remote_commit_missing_ref() {
        let (upstream_dir, upstream) = init_upstream();
        commit_file(&upstream, "README", "hello\n", "Initial commit");
        let (_clone_dir, repo) = clone_of(&upstream_dir);

        let result = repo.remote_commit("origin", "release");
        assert!(matches!(result, Err(GitError::RefNotFound(_))));
    }

    #[test]
    fn test_reset_hard_moves_head_and_worktree() {
        let (upstream_dir, upstream) = init_upstream();
        commit_file(&upstream, "requirements.txt", "pyyaml\n", "Initial commit");
        let (clone_dir, repo) = clone_of(&upstream_dir);

        commit_file(&upstream, "requirements.txt", "pyyaml\nrequests\n", "Add requests");
        repo.fetch("origin", "main").unwrap();
        let target = repo.remote_commit("origin", "main").unwrap();

        repo.reset_hard(&target).unwrap();

        assert_eq!(repo.head_commit().unwrap(), Some(target));
        let content = fs::read_to_string(clone_dir.path().join("requirements.txt")).unwrap();
        assert_eq!(content, "pyyaml\nrequests\n");
    }

    #[test]
    fn test_reset_hard_discards_local_changes() {
        let (upstream_dir, upstream) = init_upstream();
        commit_file(&upstream, "requirements.txt", "pyyaml\n", "Initial commit");
        let (clone_dir, repo) = clone_of(&upstream_dir);

        fs::write(clone_dir.path().join("requirements.txt"), "edited locally\n").unwrap();
        let head = repo.head_commit().unwrap().unwrap();
        repo.reset_hard(&head).unwrap();

        let content = fs::read_to_string(clone_dir.path().join("requirements.txt")).unwrap();
        assert_eq!(content, "pyyaml\n");
    }

    #[test]
    fn test_reset_hard_unknown_commit() {
        let (upstream_dir, upstream) = init_upstream();
        commit_file(&upstream, "README", "hello\n", "Initial commit");
        let (_clone_dir, repo) = clone_of(&upstream_dir);

        let missing = CommitId::new("0123456789abcdef0123456789abcdef01234567");
        let result = repo.reset_hard(&missing);
        assert!(matches!(result, Err(GitError::RefNotFound(_))));
    }
}

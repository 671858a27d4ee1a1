use crate::{Outcome, PrError, PrOperations};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutResult {
    pub id: u64,
    pub branch: String,
}

impl PrOperations<'_> {
    /// Check out the source branch of a pull request.
    ///
    /// An existing local branch is only replaced with `force`, and never
    /// while it is checked out. The branch is fetched from the default
    /// service remote as `<source>:<source>`. A failure to set upstream
    /// tracking is reported as a warning.
    ///
    /// # Errors
    ///
    /// * [`PrError::NoWorkingCopy`] outside a checkout.
    /// * [`PrError::BranchExists`] when the branch exists and `force` is off,
    ///   before anything is fetched.
    /// * [`PrError::BranchCheckedOut`] when forcing over the current branch.
    /// * [`PrError::WorkingCopy`] if fetch or checkout fails.
    pub async fn checkout(
        &self,
        selector: Option<&str>,
        force: bool,
    ) -> Result<Outcome<CheckoutResult>, PrError> {
        let working_copy = self.working_copy()?;
        let id = self.resolve(selector).await?;
        let pr = self.client.get_pull_request(self.repo, id).await?;
        let branch = pr.source_branch().to_string();

        if working_copy.branch_exists_locally(&branch)? {
            if !force {
                return Err(PrError::BranchExists { branch });
            }
            if working_copy.current_branch().ok().as_deref() == Some(branch.as_str()) {
                return Err(PrError::BranchCheckedOut { branch });
            }
            log::debug!("Deleting local branch {branch} before checkout");
            working_copy.delete_local_branch(&branch, true)?;
        }

        let remote = working_copy.default_service_remote()?;
        working_copy.fetch(&remote.name, &format!("{branch}:{branch}"))?;

        let mut outcome = Outcome::new(CheckoutResult {
            id,
            branch: branch.clone(),
        });
        if let Err(e) = working_copy.set_upstream(&branch, &remote.name) {
            outcome.warn(format!(
                "could not set upstream for {branch} to {}/{branch}: {e}",
                remote.name
            ));
        }

        working_copy.checkout(&branch)?;
        Ok(outcome)
    }
}

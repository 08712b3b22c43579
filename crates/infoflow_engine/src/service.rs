use std::sync::{Mutex, MutexGuard, PoisonError};

use infoflow_core::{
    Completion, InputValidator, SearchSession, SessionSnapshot, SubmissionId, TimeWindow,
    ValidationError,
};

use crate::SearchClient;

/// What happened to an accepted submission once its request finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The result is now the session state.
    Applied { submission: SubmissionId },
    /// A newer submission was issued meanwhile; the result was dropped.
    Superseded { submission: SubmissionId },
}

/// Owns one [`SearchSession`] and runs its searches through a [`SearchClient`].
///
/// Readers call [`SearchService::snapshot`] at any time; only
/// [`SearchService::submit`] mutates the session. Overlapping submissions are
/// allowed and only the most recent one is applied.
pub struct SearchService<C> {
    client: C,
    validator: InputValidator,
    session: Mutex<SearchSession>,
}

impl<C: SearchClient> SearchService<C> {
    pub fn new(client: C) -> Self {
        Self::with_validator(client, InputValidator::default())
    }

    pub fn with_validator(client: C, validator: InputValidator) -> Self {
        Self {
            client,
            validator,
            session: Mutex::new(SearchSession::new()),
        }
    }

    /// Validates the topic, enters `Loading` and runs the search.
    ///
    /// An empty topic is returned as an error without touching the session or
    /// calling the client.
    pub async fn submit(
        &self,
        raw_topic: &str,
        window: TimeWindow,
    ) -> Result<SubmitOutcome, ValidationError> {
        let ticket = self
            .lock_session()
            .begin(&self.validator, raw_topic, window)?;

        let result = self.client.search(&ticket.query).await;

        let submission = ticket.submission;
        Ok(match self.lock_session().complete(submission, result) {
            Completion::Applied => SubmitOutcome::Applied { submission },
            Completion::Stale => SubmitOutcome::Superseded { submission },
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_session().snapshot()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn lock_session(&self) -> MutexGuard<'_, SearchSession> {
        // Session updates never leave it half-written, so a poisoned lock is still usable.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

use crate::classify::{Classifier, Oracle};
use crate::metrics::{aggregate, CsatSummary};
use crate::render::render;
use crate::segment::split_sessions;
use crate::source::{SourceError, TimeRange, TranscriptSource};
use chrono_tz::Tz;
use transcript_types::{Rating, ReviewRow, Transcript};

/// All transcripts fetched for one query. Owns its transcripts and
/// their sessions for the lifetime of the run; ratings may be
/// overwritten later by the review surface, last writer wins.
#[derive(Debug, Default)]
pub struct ProjectTranscripts {
    pub transcripts: Vec<Transcript>,
}

impl ProjectTranscripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the collection from the store's list endpoint. A list
    /// failure fails the run; an empty list is a valid empty run.
    pub fn fetch(
        &mut self,
        source: &dyn TranscriptSource,
        range: TimeRange,
        tag: Option<&str>,
    ) -> Result<(), SourceError> {
        let summaries = source.list_transcripts(range, tag)?;
        if summaries.is_empty() {
            tracing::info!("no transcripts found for the requested range");
        }
        self.transcripts = summaries.into_iter().map(Transcript::new).collect();
        Ok(())
    }

    /// Run the segment -> render -> classify pass over every fetched
    /// transcript. Failures degrade per entity: an unfetchable dialog
    /// skips that transcript, an unrenderable session and an
    /// unavailable oracle leave the session at `Exclude`.
    pub fn analyze<O: Oracle>(
        &mut self,
        source: &dyn TranscriptSource,
        classifier: &Classifier<O>,
        tz: Tz,
    ) -> Vec<ReviewRow> {
        let mut rows = Vec::new();

        for transcript in &mut self.transcripts {
            let log = match source.fetch_dialog(&transcript.info.id) {
                Ok(log) => log,
                Err(err) => {
                    tracing::warn!(
                        transcript_id = %transcript.info.id,
                        error = %err,
                        "skipping transcript with unfetchable dialog"
                    );
                    continue;
                }
            };

            transcript.sessions = split_sessions(log);

            for session in &mut transcript.sessions {
                let rendered = match render(session, tz) {
                    Ok(rendered) => rendered,
                    Err(err) => {
                        tracing::warn!(
                            session_id = %session.session_id,
                            error = %err,
                            "skipping unrenderable session"
                        );
                        continue;
                    }
                };

                match classifier.classify(&rendered.report) {
                    Ok(rating) => session.rating = rating,
                    Err(err) => {
                        tracing::warn!(
                            session_id = %session.session_id,
                            error = %err,
                            "classification unavailable, session stays excluded"
                        );
                    }
                }

                rows.push(ReviewRow {
                    transcript_id: transcript.info.id.clone(),
                    session_id: session.session_id.clone(),
                    rating: session.rating,
                    report: rendered.report.clone(),
                });
                session.session_date = Some(rendered.session_date);
                session.report = Some(rendered.report);
            }
        }

        rows
    }

    /// Review-surface callback: unconditionally replace one session's
    /// rating. Returns false when the id matches nothing.
    pub fn apply_override(&mut self, session_id: &str, rating: Rating) -> bool {
        for transcript in &mut self.transcripts {
            if let Some(session) = transcript
                .sessions
                .iter_mut()
                .find(|s| s.session_id == session_id)
            {
                session.rating = rating;
                return true;
            }
        }
        false
    }

    pub fn csat(&self) -> CsatSummary {
        aggregate(&self.transcripts)
    }
}

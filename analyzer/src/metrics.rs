use serde::Serialize;
use transcript_types::Transcript;

/// The two project-level satisfaction figures. They intentionally use
/// different denominators: `session_csat` weights every qualifying
/// session equally; `transcript_csat` weights every qualifying
/// transcript equally regardless of how many sessions it holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CsatSummary {
    pub session_csat: f64,
    pub transcript_csat: f64,
}

/// Aggregate ratings across the project. `Exclude` sessions are
/// omitted from numerator and denominator alike, and transcripts with
/// no qualifying session are omitted from the transcript mean rather
/// than counted as zero. An empty project yields zeros.
pub fn aggregate(transcripts: &[Transcript]) -> CsatSummary {
    let mut total_score = 0u32;
    let mut total_sessions = 0u32;
    let mut transcript_means = Vec::new();

    for transcript in transcripts {
        let scores: Vec<u32> = transcript
            .sessions
            .iter()
            .filter_map(|s| s.rating.as_score())
            .collect();

        total_score += scores.iter().sum::<u32>();
        total_sessions += scores.len() as u32;

        if !scores.is_empty() {
            transcript_means
                .push(scores.iter().sum::<u32>() as f64 / scores.len() as f64);
        }
    }

    let session_csat = if total_sessions > 0 {
        f64::from(total_score) / f64::from(total_sessions)
    } else {
        0.0
    };
    let transcript_csat = if transcript_means.is_empty() {
        0.0
    } else {
        transcript_means.iter().sum::<f64>() / transcript_means.len() as f64
    };

    CsatSummary {
        session_csat,
        transcript_csat,
    }
}

//! Commit pacing and the post-commit echo suppression window.
//!
//! The controller never sees pointers or pixels; it answers two questions:
//! "should this proposed value go out now?" and "is the authoritative echo
//! for this attribute currently untrusted?". Deadlines are absolute
//! milliseconds owned here, cancelled by the next user interaction rather
//! than recomputed at call sites.

/// How long authoritative echoes stay ignored for repaint after a commit.
pub const SUPPRESSION_WINDOW_MS: u64 = 2_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitPolicy {
    /// One outbound call when the drag releases; nothing in between.
    OnRelease,
    /// Calls during the drag whenever the quantized value changed and the
    /// pacing interval elapsed, plus a trailing call at release if the last
    /// sent value went stale. For hosts that are slow to echo.
    Paced { interval_ms: u64 },
}

#[derive(Clone, Copy, Debug)]
pub struct CommitController {
    policy: CommitPolicy,
    suppress_until_ms: Option<u64>,
    last_sent: Option<(u64, f32)>,
}

impl CommitController {
    pub fn new(policy: CommitPolicy) -> Self {
        Self {
            policy,
            suppress_until_ms: None,
            last_sent: None,
        }
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// A new press on the control supersedes whatever the previous commit
    /// was protecting: the pending window is cancelled and pacing restarts.
    pub fn begin_interaction(&mut self) {
        self.suppress_until_ms = None;
        self.last_sent = None;
    }

    /// Paced policy only: whether this drag value should go out now. A
    /// `true` return records the send and arms the suppression window.
    pub fn pace_due(&mut self, now_ms: u64, value: f32) -> bool {
        let CommitPolicy::Paced { interval_ms } = self.policy else {
            return false;
        };
        match self.last_sent {
            Some((_, sent)) if sent == value => false,
            Some((at, _)) if now_ms.saturating_sub(at) < interval_ms => false,
            _ => {
                self.mark_sent(now_ms, value);
                true
            }
        }
    }

    /// Value to commit at gesture release, if any. Recording and the
    /// suppression window are handled internally; a paced drag whose final
    /// value is already on the wire returns `None` but still re-arms the
    /// window from the release time.
    pub fn release_value(&mut self, now_ms: u64, proposed: Option<f32>) -> Option<f32> {
        let value = proposed?;
        if matches!(self.policy, CommitPolicy::Paced { .. })
            && self.last_sent.map(|(_, sent)| sent) == Some(value)
        {
            self.suppress_until_ms = Some(now_ms + SUPPRESSION_WINDOW_MS);
            return None;
        }
        self.mark_sent(now_ms, value);
        Some(value)
    }

    pub fn suppressed(&self, now_ms: u64) -> bool {
        self.suppress_until_ms
            .is_some_and(|until| now_ms < until)
    }

    fn mark_sent(&mut self, now_ms: u64, value: f32) {
        self.last_sent = Some((now_ms, value));
        self.suppress_until_ms = Some(now_ms + SUPPRESSION_WINDOW_MS);
    }
}

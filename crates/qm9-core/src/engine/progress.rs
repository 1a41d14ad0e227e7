/// The stages of a conversion run that report progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Write,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Parse => "Parsing records",
            Phase::Write => "Writing molecules",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { phase: Phase, total: u64 },
    /// One item of the current phase finished, successfully or not.
    Advance { phase: Phase },
    PhaseFinish { phase: Phase },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback.
///
/// Reporting is a no-op without a callback, so library code can report
/// unconditionally. The reporter is `Sync` and may be shared by worker threads.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    pub fn start(&self, phase: Phase, total: usize) {
        self.report(Progress::PhaseStart {
            phase,
            total: total as u64,
        });
    }

    #[inline]
    pub fn advance(&self, phase: Phase) {
        self.report(Progress::Advance { phase });
    }

    pub fn finish(&self, phase: Phase) {
        self.report(Progress::PhaseFinish { phase });
    }
}

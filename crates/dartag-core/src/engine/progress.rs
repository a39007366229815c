#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement { steps: u64 },
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards workflow progress events to an optional callback.
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

    #[inline]
    pub fn advance(&self, steps: u64) {
        self.report(Progress::TaskIncrement { steps });
    }

    /// Runs `work` as a named phase with a task of `total_steps`, emitting the
    /// start and finish events around it.
    pub fn phase<T>(&self, name: &'static str, total_steps: u64, work: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        self.report(Progress::TaskStart { total_steps });
        let result = work();
        self.report(Progress::TaskFinish);
        self.report(Progress::PhaseFinish);
        result
    }
}

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// A batch of input files is about to be read.
    FilesStart { total: u64 },
    FileRead,
    /// A file could not be parsed and was left out of the run.
    FileSkipped { path: PathBuf, reason: String },
    FilesFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::FilesStart { total: 3 });
        reporter.report(Progress::FileRead);
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let label = match event {
                Progress::PhaseStart { name } => name.to_string(),
                Progress::FilesStart { total } => format!("files:{total}"),
                Progress::FileRead => "read".to_string(),
                Progress::FileSkipped { path, .. } => format!("skip:{}", path.display()),
                other => format!("{other:?}"),
            };
            seen.lock().unwrap().push(label);
        }));

        reporter.report(Progress::PhaseStart { name: "Loading" });
        reporter.report(Progress::FilesStart { total: 2 });
        reporter.report(Progress::FileRead);
        reporter.report(Progress::FileSkipped {
            path: PathBuf::from("bad.csv"),
            reason: "broken".to_string(),
        });
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec!["Loading", "files:2", "read", "skip:bad.csv"]
        );
    }
}

/// Progress reporting for the navto CLI
///
/// Writes to stderr so stdout stays clean for piped output.
use std::sync::Mutex;
use std::time::Instant;

#[derive(Debug)]
struct ProgressState {
    total_projects: usize,
    completed_projects: usize,
    last_report: Instant,
}

pub struct ProgressReporter {
    start_time: Instant,
    quiet: bool,
    state: Mutex<ProgressState>,
}

impl ProgressReporter {
    pub fn new(quiet: bool) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            quiet,
            state: Mutex::new(ProgressState {
                total_projects: 0,
                completed_projects: 0,
                last_report: now,
            }),
        }
    }

    pub fn started(&self, pattern: &str, total_projects: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.total_projects = total_projects;
        }
        if !self.quiet {
            eprintln!("🚀 Searching '{}' across {} projects", pattern, total_projects);
        }
    }

    /// Count a finished project (throttled to one line per 100ms)
    pub fn project_completed(&self) -> usize {
        let Ok(mut state) = self.state.lock() else {
            return 0;
        };
        state.completed_projects += 1;
        let completed = state.completed_projects;

        let now = Instant::now();
        let throttled = now.duration_since(state.last_report).as_millis() < 100 && completed < state.total_projects;
        if !self.quiet && !throttled {
            state.last_report = now;
            eprintln!("⚡ Progress: {}/{} projects", completed, state.total_projects);
        }
        completed
    }

    pub fn complete(&self, results: usize, is_fully_loaded: bool) {
        if self.quiet {
            return;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        eprintln!("✅ Search complete: {} results in {:.2}s", results, elapsed);
        if !is_fully_loaded {
            eprintln!("⚠️  Workspace still loading; results may be incomplete");
        }
    }
}

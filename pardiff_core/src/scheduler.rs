use crate::byte_compare::ByteComparator;
use crate::filter::EntryFilter;
use crate::reconcile::reconcile;
use crate::report::ReportSink;
use pardiff_common::{DiffConfig, DiffError, EntryKind, EntryPair, ReportLine, Vfs};
use rayon::{Scope, ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Counts collected over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_compared: u64,
    pub files_differ: u64,
    pub dirs_compared: u64,
    pub lines_emitted: u64,
}

#[derive(Debug, Default)]
struct RunStats {
    files_compared: AtomicU64,
    files_differ: AtomicU64,
    dirs_compared: AtomicU64,
    lines_emitted: AtomicU64,
}

impl RunStats {
    fn snapshot(&self) -> RunSummary {
        RunSummary {
            files_compared: self.files_compared.load(Ordering::Relaxed),
            files_differ: self.files_differ.load(Ordering::Relaxed),
            dirs_compared: self.dirs_compared.load(Ordering::Relaxed),
            lines_emitted: self.lines_emitted.load(Ordering::Relaxed),
        }
    }
}

/// Drives file and directory comparisons on a work-stealing pool
///
/// Every file pair and (in recursive mode) every common subdirectory pair
/// becomes its own task. A directory task returns only once all tasks it
/// spawned have finished, so completion propagates bottom-up and the caller
/// of [`ComparisonScheduler::run`] waits on the root alone.
///
/// Report lines are emitted as soon as they are known and carry no ordering
/// guarantee. The first I/O fault aborts the run: tasks that have not
/// started yet are skipped and the fault is returned.
pub struct ComparisonScheduler {
    vfs: Arc<dyn Vfs>,
    sink: Arc<dyn ReportSink>,
    comparator: ByteComparator,
    filter: EntryFilter,
    recursive: bool,
    follow_symlinks: bool,
    pool: ThreadPool,
}

impl ComparisonScheduler {
    /// Build a scheduler whose pool runs `threads` workers (0 = one per CPU).
    pub fn new(
        vfs: Arc<dyn Vfs>,
        sink: Arc<dyn ReportSink>,
        threads: usize,
    ) -> Result<Self, DiffError> {
        Ok(Self {
            vfs,
            sink,
            comparator: ByteComparator::default(),
            filter: EntryFilter::default(),
            recursive: false,
            follow_symlinks: false,
            pool: build_pool(threads)?,
        })
    }

    pub fn from_config(
        config: &DiffConfig,
        vfs: Arc<dyn Vfs>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, DiffError> {
        config.validate()?;
        Ok(Self::new(vfs, sink, config.threads)?
            .with_recursive(config.recursive)
            .with_follow_symlinks(config.follow_symlinks)
            .with_chunk_size(config.chunk_size)
            .with_filter(EntryFilter::new(&config.exclude)?))
    }

    pub fn with_recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    pub fn with_follow_symlinks(mut self, enabled: bool) -> Self {
        self.follow_symlinks = enabled;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.comparator = ByteComparator::new(chunk_size);
        self
    }

    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Compare two roots: both files or both directories.
    ///
    /// A file paired with a directory is a usage fault and nothing is read.
    pub fn run(&self, left: &Path, right: &Path) -> Result<RunSummary, DiffError> {
        let left_meta = self
            .vfs
            .metadata(left)
            .map_err(|e| DiffError::from_vfs(left, e))?;
        let right_meta = self
            .vfs
            .metadata(right)
            .map_err(|e| DiffError::from_vfs(right, e))?;

        match (left_meta.is_dir, right_meta.is_dir) {
            (false, false) => self.run_files(left, right),
            (true, true) => self.run_directories(left, right),
            _ => Err(DiffError::MixedTypes {
                left: left.to_path_buf(),
                right: right.to_path_buf(),
            }),
        }
    }

    /// Compare two files as a single task.
    pub fn run_files(&self, left: &Path, right: &Path) -> Result<RunSummary, DiffError> {
        info!("Comparing files {} and {}", left.display(), right.display());
        let run = Run::new(self);
        self.pool.install(|| run.file_task(left, right));
        run.finish()
    }

    /// Compare two directories, waiting for the whole spawned task tree.
    pub fn run_directories(&self, left: &Path, right: &Path) -> Result<RunSummary, DiffError> {
        info!(
            "Comparing directories {} and {} (recursive: {})",
            left.display(),
            right.display(),
            self.recursive
        );
        let run = Run::new(self);
        self.pool
            .install(|| run.dir_task(left.to_path_buf(), right.to_path_buf(), PathBuf::new()));
        run.finish()
    }
}

/// Each nested directory level waits inside its own scope on the worker's
/// stack, so tree depth is bounded by this size.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

fn build_pool(threads: usize) -> Result<ThreadPool, DiffError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .stack_size(WORKER_STACK_SIZE)
        .thread_name(|i| format!("pardiff-worker-{}", i))
        .build()
        .map_err(|e| DiffError::Config(format!("Failed to build thread pool: {}", e)))
}

/// State shared by the tasks of one run
struct Run<'a> {
    scheduler: &'a ComparisonScheduler,
    stats: RunStats,
    fault: Mutex<Option<DiffError>>,
    aborted: AtomicBool,
}

impl<'a> Run<'a> {
    fn new(scheduler: &'a ComparisonScheduler) -> Self {
        Self {
            scheduler,
            stats: RunStats::default(),
            fault: Mutex::new(None),
            aborted: AtomicBool::new(false),
        }
    }

    fn finish(self) -> Result<RunSummary, DiffError> {
        let summary = self.stats.snapshot();
        let fault = self
            .fault
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match fault {
            Some(err) => Err(err),
            None => {
                info!(
                    "Compared {} files ({} differ) across {} directories, {} lines reported",
                    summary.files_compared,
                    summary.files_differ,
                    summary.dirs_compared,
                    summary.lines_emitted
                );
                Ok(summary)
            }
        }
    }

    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Record the first fault and stop further work.
    fn fail(&self, err: DiffError) {
        self.aborted.store(true, Ordering::Release);
        if let Ok(mut slot) = self.fault.lock() {
            if slot.is_none() {
                *slot = Some(err);
            } else {
                warn!("Additional fault after abort: {}", err);
            }
        }
    }

    fn emit(&self, line: ReportLine) {
        match self.scheduler.sink.emit(&line) {
            Ok(()) => {
                self.stats.lines_emitted.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => self.fail(err),
        }
    }

    fn file_task(&self, left: &Path, right: &Path) {
        if self.is_aborted() {
            return;
        }

        let scheduler = self.scheduler;
        match scheduler.comparator.equal(scheduler.vfs.as_ref(), left, right) {
            Ok(same) => {
                self.stats.files_compared.fetch_add(1, Ordering::Relaxed);
                if !same {
                    self.stats.files_differ.fetch_add(1, Ordering::Relaxed);
                    self.emit(ReportLine::FilesDiffer {
                        left: left.to_path_buf(),
                        right: right.to_path_buf(),
                    });
                }
            }
            Err(err) => self.fail(err),
        }
    }

    fn dir_task(&self, left: PathBuf, right: PathBuf, relative: PathBuf) {
        if self.is_aborted() {
            return;
        }

        let scheduler = self.scheduler;
        let listing = scheduler
            .vfs
            .read_dir(&left, scheduler.follow_symlinks)
            .map_err(|e| DiffError::from_vfs(&left, e))
            .and_then(|l| {
                scheduler
                    .vfs
                    .read_dir(&right, scheduler.follow_symlinks)
                    .map_err(|e| DiffError::from_vfs(&right, e))
                    .map(|r| (l, r))
            });
        let (left_entries, right_entries) = match listing {
            Ok(entries) => entries,
            Err(err) => return self.fail(err),
        };

        let left_entries = scheduler.filter.apply(&relative, left_entries);
        let right_entries = scheduler.filter.apply(&relative, right_entries);
        self.stats.dirs_compared.fetch_add(1, Ordering::Relaxed);

        let pairs = reconcile(&left, &left_entries, &right, &right_entries);
        debug!(
            "Reconciled {} ({} entries) with {} ({} entries): {} pairs",
            left.display(),
            left_entries.len(),
            right.display(),
            right_entries.len(),
            pairs.len()
        );

        // Children run in this scope; leaving it waits for all of them.
        rayon::scope(|scope| {
            for pair in pairs {
                if self.is_aborted() {
                    break;
                }
                self.dispatch(scope, pair, &left, &right, &relative);
            }
        });
    }

    fn dispatch<'s>(
        &'s self,
        scope: &Scope<'s>,
        pair: EntryPair,
        left_dir: &Path,
        right_dir: &Path,
        relative: &Path,
    ) {
        match pair {
            EntryPair::OnlyInLeft(name) => self.emit(ReportLine::OnlyIn {
                dir: left_dir.to_path_buf(),
                name,
            }),
            EntryPair::OnlyInRight(name) => self.emit(ReportLine::OnlyIn {
                dir: right_dir.to_path_buf(),
                name,
            }),
            EntryPair::BothFiles(left, right) => {
                debug!("Spawning file comparison for {}", left.display());
                scope.spawn(move |_| self.file_task(&left, &right));
            }
            EntryPair::BothDirectories(left, right) if self.scheduler.recursive => {
                let child = match left.file_name() {
                    Some(name) => relative.join(name),
                    None => relative.to_path_buf(),
                };
                debug!("Descending into {}", child.display());
                scope.spawn(move |_| self.dir_task(left, right, child));
            }
            EntryPair::BothDirectories(left, right) => {
                self.emit(ReportLine::CommonSubdirSkipped { left, right })
            }
            EntryPair::LeftDirRightFile(left, right) => self.emit(ReportLine::TypeMismatch {
                left,
                left_kind: EntryKind::Directory,
                right,
                right_kind: EntryKind::File,
            }),
            EntryPair::LeftFileRightDir(left, right) => self.emit(ReportLine::TypeMismatch {
                left,
                left_kind: EntryKind::File,
                right,
                right_kind: EntryKind::Directory,
            }),
        }
    }
}

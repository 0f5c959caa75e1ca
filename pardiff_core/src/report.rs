use pardiff_common::{DiffError, ReportLine};
use std::io::Write;
use std::sync::Mutex;

/// Destination for report lines
///
/// Implementations are shared by every comparison task, so each call to
/// `emit` must write its line as one unit.
pub trait ReportSink: Send + Sync {
    fn emit(&self, line: &ReportLine) -> Result<(), DiffError>;
}

/// Writes rendered lines to any `Write`, one locked write per line
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    color: bool,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> ReportSink for WriterSink<W> {
    fn emit(&self, line: &ReportLine) -> Result<(), DiffError> {
        let mut rendered = line.render(self.color);
        rendered.push('\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| DiffError::Output(format!("Lock error: {}", e)))?;
        writer
            .write_all(rendered.as_bytes())
            .map_err(|e| DiffError::Output(e.to_string()))?;
        writer.flush().map_err(|e| DiffError::Output(e.to_string()))
    }
}

/// Collects lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<ReportLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn lines(&self) -> Vec<ReportLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, line: &ReportLine) -> Result<(), DiffError> {
        self.lines
            .lock()
            .map_err(|e| DiffError::Output(format!("Lock error: {}", e)))?
            .push(line.clone());
        Ok(())
    }
}

use std::fmt::Debug;
use std::io;
use std::io::Write;
use strum::IntoStaticStr;

/// Parts of the report, written in this order.
#[derive(Clone, Copy, Debug, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum ReportSection {
    Regression,
    Projections,
}

pub trait Output: Debug {
    fn writer_for_section(&self, section: ReportSection) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes every section of the report to standard output.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn writer_for_section(&self, _section: ReportSection) -> anyhow::Result<impl Write> {
        Ok(io::stdout().lock())
    }
}

impl<T: Output> Output for &T {
    fn writer_for_section(&self, section: ReportSection) -> anyhow::Result<impl Write> {
        <T as Output>::writer_for_section(self, section)
    }

    fn is_noop(&self) -> bool {
        <T as Output>::is_noop(self)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_section(&self, _section: ReportSection) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

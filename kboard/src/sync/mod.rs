//! Critical-section admission for the two clip roles.
//!
//! Writers (copy and paste both mutate the ring) must run alone. Readers only
//! peek, so any number of them may share the section. The three
//! [`SyncSolution`]s differ in who wins when both roles contend:
//!
//! | Solution | Readers | Writers |
//! |----------|---------|---------|
//! | [`ReaderPreference`] | never wait for a *waiting* writer | may starve |
//! | [`WriterPreference`] | blocked once a writer is waiting | bounded wait |
//! | [`Ticket`] | batch-admitted after each writer | bounded wait |
//!
//! Admission never fails, it only blocks. There is no timeout.

use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

mod reader_preference;
mod semaphore;
mod ticket;
mod writer_preference;

pub use self::reader_preference::ReaderPreference;
pub use self::semaphore::Semaphore;
pub use self::ticket::Ticket;
pub use self::writer_preference::WriterPreference;

/// One readers-writers protocol guarding the ring.
///
/// Every `enter_*` must be paired with the matching `leave_*` on the same
/// thread. Prefer [`writer_pass`] and [`reader_pass`], which pair them for you.
pub trait Admission: Send + Sync {
    fn enter_writer(&self);
    fn leave_writer(&self);
    fn enter_reader(&self);
    fn leave_reader(&self);
    fn solution(&self) -> SyncSolution;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncSolution {
    ReaderPreference,
    WriterPreference,
    Ticket,
}

impl Default for SyncSolution {
    fn default() -> Self {
        SyncSolution::WriterPreference
    }
}

impl SyncSolution {
    pub const ALL: [SyncSolution; 3] = [
        SyncSolution::ReaderPreference,
        SyncSolution::WriterPreference,
        SyncSolution::Ticket,
    ];

    /// Numeric id shown in the dump.
    pub fn id(self) -> u8 {
        match self {
            SyncSolution::ReaderPreference => 1,
            SyncSolution::WriterPreference => 2,
            SyncSolution::Ticket => 3,
        }
    }

    pub fn build(self) -> Box<dyn Admission> {
        match self {
            SyncSolution::ReaderPreference => Box::new(ReaderPreference::new()),
            SyncSolution::WriterPreference => Box::new(WriterPreference::new()),
            SyncSolution::Ticket => Box::new(Ticket::new()),
        }
    }
}

impl fmt::Display for SyncSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SyncSolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "reader-preference" => Ok(SyncSolution::ReaderPreference),
            "2" | "writer-preference" => Ok(SyncSolution::WriterPreference),
            "3" | "ticket" => Ok(SyncSolution::Ticket),
            other => Err(format!("unknown synchronization solution: '{}'", other)),
        }
    }
}

/// Writer admission held until dropped.
pub struct WriterPass<'a> {
    admission: &'a dyn Admission,
}

impl Drop for WriterPass<'_> {
    fn drop(&mut self) {
        self.admission.leave_writer();
    }
}

/// Reader admission held until dropped.
pub struct ReaderPass<'a> {
    admission: &'a dyn Admission,
}

impl Drop for ReaderPass<'_> {
    fn drop(&mut self) {
        self.admission.leave_reader();
    }
}

pub fn writer_pass(admission: &dyn Admission) -> WriterPass<'_> {
    admission.enter_writer();
    WriterPass { admission }
}

pub fn reader_pass(admission: &dyn Admission) -> ReaderPass<'_> {
    admission.enter_reader();
    ReaderPass { admission }
}

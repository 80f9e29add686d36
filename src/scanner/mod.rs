//! Terminal presentation of scans: input, session state and link handling.

pub mod app;
pub mod input;
pub mod links;
pub mod session;

pub use app::{ScannerApp, ScannerError};
pub use input::{LineScanSource, ScanEvent, ScanSource};
pub use links::{LinkOpener, SystemLinkOpener, open_certificate};
pub use session::{Alert, ScanOutcome, ScanPhase, ScanRequest, ScanSession, ScanTicket};

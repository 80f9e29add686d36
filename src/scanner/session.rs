//! Scan session state machine.
//!
//! A session moves `Idle -> Scanning -> ShowingResult -> Idle`. New scans are
//! only accepted while idle, and every lookup is tagged with a ticket so a
//! result arriving after the user dismissed the scan is dropped.

use crate::domain::lookup::ProductLookup;
use crate::domain::types::ScanPayload;
use crate::services::{ServiceError, ServiceResult};

/// Identifies one lookup issued by a [`ScanSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanTicket(u64);

/// A lookup the caller must run and report back via
/// [`ScanSession::finish_scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub ticket: ScanTicket,
    pub payload: ScanPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    /// Ready for the next code.
    Idle,
    /// A payload was captured and its lookup is in flight.
    Scanning {
        ticket: ScanTicket,
        payload: ScanPayload,
    },
    /// The detail view is open.
    ShowingResult(Box<ProductLookup>),
}

/// User-facing message for a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    ProductNotFound,
    FetchFailed,
}

impl Alert {
    pub fn message(self) -> &'static str {
        match self {
            Alert::ProductNotFound => "Product not found",
            Alert::FetchFailed => "Error fetching product information",
        }
    }
}

impl From<&ServiceError> for Alert {
    fn from(error: &ServiceError) -> Self {
        match error {
            ServiceError::NotFound => Alert::ProductNotFound,
            ServiceError::StoreUnavailable => Alert::FetchFailed,
        }
    }
}

/// What [`ScanSession::finish_scan`] did with a lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The detail view is now open.
    Shown,
    /// The lookup failed; the session is idle again.
    Failed(Alert),
    /// The result belonged to a scan that is no longer active.
    Discarded,
}

#[derive(Debug)]
pub struct ScanSession {
    phase: ScanPhase,
    issued: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Idle,
            issued: 0,
        }
    }

    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ScanPhase::Idle)
    }

    /// The lookup shown in the detail view, if open.
    pub fn result(&self) -> Option<&ProductLookup> {
        match &self.phase {
            ScanPhase::ShowingResult(lookup) => Some(&**lookup),
            _ => None,
        }
    }

    /// Accept a decoded payload and issue a lookup ticket.
    ///
    /// Returns `None` while a scan is in flight or a result is displayed, and
    /// for blank payloads.
    pub fn begin_scan(&mut self, raw: &str) -> Option<ScanRequest> {
        if !self.is_idle() {
            log::debug!("Ignoring scan while busy");
            return None;
        }

        let payload = match ScanPayload::new(raw) {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!("Ignoring scan: {e}");
                return None;
            }
        };

        self.issued += 1;
        let ticket = ScanTicket(self.issued);
        self.phase = ScanPhase::Scanning {
            ticket,
            payload: payload.clone(),
        };
        Some(ScanRequest { ticket, payload })
    }

    /// Deliver the result of the lookup issued with `ticket`.
    pub fn finish_scan(
        &mut self,
        ticket: ScanTicket,
        result: ServiceResult<ProductLookup>,
    ) -> ScanOutcome {
        let current = matches!(
            self.phase,
            ScanPhase::Scanning { ticket: active, .. } if active == ticket
        );
        if !current {
            log::debug!("Discarding stale lookup result {ticket:?}");
            return ScanOutcome::Discarded;
        }

        match result {
            Ok(lookup) => {
                self.phase = ScanPhase::ShowingResult(Box::new(lookup));
                ScanOutcome::Shown
            }
            Err(e) => {
                self.phase = ScanPhase::Idle;
                ScanOutcome::Failed(Alert::from(&e))
            }
        }
    }

    /// Close the detail view (or abandon an in-flight scan) and drop every
    /// resolved product. Returns `false` when already idle.
    pub fn dismiss(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        self.phase = ScanPhase::Idle;
        true
    }
}

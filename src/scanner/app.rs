//! Interactive scan loop.
//!
//! Input events and the in-flight lookup are polled together on one task, so
//! the user can close a scan while its lookup is still running. The resolver
//! is moved into the lookup future and handed back on completion; a scan
//! started while the previous (dismissed) lookup is still running waits in a
//! one-slot queue.

use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use crate::domain::lookup::ProductLookup;
use crate::repository::ProductReader;
use crate::scanner::input::{ScanEvent, ScanSource};
use crate::scanner::links::{LinkOpener, open_certificate};
use crate::scanner::session::{ScanOutcome, ScanRequest, ScanSession, ScanTicket};
use crate::services::ServiceResult;
use crate::services::resolver::ProductResolver;
use crate::views::{ViewError, ViewRenderer};

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    View(#[from] ViewError),
}

type Lookup<S, G> = Pin<
    Box<dyn Future<Output = (ProductResolver<S, G>, ScanTicket, ServiceResult<ProductLookup>)>>,
>;

async fn wait_lookup<S, G>(
    in_flight: &mut Option<Lookup<S, G>>,
) -> (ProductResolver<S, G>, ScanTicket, ServiceResult<ProductLookup>) {
    match in_flight {
        Some(lookup) => lookup.as_mut().await,
        None => std::future::pending().await,
    }
}

pub struct ScannerApp<S, G, O> {
    /// `None` while a lookup owns the resolver.
    resolver: Option<ProductResolver<S, G>>,
    views: ViewRenderer,
    opener: O,
    session: ScanSession,
}

impl<S, G, O> ScannerApp<S, G, O>
where
    S: ProductReader + 'static,
    G: Rng + 'static,
    O: LinkOpener,
{
    pub fn new(resolver: ProductResolver<S, G>, views: ViewRenderer, opener: O) -> Self {
        Self {
            resolver: Some(resolver),
            views,
            opener,
            session: ScanSession::new(),
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Process events until `:quit` or the end of input. Once input ends,
    /// pending lookups still complete and are shown.
    pub async fn run<I, W>(&mut self, source: &mut I, out: &mut W) -> Result<(), ScannerError>
    where
        I: ScanSource,
        W: Write,
    {
        let mut in_flight: Option<Lookup<S, G>> = None;
        let mut queued: Option<ScanRequest> = None;
        let mut input_open = true;

        self.write_status(out)?;

        loop {
            tokio::select! {
                biased;

                (resolver, ticket, result) = wait_lookup(&mut in_flight) => {
                    in_flight = None;
                    self.resolver = Some(resolver);
                    self.deliver(ticket, result, out)?;
                    if let Some(request) = queued.take() {
                        in_flight = self.start_lookup(request).ok();
                    }
                    if !input_open && in_flight.is_none() {
                        break;
                    }
                }
                event = source.next_event(), if input_open => {
                    let Some(event) = event? else {
                        input_open = false;
                        if in_flight.is_none() {
                            break;
                        }
                        continue;
                    };

                    match event {
                        ScanEvent::Quit => break,
                        ScanEvent::Payload(raw) => {
                            if let Some(request) = self.session.begin_scan(&raw) {
                                self.write_status(out)?;
                                match self.start_lookup(request) {
                                    Ok(lookup) => in_flight = Some(lookup),
                                    Err(request) => queued = Some(request),
                                }
                            }
                        }
                        ScanEvent::Close => {
                            if self.session.dismiss() {
                                queued = None;
                                self.write_status(out)?;
                            }
                        }
                        ScanEvent::OpenCertificate => self.open_certificate(out)?,
                    }
                }
            }
        }

        Ok(())
    }

    /// Hand the resolver to a new lookup future, or give the request back if
    /// an earlier lookup still owns it.
    fn start_lookup(&mut self, request: ScanRequest) -> Result<Lookup<S, G>, ScanRequest> {
        let Some(mut resolver) = self.resolver.take() else {
            log::debug!("Queueing scan until the previous lookup returns");
            return Err(request);
        };

        Ok(Box::pin(async move {
            let result = resolver.resolve(&request.payload).await;
            (resolver, request.ticket, result)
        }))
    }

    fn deliver<W: Write>(
        &mut self,
        ticket: ScanTicket,
        result: ServiceResult<ProductLookup>,
        out: &mut W,
    ) -> Result<(), ScannerError> {
        match self.session.finish_scan(ticket, result) {
            ScanOutcome::Shown => {
                if let Some(lookup) = self.session.result() {
                    let view = self.views.render_detail(lookup, Utc::now())?;
                    writeln!(out, "{view}")?;
                }
            }
            ScanOutcome::Failed(alert) => {
                writeln!(out, "{}", self.views.render_alert(alert)?)?;
                self.write_status(out)?;
            }
            ScanOutcome::Discarded => {}
        }
        Ok(())
    }

    fn open_certificate<W: Write>(&self, out: &mut W) -> Result<(), ScannerError> {
        let Some(lookup) = self.session.result() else {
            return Ok(());
        };
        match open_certificate(&lookup.product, &self.opener) {
            Ok(true) => writeln!(out, "Opening certificate...")?,
            Ok(false) => writeln!(out, "No certificate available")?,
            Err(e) => {
                log::error!("Failed to open certificate: {e}");
                writeln!(out, "Could not open certificate")?;
            }
        }
        Ok(())
    }

    fn write_status<W: Write>(&self, out: &mut W) -> Result<(), ScannerError> {
        writeln!(out, "{}", self.views.render_status(self.session.phase())?)?;
        Ok(())
    }
}

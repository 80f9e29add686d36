use std::io;
use std::process::{Command, Stdio};

use crate::domain::product::Product;
use crate::domain::types::MediaUrl;

/// Opens links with whatever the platform uses for URLs.
pub trait LinkOpener {
    fn open(&self, url: &MediaUrl) -> io::Result<()>;
}

impl<O: LinkOpener + ?Sized> LinkOpener for &O {
    fn open(&self, url: &MediaUrl) -> io::Result<()> {
        (**self).open(url)
    }
}

/// Hands URLs to the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLinkOpener;

impl SystemLinkOpener {
    fn command(url: &str) -> Command {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        } else {
            Command::new("xdg-open")
        };
        command.arg(url);
        command
    }
}

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &MediaUrl) -> io::Result<()> {
        log::info!("Opening {url}");
        Self::command(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// Open the product's certificate document. Returns `Ok(false)` when the
/// product has none.
pub fn open_certificate<O>(product: &Product, opener: &O) -> io::Result<bool>
where
    O: LinkOpener + ?Sized,
{
    match &product.certificate_file {
        Some(url) => opener.open(url).map(|_| true),
        None => Ok(false),
    }
}

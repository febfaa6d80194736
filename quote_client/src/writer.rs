//! Output file for the fetched quote.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;
use quote_common::{Quote, Result};

/// Create (or truncate) `path` and write the quote line, e.g. `Dólar: 5.432100\n`.
pub fn save_quote(path: &Path, quote: &Quote) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(quote.to_file_line().as_bytes())?;
    file.flush()?;
    debug!("Wrote bid {} to {}", quote.bid, path.display());
    Ok(())
}

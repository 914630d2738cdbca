//! Offline viewer for the JSON Lines history file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

use crate::{error::ClientError, formatter::MessageFormatter};

/// Render every record of `reader` to `out`, one per line.
///
/// Blank lines are skipped, invalid UTF-8 is replaced and unparseable lines are
/// written verbatim. Returns the number of lines written.
pub fn render_history<R, W>(mut reader: R, out: &mut W) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut buf = Vec::new();
    let mut rendered = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        writeln!(out, "{}", MessageFormatter::format_line(line))?;
        rendered += 1;
    }

    Ok(rendered)
}

/// Print the history file at `path` to stdout
///
/// A missing file is not an error: a hint is printed instead.
pub fn view_history(path: &Path) -> Result<(), ClientError> {
    if !path.exists() {
        println!(
            "{} does not exist. Run the server and send some messages first.",
            path.display()
        );
        return Ok(());
    }

    let to_error = |source: io::Error| ClientError::History {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(to_error)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rendered = render_history(BufReader::new(file), &mut out).map_err(to_error)?;
    tracing::debug!("Rendered {} records from {}", rendered, path.display());
    Ok(())
}

use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_tolerating_closed_pipe(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_tolerating_closed_pipe(&mut io::stdout().lock(), text, true)
}

/// A reader that went away (`rutero classify X | head -1`) is not an error.
fn write_tolerating_closed_pipe<W>(writer: &mut W, text: &str, newline: bool) -> io::Result<()>
where
    W: Write,
{
    let written = writer
        .write_all(text.as_bytes())
        .and_then(|()| {
            if newline {
                writer.write_all(b"\n")
            } else {
                Ok(())
            }
        })
        .and_then(|()| writer.flush());

    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::write_tolerating_closed_pipe;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn appends_newline_when_requested() {
        let mut buffer = Vec::new();
        let written = write_tolerating_closed_pipe(&mut buffer, "master.csv", true);
        assert!(written.is_ok());
        assert_eq!(buffer, b"master.csv\n");
    }

    #[test]
    fn broken_pipe_is_swallowed() {
        let written = write_tolerating_closed_pipe(&mut ClosedPipe, "rows", true);
        assert!(written.is_ok());
    }
}

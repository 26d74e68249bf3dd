use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Stderr, Stdout, Write};

use crate::errors::Result;

/// Primary output plus a separate error stream. The merged document goes to
/// the former, warnings and diagnostics to the latter.
pub struct Writer {
    buffer: WriteBuffer,
    err: WriteBuffer,
}

impl Default for Writer {
    fn default() -> Self {
        Self {
            buffer: WriteBuffer::Stdout(std::io::stdout()),
            err: WriteBuffer::Stderr(std::io::stderr()),
        }
    }
}

impl Writer {
    pub fn new(buffer: WriteBuffer, err: WriteBuffer) -> Self {
        Self { buffer, err }
    }

    pub fn write_err(&mut self, s: String) -> std::io::Result<()> {
        writeln!(self.err, "{s}")
    }

    pub fn into_string(self) -> Result<String> {
        self.buffer.into_string()
    }

    pub fn stripped(self) -> Result<String> {
        self.buffer.stripped()
    }

    pub fn err_to_stripped(self) -> Result<String> {
        self.err.stripped()
    }

    /// Both streams with colour codes removed, output first.
    pub fn stripped_streams(self) -> Result<(String, String)> {
        Ok((self.buffer.stripped()?, self.err.stripped()?))
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.buffer.flush()
    }
}

pub enum WriteBuffer {
    Stdout(Stdout),
    Stderr(Stderr),
    Vec(Vec<u8>),
    File(File),
}

impl WriteBuffer {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            WriteBuffer::Vec(vec) => Ok(vec),
            WriteBuffer::File(mut file) => {
                let mut data = vec![];
                file.seek(SeekFrom::Start(0))?;
                file.read_to_end(&mut data)?;
                Ok(data)
            }
            WriteBuffer::Stdout(..) | WriteBuffer::Stderr(..) => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "standard streams cannot be read back",
            )
            .into()),
        }
    }

    fn into_string(self) -> Result<String> {
        Ok(String::from_utf8(self.into_bytes()?)?)
    }

    fn stripped(self) -> Result<String> {
        let stripped = strip_ansi_escapes::strip(self.into_bytes()?)?;
        Ok(String::from_utf8(stripped)?)
    }
}

impl Write for WriteBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.write(buf),
            WriteBuffer::Stderr(stderr) => stderr.write(buf),
            WriteBuffer::Vec(vec) => vec.write(buf),
            WriteBuffer::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.flush(),
            WriteBuffer::Stderr(stderr) => stderr.flush(),
            WriteBuffer::Vec(vec) => vec.flush(),
            WriteBuffer::File(file) => file.flush(),
        }
    }
}

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use regex::Regex;

use crate::charset::Charset;
use crate::cliopt::CliOpt;
use crate::error::Result;
use crate::output::{Encoder, Line, LineWriter};
use crate::reader::BoundedLineReader;
use crate::source::{ByteSource, ReadSource};

// input (stdin | files)
//   -> ByteSource
//     -> BoundedLineReader   (fails on an overlong line)
//       -> [grep]
//         -> Encoder         (plain | json)
//           -> LineWriter    -> stdout

pub struct Runner<W> {
    max_line_bytes: i64,
    charset: Charset,
    matcher: Option<Regex>,
    encoder: Box<dyn Encoder>,
    writer: LineWriter<W>,
}

impl<W: Write> Runner<W> {
    pub fn new(opt: &CliOpt, writer: W) -> Result<Self> {
        let charset = Charset::for_label(&opt.encoding)?;

        let matcher = match &opt.grep {
            Some(pattern) => Some(
                Regex::new(pattern)
                    .map_err(|e| (format!("bad --grep pattern '{}'", pattern), e))?,
            ),
            None => None,
        };

        Ok(Self {
            max_line_bytes: opt.max_line_bytes,
            charset,
            matcher,
            encoder: opt.format.encoder(opt.line_numbers),
            writer: LineWriter::new(writer),
        })
    }

    /// Reads every file in turn, or stdin when `files` is empty.
    pub fn run(&mut self, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            self.run_source(None, ReadSource::new(io::stdin()))?;
        }

        for path in files {
            let file = File::open(path)
                .map_err(|e| (format!("couldn't open {}", path.display()), e))?;
            let name = path.display().to_string();
            self.run_source(Some(&name), ReadSource::new(file))?;
        }

        self.writer
            .flush()
            .map_err(|e| ("writer failed with error", e))?;
        Ok(())
    }

    /// Prints the lines of a single source. Returns the number of lines read.
    pub fn run_source<S: ByteSource>(&mut self, name: Option<&str>, source: S) -> Result<usize> {
        let mut reader = BoundedLineReader::with_charset(source, self.max_line_bytes, self.charset);
        let mut line_no = 0;

        loop {
            let text = match reader.read_line() {
                Ok(Some(text)) => text,
                Ok(None) => break,
                Err(e) => {
                    log::error!(
                        "reading {} failed at line {}: {}",
                        name.unwrap_or("stdin"),
                        line_no + 1,
                        e
                    );
                    return Err((
                        format!(
                            "{}: line {} can't be read",
                            name.unwrap_or("stdin"),
                            line_no + 1
                        ),
                        e,
                    )
                        .into());
                }
            };
            line_no += 1;

            if let Some(matcher) = &self.matcher {
                if !matcher.is_match(&text) {
                    continue;
                }
            }

            let buf = self.encoder.encode(&Line {
                source: name,
                number: line_no,
                text: &text,
            })?;

            self.writer
                .write(&buf)
                .map_err(|e| ("writer failed with error", e))?;
        }

        reader.close()?;
        log::debug!("{}: {} lines", name.unwrap_or("stdin"), line_no);
        Ok(line_no)
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use structopt::StructOpt;

    use super::*;
    use crate::source::CursorSource;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn runner(args: &[&str]) -> Result<Runner<Vec<u8>>> {
        let mut argv = vec!["bline"];
        argv.extend_from_slice(args);
        Runner::new(&CliOpt::from_iter(argv), Vec::new())
    }

    #[test]
    fn test_grep() -> TestResult {
        let mut runner = runner(&["-g", "^b", "-n"])?;

        assert_eq!(3, runner.run_source(None, CursorSource::new("apple\nbanana\nberry\n"))?);
        assert_eq!("2:banana\n3:berry\n", String::from_utf8(runner.into_inner())?);
        Ok(())
    }

    #[test]
    fn test_overlong_line() -> TestResult {
        let mut runner = runner(&["-m", "8"])?;

        let err = runner
            .run_source(Some("in"), CursorSource::new("short\nmuch too long\n"))
            .unwrap_err();
        assert!(err.is_size_limit());
        assert_eq!("in: line 2 can't be read", err.message());
        assert_eq!("short\n", String::from_utf8(runner.into_inner())?);
        Ok(())
    }

    #[test]
    fn test_bad_options() {
        assert!(runner(&["-e", "no-such-charset"]).is_err());
        assert!(runner(&["-g", "("]).is_err());
    }
}

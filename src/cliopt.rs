use std::path::PathBuf;

use structopt::StructOpt;

use crate::output::Format;
use crate::utils::size::parse_byte_size;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bline",
    about = "Prints lines of untrusted input, failing on lines longer than a byte ceiling"
)]
pub struct CliOpt {
    /// Files to read. Reads stdin when none is given.
    #[structopt(parse(from_os_str))]
    pub files: Vec<PathBuf>,

    /// Maximum bytes read while looking for a line end, e.g. 4096, 64k, 1MiB or unlimited.
    #[structopt(
        long = "max-line-bytes",
        short = "m",
        default_value = "8KiB",
        allow_hyphen_values = true,
        parse(try_from_str = parse_byte_size)
    )]
    pub max_line_bytes: i64,

    /// Character encoding of the input.
    #[structopt(long = "encoding", short = "e", default_value = "ISO-8859-1")]
    pub encoding: String,

    /// Only print lines matching this regular expression.
    #[structopt(long = "grep", short = "g")]
    pub grep: Option<String>,

    /// Output format: plain or json.
    #[structopt(long = "format", short = "f", default_value = "plain")]
    pub format: Format,

    /// Prefix plain output with line numbers.
    #[structopt(long = "line-numbers", short = "n")]
    pub line_numbers: bool,

    #[structopt(long = "verbose", short = "v")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opt = CliOpt::from_iter(&["bline"]);

        assert!(opt.files.is_empty());
        assert_eq!(8192, opt.max_line_bytes);
        assert_eq!("ISO-8859-1", opt.encoding);
        assert_eq!(Format::Plain, opt.format);
        assert!(opt.grep.is_none());
    }

    #[test]
    fn test_options() {
        let opt = CliOpt::from_iter(&[
            "bline", "-m", "-1", "-e", "utf-8", "-f", "json", "-g", "^a", "x.log", "y.log",
        ]);

        assert_eq!(-1, opt.max_line_bytes);
        assert_eq!("utf-8", opt.encoding);
        assert_eq!(Format::Json, opt.format);
        assert_eq!(Some("^a".to_owned()), opt.grep);
        assert_eq!(vec![PathBuf::from("x.log"), PathBuf::from("y.log")], opt.files);
    }

    #[test]
    fn test_bad_size() {
        assert!(CliOpt::from_iter_safe(&["bline", "-m", "lots"]).is_err());
    }
}

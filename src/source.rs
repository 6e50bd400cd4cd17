//! Classifies an input descriptor and opens the stream behind it.
//!
//! Precedence, first match wins:
//! 1. contains `(`          -> inline WKT literal
//! 2. all hex digits        -> inline WKB hex literal
//! 3. ends with `.wkb`      -> streamed WKB (hex lines)
//! 4. anything else         -> streamed WKT
//!
//! Known gap: a parenthesis-free WKT literal such as `POINT EMPTY` is
//! taken for a file name by rule 4.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::wkb;
use crate::Encoding;

pub const WKB_SUFFIX: &str = ".wkb";
pub const WKT_SUFFIX: &str = ".wkt";

const WKT_STDIN: &[&str] = &["-", "stdin", "stdin.wkt"];
const WKB_STDIN: &[&str] = &["-.wkb", "stdin.wkb"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    WktLiteral,
    WkbLiteral,
    Stream { encoding: Encoding, input: Input },
}

impl SourceKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, SourceKind::WktLiteral | SourceKind::WkbLiteral)
    }
}

/// Pure classification; nothing is opened.
pub fn classify(descriptor: &str) -> SourceKind {
    if descriptor.contains('(') {
        return SourceKind::WktLiteral;
    }
    if wkb::is_hex(descriptor) {
        return SourceKind::WkbLiteral;
    }
    if descriptor.ends_with(WKB_SUFFIX) {
        let input = if WKB_STDIN.contains(&descriptor) {
            Input::Stdin
        } else {
            Input::Path(PathBuf::from(descriptor))
        };
        return SourceKind::Stream {
            encoding: Encoding::Wkb,
            input,
        };
    }
    let input = if WKT_STDIN.contains(&descriptor) {
        Input::Stdin
    } else {
        Input::Path(PathBuf::from(descriptor))
    };
    SourceKind::Stream {
        encoding: Encoding::Wkt,
        input,
    }
}

/// An input descriptor after classification, with its stream open.
pub enum Source {
    Literal { encoding: Encoding, text: String },
    Stream {
        encoding: Encoding,
        reader: Box<dyn BufRead>,
    },
}

impl Source {
    pub fn open(descriptor: &str) -> Result<Source> {
        let source = match classify(descriptor) {
            SourceKind::WktLiteral => Source::Literal {
                encoding: Encoding::Wkt,
                text: descriptor.to_string(),
            },
            SourceKind::WkbLiteral => Source::Literal {
                encoding: Encoding::Wkb,
                text: descriptor.to_string(),
            },
            SourceKind::Stream { encoding, input } => Source::Stream {
                encoding,
                reader: open_input(&input)?,
            },
        };
        Ok(source)
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Source::Literal { encoding, .. } | Source::Stream { encoding, .. } => *encoding,
        }
    }
}

fn open_input(input: &Input) -> Result<Box<dyn BufRead>> {
    match input {
        Input::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
        Input::Path(path) => {
            let file = File::open(path).map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stream(encoding: Encoding, input: Input) -> SourceKind {
        SourceKind::Stream { encoding, input }
    }

    #[test]
    fn literals() {
        assert_eq!(classify("POINT (1 2)"), SourceKind::WktLiteral);
        assert_eq!(classify("0101000000000000000000F03F0000000000000040"), SourceKind::WkbLiteral);
    }

    #[test]
    fn parenthesis_wins_over_suffix() {
        assert_eq!(classify("odd(name).wkb"), SourceKind::WktLiteral);
    }

    #[test]
    fn files_by_suffix() {
        assert_eq!(
            classify("data/roads.wkb"),
            stream(Encoding::Wkb, Input::Path(PathBuf::from("data/roads.wkb")))
        );
        assert_eq!(
            classify("data/roads.wkt"),
            stream(Encoding::Wkt, Input::Path(PathBuf::from("data/roads.wkt")))
        );
        assert_eq!(
            classify("roads.txt"),
            stream(Encoding::Wkt, Input::Path(PathBuf::from("roads.txt")))
        );
    }

    #[test]
    fn stdin_sentinels() {
        for s in ["-", "stdin", "stdin.wkt"] {
            assert_eq!(classify(s), stream(Encoding::Wkt, Input::Stdin), "{}", s);
        }
        for s in ["-.wkb", "stdin.wkb"] {
            assert_eq!(classify(s), stream(Encoding::Wkb, Input::Stdin), "{}", s);
        }
    }

    #[test]
    fn only_the_binary_sentinel_reads_stdin() {
        // A .wkb file that merely looks like a sentinel is still a file.
        assert_eq!(
            classify("my-stdin.wkb"),
            stream(Encoding::Wkb, Input::Path(PathBuf::from("my-stdin.wkb")))
        );
    }

    #[test]
    fn empty_keyword_literal_is_not_recognised() {
        assert_eq!(
            classify("POINT EMPTY"),
            stream(Encoding::Wkt, Input::Path(PathBuf::from("POINT EMPTY")))
        );
    }

    #[test]
    fn empty_descriptor_is_not_hex() {
        assert!(!classify("").is_literal());
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = Source::open("/no/such/dir/input.wkt").err().unwrap();
        assert!(matches!(err, Error::Open { .. }));
    }

    proptest! {
        #[test]
        fn any_parenthesis_means_wkt_literal(prefix in ".*", suffix in ".*") {
            let descriptor = format!("{}({}", prefix, suffix);
            prop_assert_eq!(classify(&descriptor), SourceKind::WktLiteral);
        }

        #[test]
        fn hex_strings_are_wkb_literals(hex in "[0-9a-fA-F]{1,64}") {
            prop_assert_eq!(classify(&hex), SourceKind::WkbLiteral);
        }
    }
}

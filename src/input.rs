//! Input boundary: only fully buffered documents reach the resolver

use std::fmt;
use std::io::Read;

use thiserror::Error;

use crate::error::{ProcessError, PLUGIN_NAME};
use crate::resolver::Resolver;

/// A document handed to the engine
pub enum Input {
    /// The whole document, already in memory
    Buffered(String),
    /// A live stream; always rejected
    Streamed(Box<dyn Read>),
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Buffered(text) => f.debug_tuple("Buffered").field(text).finish(),
            Input::Streamed(_) => f.write_str("Streamed(..)"),
        }
    }
}

/// A document the engine refused, returned untouched
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    pub error: ProcessError,
    pub input: Input,
}

/// A named document in a batch
#[derive(Debug)]
pub struct NamedInput {
    pub name: String,
    pub input: Input,
}

impl NamedInput {
    pub fn new(name: impl Into<String>, input: Input) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Outcome for one document of a batch
#[derive(Debug)]
pub struct Processed {
    pub name: String,
    pub result: Result<String, Rejected>,
}

/// Resolve one buffered document; streamed input is handed back unmodified
/// without reaching the resolver.
pub fn process(resolver: &Resolver<'_>, origin: &str, input: Input) -> Result<String, Rejected> {
    match input {
        Input::Buffered(text) => Ok(resolver.resolve_document(origin, &text)),
        streamed @ Input::Streamed(_) => {
            let error = ProcessError::UnsupportedInputKind;
            tracing::error!("[{}] {}: {}", PLUGIN_NAME, origin, error);
            Err(Rejected {
                error,
                input: streamed,
            })
        }
    }
}

/// Resolve a sequence of documents, each independently of the others
pub fn process_batch(resolver: &Resolver<'_>, inputs: Vec<NamedInput>) -> Vec<Processed> {
    inputs
        .into_iter()
        .map(|doc| Processed {
            result: process(resolver, &doc.name, doc.input),
            name: doc.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialConfig;
    use crate::resolver::{CollectingReporter, INPUT_ORIGIN};
    use std::io::Cursor;

    #[test]
    fn test_streamed_input_is_rejected_untouched() {
        let config = PartialConfig::new();
        let reporter = CollectingReporter::new();
        let resolver = Resolver::new(&config, &reporter).unwrap();
        let stream = Cursor::new(b"<partial src=\"x.html\"/>".to_vec());

        let rejected = process(&resolver, INPUT_ORIGIN, Input::Streamed(Box::new(stream)))
            .unwrap_err();
        assert_eq!(rejected.error, ProcessError::UnsupportedInputKind);
        assert_eq!(rejected.to_string(), "streams unsupported");

        // The resolver never ran, so nothing was reported
        assert!(reporter.is_empty());

        let Input::Streamed(mut original) = rejected.input else {
            panic!("expected the stream back");
        };
        let mut text = String::new();
        original.read_to_string(&mut text).unwrap();
        assert_eq!(text, "<partial src=\"x.html\"/>");
    }

    #[test]
    fn test_batch_continues_after_rejection() {
        let config = PartialConfig::new().with_pretty_print(false);
        let reporter = CollectingReporter::new();
        let resolver = Resolver::new(&config, &reporter).unwrap();
        let docs = vec![
            NamedInput::new("one", Input::Streamed(Box::new(std::io::empty()))),
            NamedInput::new("two", Input::Buffered("<p>ok</p>".to_string())),
        ];

        let results = process_batch(&resolver, docs);
        assert_eq!(results.len(), 2);
        assert!(results[0].result.is_err());
        assert_eq!(results[1].name, "two");
        assert_eq!(results[1].result.as_ref().unwrap(), "<p>ok</p>");
    }
}

//! Batch orchestration across a bounded worker pool.
//!
//! Independent documents fan out over OS-level parallel workers; within
//! one document, parse → render → chunk stays sequential because each
//! stage consumes the previous stage's output. Results come back in
//! input order regardless of completion order, and one input's failure
//! lands in its own slot without cancelling sibling work.
//!
//! The only state shared between workers is the read-only selector
//! cache; every `Document` is owned by exactly one in-flight conversion.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::chunker;
use crate::error::{Error, Result};
use crate::parser;
use crate::render;
use crate::types::{BatchSummary, ConversionOutput, ConversionRequest};

/// Convert a single document: parse, render, optionally chunk.
///
/// This is the same function the batch path maps over its inputs, so a
/// one-document batch and a direct call behave identically.
pub fn convert(
    html: &str,
    base_url: &str,
    request: &ConversionRequest,
) -> Result<ConversionOutput> {
    let doc = parser::parse(html, base_url)?;
    let rendered = render::render(&doc, request.format)?;
    let chunks = match &request.chunk {
        Some(options) => Some(chunker::chunk(&doc, options, request.format)?),
        None => None,
    };
    Ok(ConversionOutput { rendered, chunks })
}

/// Convert a batch of `(html, base_url)` inputs on the process-global
/// worker pool, sized to available parallelism.
///
/// Length- and order-preserving: the i-th result corresponds to the i-th
/// input. Collection into indexed slots is what guarantees this; workers
/// may finish in any order.
pub fn convert_many(
    inputs: &[(String, String)],
    request: &ConversionRequest,
) -> Vec<Result<ConversionOutput>> {
    debug!(inputs = inputs.len(), format = %request.format, "converting batch");

    let results: Vec<Result<ConversionOutput>> = inputs
        .par_iter()
        .map(|(html, base_url)| convert(html, base_url, request))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(failed, total = results.len(), "batch completed with failures");
    }
    results
}

/// Convert a batch on a dedicated pool of `workers` threads.
///
/// `None` uses the process-global pool. Failing to build the dedicated
/// pool is the only whole-batch error.
pub fn convert_many_with_workers(
    inputs: &[(String, String)],
    request: &ConversionRequest,
    workers: Option<usize>,
) -> Result<Vec<Result<ConversionOutput>>> {
    match workers {
        None => Ok(convert_many(inputs, request)),
        Some(workers) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| Error::WorkerPool(e.to_string()))?;
            Ok(pool.install(|| convert_many(inputs, request)))
        },
    }
}

/// Count per-item outcomes for front-end reporting.
#[must_use]
pub fn summarize<T>(results: &[Result<T>]) -> BatchSummary {
    let failed = results.iter().filter(|r| r.is_err()).count();
    BatchSummary {
        total: results.len(),
        succeeded: results.len() - failed,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::types::{ChunkOptions, Format};

    fn input(marker: usize, padding: usize) -> (String, String) {
        // Vary document size so completion order differs from input order.
        let body = "lorem ipsum ".repeat(padding);
        (
            format!("<h1>doc-{marker}</h1><p>{body}</p>"),
            format!("https://x.test/{marker}"),
        )
    }

    #[test]
    fn test_single_document_convert() {
        let request = ConversionRequest::rendered(Format::Markdown);
        let output = convert("<h1>Title</h1><p>Hello world.</p>", "https://x.test/", &request)
            .expect("convert");
        assert_eq!(output.rendered, "# Title\n\nHello world.");
        assert!(output.chunks.is_none());
    }

    #[test]
    fn test_convert_with_chunks() {
        let request = ConversionRequest::chunked(
            Format::Markdown,
            ChunkOptions {
                chunk_size: 8,
                overlap: 2,
            },
        );
        let output = convert("<h1>Title</h1><p>Hello world.</p>", "https://x.test/", &request)
            .expect("convert");
        let chunks = output.chunks.expect("chunks requested");
        assert!(chunks.len() >= 2);
    }

    #[test]
    fn test_batch_order_preserved_under_skewed_workloads() {
        let inputs: Vec<(String, String)> = (0..32)
            .map(|i| input(i, if i % 2 == 0 { 2000 } else { 1 }))
            .collect();
        let request = ConversionRequest::rendered(Format::Markdown);

        let results = convert_many(&inputs, &request);
        assert_eq!(results.len(), inputs.len());
        for (i, result) in results.iter().enumerate() {
            let output = result.as_ref().expect("all inputs are valid");
            assert!(
                output.rendered.starts_with(&format!("# doc-{i}")),
                "slot {i} holds the wrong document"
            );
        }
    }

    #[test]
    fn test_failure_lands_in_its_slot() {
        let inputs = vec![
            input(0, 1),
            (String::new(), "https://x.test/1".to_string()),
            input(2, 1),
        ];
        let request = ConversionRequest::rendered(Format::Markdown);

        let results = convert_many(&inputs, &request);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(Error::Parse(ParseError::Malformed)),
            "empty input must fail alone"
        );
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_worker_override() {
        let inputs: Vec<(String, String)> = (0..8).map(|i| input(i, 10)).collect();
        let request = ConversionRequest::rendered(Format::Json);

        let results = convert_many_with_workers(&inputs, &request, Some(2))
            .expect("pool of two workers should build");
        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            let output = result.as_ref().expect("valid input");
            assert!(output.rendered.contains(&format!("doc-{i}")));
        }
    }

    #[test]
    fn test_empty_batch() {
        let request = ConversionRequest::rendered(Format::Markdown);
        assert!(convert_many(&[], &request).is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let inputs = vec![
            input(0, 1),
            (String::new(), "https://x.test/bad".to_string()),
        ];
        let request = ConversionRequest::rendered(Format::Markdown);
        let results = convert_many(&inputs, &request);

        let summary = summarize(&results);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
    }
}

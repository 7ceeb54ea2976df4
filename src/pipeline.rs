use crate::config::StrandConfig;
use crate::error::PipelineError;
use crate::filter::PairFilter;
use crate::gale_church;
use crate::html_reducer;
use crate::io::{self, Entry, PairOutputWriter};
use crate::segment;
use crate::strand;
use crate::tagchunk::PairStats;
use std::collections::HashMap;
use std::path::Path;

/// Every accepted sentence pair mined from one (source, target) webpage
/// pair, ready to be written as a single annotated unit: the `.annotation`
/// sidecar gets exactly one row per document pair, not one per sentence.
struct DocumentPairResult {
    lang_pair: String,
    src_url: String,
    tgt_url: String,
    sentence_pairs: Vec<(String, String)>,
    stats: PairStats,
}

/// Runs the full STRAND pipeline (C8) over a gzip TSV input: reduces each
/// webpage pair to tagchunks (C1), aligns them (C4), segments every aligned
/// Chunk-Chunk bead into sentences (C5), aligns those with Gale-Church (C6),
/// filters the result (C7), and writes `.src`/`.tgt`/`.annotation`/`.bi`
/// files per language pair next to `output_prefix`.
pub fn run(input_path: &Path, output_prefix: &Path, config: &StrandConfig) -> Result<(), PipelineError> {
    let entries = collect_entries(input_path)?;
    tracing::info!(entries = entries.len(), "loaded input entries");

    let filter = PairFilter::new(
        config.resolve_min_alpha_tokens(),
        config.resolve_require_end_punctuation(),
    );

    let worker_threads = config.resolve_worker_threads().max(1);
    let shard_size = entries.len().div_ceil(worker_threads).max(1);
    tracing::info!(worker_threads, shard_size, "sharding entries across workers");

    let shard_results: Vec<Vec<DocumentPairResult>> = std::thread::scope(|scope| {
        let handles: Vec<_> = entries
            .chunks(shard_size)
            .map(|shard| {
                let filter = &filter;
                scope.spawn(move || {
                    shard
                        .iter()
                        .flat_map(|entry| process_entry(entry, filter))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap_or_default()).collect()
    });

    let mut writers: HashMap<String, PairOutputWriter> = HashMap::new();
    let mut offsets: HashMap<String, usize> = HashMap::new();

    for shard in shard_results {
        for doc_pair in shard {
            if !writers.contains_key(&doc_pair.lang_pair) {
                writers.insert(
                    doc_pair.lang_pair.clone(),
                    PairOutputWriter::create(output_prefix, &doc_pair.lang_pair)?,
                );
            }
            let offset = offsets.entry(doc_pair.lang_pair.clone()).or_insert(0);
            let writer = writers.get_mut(&doc_pair.lang_pair).expect("writer was just inserted");
            writer.write_document_pair(
                &doc_pair.src_url,
                &doc_pair.tgt_url,
                *offset,
                &doc_pair.sentence_pairs,
                &doc_pair.stats,
            )?;
            *offset += doc_pair.sentence_pairs.len();
        }
    }

    for writer in writers.values_mut() {
        writer.flush()?;
    }

    tracing::info!(language_pairs = writers.len(), "pipeline finished");
    Ok(())
}

fn collect_entries(path: &Path) -> Result<Vec<Entry>, PipelineError> {
    let mut entries = Vec::new();
    for line in io::read_entries(path)? {
        let line = line.map_err(|source| PipelineError::InputIo {
            path: path.display().to_string(),
            source,
        })?;
        match io::parse_entry(&line) {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                tracing::warn!(%error, "skipping malformed input entry");
            }
        }
    }
    Ok(entries)
}

/// Mines every same-entry, cross-language webpage pair into one
/// [`DocumentPairResult`] each. A per-pair parse failure or grid-size
/// violation is logged and that pair is skipped; it never fails the whole
/// entry or the run. A document pair that ends up with no accepted
/// sentences contributes nothing (no empty annotation row is written).
fn process_entry(entry: &Entry, filter: &PairFilter) -> Vec<DocumentPairResult> {
    let mut results = Vec::new();

    for i in 0..entry.webpages.len() {
        for j in (i + 1)..entry.webpages.len() {
            let source_page = &entry.webpages[i];
            let target_page = &entry.webpages[j];
            if source_page.language == target_page.language {
                continue;
            }

            let src_stream = match html_reducer::reduce_html(source_page.html.as_bytes()) {
                Ok(stream) => stream,
                Err(error) => {
                    tracing::warn!(url = %source_page.url, %error, "skipping pair: reducer failed");
                    continue;
                }
            };
            let tgt_stream = match html_reducer::reduce_html(target_page.html.as_bytes()) {
                Ok(stream) => stream,
                Err(error) => {
                    tracing::warn!(url = %target_page.url, %error, "skipping pair: reducer failed");
                    continue;
                }
            };

            let (steps, stats) = strand::strand_align(&src_stream, &tgt_stream);
            if steps.is_empty() {
                tracing::warn!(
                    source = %source_page.url,
                    target = %target_page.url,
                    "skipping pair: empty or oversized alignment"
                );
                continue;
            }

            let lang_pair = format!("{}-{}", source_page.language, target_page.language);
            let src_segmenter = segment::segmenter_for_language(&source_page.language);
            let tgt_segmenter = segment::segmenter_for_language(&target_page.language);
            let mut sentence_pairs = Vec::new();

            for step in &steps {
                let (Some(src_tc), Some(tgt_tc)) = (&step.src, &step.tgt) else {
                    continue;
                };
                let (Some(src_text), Some(tgt_text)) = (src_tc.as_chunk_text(), tgt_tc.as_chunk_text())
                else {
                    continue;
                };

                let src_sentences = src_segmenter.process(src_text);
                let tgt_sentences = tgt_segmenter.process(tgt_text);
                let Some((_, aligned_src, aligned_tgt)) =
                    gale_church::align_sentences(&src_sentences, &tgt_sentences)
                else {
                    tracing::warn!(
                        source = %source_page.url,
                        target = %target_page.url,
                        src_sentences = src_sentences.len(),
                        tgt_sentences = tgt_sentences.len(),
                        "skipping bead: sentence-alignment grid-size guard tripped"
                    );
                    continue;
                };

                for (src_bead, tgt_bead) in aligned_src.iter().zip(aligned_tgt.iter()) {
                    if !filter.accepts(src_bead, tgt_bead) {
                        continue;
                    }
                    sentence_pairs.push((src_bead.clone(), tgt_bead.clone()));
                }
            }

            if !sentence_pairs.is_empty() {
                results.push(DocumentPairResult {
                    lang_pair,
                    src_url: source_page.url.clone(),
                    tgt_url: target_page.url.clone(),
                    sentence_pairs,
                    stats,
                });
            }
        }
    }

    results
}

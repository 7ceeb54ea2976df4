use crate::error::PipelineError;
use crate::tagchunk::PairStats;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One HTML document from a TSV entry: its declared language, source URL,
/// and raw (already-unescaped) HTML text.
#[derive(Debug, Clone, PartialEq)]
pub struct Webpage {
    pub language: String,
    pub url: String,
    pub html: String,
}

/// A single input line: a cluster key shared by every webpage that is a
/// candidate translation of the others, and the webpages themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub webpages: Vec<Webpage>,
}

fn unescape_tabs_and_newlines(field: &str) -> String {
    field.replace("\\t", "\t").replace("\\n", "\n")
}

fn escape_tabs_and_newlines(field: &str) -> String {
    field.replace('\t', "\\t").replace('\n', "\\n")
}

/// Parses one tab-separated input line into an [`Entry`].
///
/// Format: `key\t(language\turl\thtml)+` -- a key field followed by one or
/// more 3-field webpage groups, so `(fields.len() - 1) % 3 == 0` and at
/// least one group must be present.
pub fn parse_entry(line: &str) -> Result<Entry, PipelineError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 4 || (fields.len() - 1) % 3 != 0 {
        return Err(PipelineError::MalformedEntry(format!(
            "expected key plus a multiple of 3 fields, got {} fields",
            fields.len()
        )));
    }

    let key = unescape_tabs_and_newlines(fields[0]);
    let mut webpages = Vec::with_capacity((fields.len() - 1) / 3);
    let mut i = 1;
    while i + 2 < fields.len() {
        webpages.push(Webpage {
            language: fields[i].to_string(),
            url: unescape_tabs_and_newlines(fields[i + 1]),
            html: unescape_tabs_and_newlines(fields[i + 2]),
        });
        i += 3;
    }

    Ok(Entry { key, webpages })
}

/// Opens a gzip-compressed TSV file and returns its decompressed lines.
pub fn read_entries(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::InputIo {
        path: path.display().to_string(),
        source,
    })?;
    Ok(BufReader::new(GzDecoder::new(file)).lines())
}

/// The four output files STRAND writes per language pair: aligned source
/// sentences, aligned target sentences, a tab-separated annotation sidecar
/// (urls, starting offset, count, difference ratio -- one row per document
/// pair, not per sentence), and a combined bitext dump.
pub struct PairOutputWriter {
    src: BufWriter<File>,
    tgt: BufWriter<File>,
    annotation: BufWriter<File>,
    bi: BufWriter<File>,
}

impl PairOutputWriter {
    pub fn create(output_prefix: &Path, lang_pair: &str) -> Result<Self, PipelineError> {
        let open = |suffix: &str| -> Result<BufWriter<File>, PipelineError> {
            let mut name = output_prefix.as_os_str().to_os_string();
            name.push(format!(".{lang_pair}.{suffix}"));
            let path = PathBuf::from(name);
            File::create(&path)
                .map(BufWriter::new)
                .map_err(|source| PipelineError::OutputIo { path: path.display().to_string(), source })
        };

        Ok(PairOutputWriter {
            src: open("src")?,
            tgt: open("tgt")?,
            annotation: open("annotation")?,
            bi: open("bi")?,
        })
    }

    /// Appends one document pair's aligned sentences to all four output
    /// files: every `(source, target)` bead goes to `.src`/`.tgt`/`.bi`, and
    /// a single `.annotation` row records the urls, the offset this
    /// document pair's sentences start at within the `.src`/`.tgt` files,
    /// how many sentence pairs it contributed, and its STRAND difference
    /// ratio -- mirroring `line_counters`/`increment` in
    /// `run_strand.py`'s per-entry annotation write.
    pub fn write_document_pair(
        &mut self,
        src_url: &str,
        tgt_url: &str,
        line_offset: usize,
        sentence_pairs: &[(String, String)],
        stats: &PairStats,
    ) -> Result<(), PipelineError> {
        let io_err = |source: std::io::Error| PipelineError::OutputIo {
            path: "<pair output stream>".to_string(),
            source,
        };

        for (src_text, tgt_text) in sentence_pairs {
            writeln!(self.src, "{}", escape_tabs_and_newlines(src_text)).map_err(io_err)?;
            writeln!(self.tgt, "{}", escape_tabs_and_newlines(tgt_text)).map_err(io_err)?;
            writeln!(
                self.bi,
                "{}\t{}",
                escape_tabs_and_newlines(src_text),
                escape_tabs_and_newlines(tgt_text)
            )
            .map_err(io_err)?;
        }

        writeln!(
            self.annotation,
            "{}\t{}\t{}\t{}\t{:.6}",
            src_url,
            tgt_url,
            line_offset,
            sentence_pairs.len(),
            stats.difference_ratio
        )
        .map_err(io_err)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), PipelineError> {
        let io_err = |source: std::io::Error| PipelineError::OutputIo {
            path: "<pair output stream>".to_string(),
            source,
        };
        self.src.flush().map_err(io_err)?;
        self.tgt.flush().map_err(io_err)?;
        self.annotation.flush().map_err(io_err)?;
        self.bi.flush().map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_webpage_entry() {
        let entry = parse_entry("key1\ten\thttp://example.com/en\t<p>hi</p>").unwrap();
        assert_eq!(entry.key, "key1");
        assert_eq!(entry.webpages.len(), 1);
        assert_eq!(entry.webpages[0].language, "en");
        assert_eq!(entry.webpages[0].url, "http://example.com/en");
        assert_eq!(entry.webpages[0].html, "<p>hi</p>");
    }

    #[test]
    fn parses_multiple_webpage_entry() {
        let line = "key1\ten\thttp://e.com/en\t<p>hi</p>\tfr\thttp://e.com/fr\t<p>salut</p>";
        let entry = parse_entry(line).unwrap();
        assert_eq!(entry.webpages.len(), 2);
        assert_eq!(entry.webpages[1].language, "fr");
    }

    #[test]
    fn unescapes_tabs_and_newlines_in_fields() {
        let entry = parse_entry("key1\ten\thttp://e.com\t<p>line one\\nline two\\tindented</p>").unwrap();
        assert_eq!(entry.webpages[0].html, "<p>line one\nline two\tindented</p>");
    }

    #[test]
    fn rejects_non_multiple_of_three_field_count() {
        let err = parse_entry("key1\ten\thttp://e.com").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEntry(_)));
    }

    #[test]
    fn rejects_entry_with_no_webpages() {
        let err = parse_entry("key1").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEntry(_)));
    }
}

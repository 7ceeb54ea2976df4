use std::path::Path;

// ---------------------------------------------------------------------------
// StrandConfig — file-based config loader (strand-align.json) with env-var
// fallback, mirroring the teacher's ShadowConfig resolve_* idiom.
// ---------------------------------------------------------------------------

/// Grid-size guard shared by the tagchunk aligner (C3) and the sentence
/// aligner (C6): `|S|*|T| > GRID_SIZE_LIMIT` refuses the alignment.
pub const GRID_SIZE_LIMIT: u64 = 1_000_000_000;

/// Gale-Church length-ratio / variance constants (§4.5).
pub const CHAR_RATIO_C: f64 = 1.0;
pub const LENGTH_VARIANCE_S2: f64 = 6.8;

#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct StrandConfig {
    /// Number of worker threads the driver shards document pairs across.
    pub worker_threads: Option<usize>,
    /// Minimum alpha-token count required on both sides of a sentence pair
    /// for the pair filter (C7) to accept it. Defaults to 5.
    pub min_alpha_tokens: Option<usize>,
    /// Whether the pair filter requires both sides to end in `. ? !`.
    pub require_end_punctuation: Option<bool>,
}

impl StrandConfig {
    /// Loads `strand-align.json` from the current directory if present,
    /// falling back to an all-default config otherwise. Malformed JSON is
    /// treated the same as a missing file: config loading never fails the
    /// driver, it only narrows what gets tuned away from the defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new("strand-align.json"))
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Worker thread count: JSON field -> `STRAND_WORKER_THREADS` env var ->
    /// available parallelism.
    pub fn resolve_worker_threads(&self) -> usize {
        if let Some(n) = self.worker_threads {
            return n.max(1);
        }
        std::env::var("STRAND_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }

    /// Minimum alpha-token count: JSON field -> `STRAND_MIN_ALPHA_TOKENS`
    /// env var -> 5.
    pub fn resolve_min_alpha_tokens(&self) -> usize {
        if let Some(n) = self.min_alpha_tokens {
            return n;
        }
        std::env::var("STRAND_MIN_ALPHA_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5)
    }

    /// End-punctuation requirement: JSON field -> `STRAND_REQUIRE_END_PUNCT`
    /// env var -> `true`.
    pub fn resolve_require_end_punctuation(&self) -> bool {
        if let Some(b) = self.require_end_punctuation {
            return b;
        }
        std::env::var("STRAND_REQUIRE_END_PUNCT")
            .ok()
            .map(|v| v != "0" && v.to_ascii_lowercase() != "false")
            .unwrap_or(true)
    }
}

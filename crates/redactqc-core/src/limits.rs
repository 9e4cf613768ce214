//! Named defaults pulled directly out of the spec so `redactqc-extract`,
//! `redactqc-detect`, and `redactqc-batch` all reference the same numbers
//! instead of re-declaring magic constants at each seam.

/// §4.2: native text layer is trusted once it has at least this many
/// stripped-whitespace characters; shorter pages fall back to OCR.
pub const NATIVE_MIN: usize = 50;

/// §4.2: DPI used to rasterise a page before handing it to the OCR engine.
pub const OCR_DPI: u32 = 300;

/// §5: soft per-page OCR budget. Exceeding it fails the page (empty text),
/// not the document.
pub const OCR_PAGE_TIMEOUT_SECS: u64 = 60;

/// §3: default truncation length for a finding's stored context snippet.
pub const CONTEXT_MAX: usize = 80;

/// §3: absolute upper bound on a stored context snippet, regardless of
/// `CONTEXT_MAX`.
pub const SNIPPET_HARD_CAP: usize = 256;

/// §4.3: token window used by both the context-boost/penalty scoring and
/// the `LEGAL_ROLE_NAME` promotion rule.
pub const CONTEXT_WINDOW: usize = 6;

/// §4.3: multiplier applied when a context word boosts a finding's score.
pub const CTX_BOOST: f64 = 0.35;

/// §4.3: multiplier applied when a negating word depresses a finding's
/// score.
pub const CTX_PENALTY: f64 = 0.5;

/// §4.3 / §6: default confidence floor below which a finding is dropped,
/// used when a scan request doesn't supply its own.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;

/// §4.5: job chunk size submitted to the worker pool at a time.
pub const CHUNK_SIZE: usize = 100;

/// §6: default/maximum page sizes for paginated list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 500;

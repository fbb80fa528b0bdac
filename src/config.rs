use serde::Deserialize;

/// Tuning knobs for a single write pass.
///
/// The dictionary budget is deliberately configuration, not a constant:
/// callers that want to force the plain-encoding path (e.g. adversarial
/// tests) shrink `dict_max_entries` instead of patching the writer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Distinct values a column dictionary may hold before the column
    /// falls back to plain encoding.
    pub dict_max_entries: usize,
    /// Total encoded bytes a column dictionary may hold before fallback.
    pub dict_max_bytes: usize,
    /// Level entries buffered per column before a page is cut.
    pub page_row_limit: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            dict_max_entries: 1024,
            dict_max_bytes: 1 << 20,
            page_row_limit: 256,
        }
    }
}

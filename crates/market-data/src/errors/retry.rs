/// Classification for retry policy.
///
/// The engine itself never retries; this classification tells the caller
/// whether retrying the whole run could possibly succeed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, unsupported instrument, or no data exists.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry with backoff - the provider rate limited or timed out.
    /// A later attempt with the same parameters may succeed.
    WithBackoff,

    /// Another backend might succeed where this one failed.
    NextProvider,
}

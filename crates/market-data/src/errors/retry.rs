/// Classification for fallback policy.
///
/// Used by the resolver to decide whether an error from one provider
/// should hand the request to the next provider in the chain.
///
/// # Behavior Summary
///
/// | Class | Try Next Provider? |
/// |-------|-------------------|
/// | `Never` | No, the error is returned as-is |
/// | `NextProvider` | Yes |
///
/// There is no backoff class: a provider is asked at most once per
/// resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never fall through - bad input, configuration problem, or the
    /// caller gave up (cancellation / deadline).
    Never,

    /// This provider failed, but another one might succeed.
    NextProvider,
}

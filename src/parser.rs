//! The capability interface a log-type registry drives.

/// Trait for parsers that turn one raw log line into at most one event.
///
/// A registry picks the implementation by [`log_type`](LogParser::log_type)
/// and feeds it lines one at a time. Implementations hold no mutable state,
/// so one instance can serve any number of threads.
pub trait LogParser {
    /// The record type this parser produces.
    type Event;

    /// Parse one line.
    ///
    /// Returns `None` for any line that is not a valid record. Why a line was
    /// rejected is only reported through debug diagnostics.
    fn parse(&self, line: &str) -> Option<Self::Event>;

    /// Stable identifier of the log type, used for routing.
    fn log_type(&self) -> &'static str;

    /// Human-readable description of the log type.
    fn description(&self) -> &'static str;
}

/*! A simple discrete time model.

All scheduling quantities in this crate (periods, deadlines, execution
times, response times) are expressed as unsigned integers in an
arbitrary, caller-chosen time unit. Only utilization and averaged
response times are represented as floating-point values.
*/

/// The base type of all time values.
pub type Time = u64;

/// Syntactic sugar to give a hint that a time value indicates a
/// point in time (e.g., a release or a completion).
pub type Instant = Time;

/// Syntactic sugar to give a hint that a time value denotes an
/// interval length (e.g., a period or a relative deadline).
pub type Duration = Time;

/// Syntactic sugar to give a hint that a time value represents some
/// amount of processor service (e.g., an execution-time demand).
pub type Service = Time;

//! Integration tests for the price poll.
//!
//! Drive the public API end to end: JSON record → scoring → standings →
//! report, with no files outside the temp directory.

mod contest_flow;

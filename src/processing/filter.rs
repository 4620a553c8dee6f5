//! Stream filtering.
//!
//! Reads one entry per line, drops private entries, expands small public
//! blocks and writes the result line by line.

use super::classify::{is_private, is_private_subset};
use super::entry::{parse_entry, Entry};
use super::expand::{expand, Expansion};
use crate::config::Options;
use crate::error::{FilterError, Result};
use crate::models::format_addr;
use crate::output::EntryWriter;
use serde::Serialize;
use std::io::{self, BufRead, BufReader, Read, Write};

/// Counters describing one filter run.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Lines read from the input, blank ones included.
    pub lines_read: usize,
    pub blank_lines: usize,
    /// Private addresses and private blocks dropped.
    pub private_dropped: usize,
    /// Lines written to the output.
    pub addresses_written: usize,
    pub blocks_expanded: usize,
    /// Blocks over the limit, written in CIDR notation.
    pub blocks_unexpanded: usize,
}

/// Turns single entries into output lines.
#[derive(Debug, Clone, Copy)]
pub struct Processor {
    max_expand: usize,
}

impl Processor {
    pub fn new(max_expand: usize) -> Self {
        Processor { max_expand }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(options.expansion_limit())
    }

    /// Output lines for one trimmed, non-empty entry.
    pub fn process(&self, entry: &str) -> Result<Vec<String>> {
        let mut stats = FilterStats::default();
        let mut lines = Vec::new();
        self.process_into(entry, &mut stats, |line| {
            lines.push(line);
            Ok(())
        })?;
        Ok(lines)
    }

    /// Hand each output line for `entry` to `emit` as it is produced.
    ///
    /// Expanded blocks are never collected.
    fn process_into<F>(&self, entry: &str, stats: &mut FilterStats, mut emit: F) -> Result<()>
    where
        F: FnMut(String) -> io::Result<()>,
    {
        match parse_entry(entry)? {
            Entry::Address(addr) => {
                if is_private(addr) {
                    log::debug!("drop private address {entry}");
                    stats.private_dropped += 1;
                    return Ok(());
                }
                emit(format_addr(addr))?;
            }
            Entry::Block(block) => {
                if is_private_subset(&block) {
                    log::debug!("drop private block {entry}");
                    stats.private_dropped += 1;
                    return Ok(());
                }
                match expand(&block, self.max_expand)? {
                    Expansion::Addresses(range) => {
                        stats.blocks_expanded += 1;
                        for addr in range {
                            emit(format_addr(addr))?;
                        }
                    }
                    Expansion::Unexpanded(block) => {
                        stats.blocks_unexpanded += 1;
                        emit(block.to_string())?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

/// Filter `input` into `output`.
///
/// Stops at the first line that fails to parse; the error carries the line
/// number. The output is flushed before success is reported. On error,
/// output still sitting in the buffer is discarded.
pub fn filter<R: Read, W: Write>(input: R, output: W, options: &Options) -> Result<FilterStats> {
    let processor = Processor::from_options(options);
    let mut writer = EntryWriter::new(output);
    let mut stats = FilterStats::default();

    log::info!(
        "#Start filter() max_cidr_addresses={}",
        options.expansion_limit()
    );

    match filter_lines(&processor, BufReader::new(input), &mut writer, &mut stats) {
        Ok(()) => {
            stats.addresses_written = writer.written();
            writer.finish()?;
            log::info!("#End filter() {stats:?}");
            Ok(stats)
        }
        Err(e) => {
            log::error!("filter() stopped after {} lines: {e}", stats.lines_read);
            writer.abandon();
            Err(e)
        }
    }
}

fn filter_lines<R: BufRead, W: Write>(
    processor: &Processor,
    reader: R,
    writer: &mut EntryWriter<W>,
    stats: &mut FilterStats,
) -> Result<()> {
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| FilterError::from(e).at_line(line_no))?;
        stats.lines_read += 1;

        let line = line.trim();
        if line.is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        processor
            .process_into(line, stats, |entry| writer.write_entry(entry))
            .map_err(|e| e.at_line(line_no))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn run(input: &str, options: &Options) -> Result<(String, FilterStats)> {
        let mut out = Vec::new();
        let stats = filter(input.as_bytes(), &mut out, options)?;
        Ok((String::from_utf8(out).unwrap(), stats))
    }

    #[test]
    fn test_process_ips() {
        let processor = Processor::default();
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("203.0.113.10", vec!["203.0.113.10"]),
            ("192.168.0.10", vec![]),
            ("0.0.0.0", vec![]),
            ("0.0.0.5", vec![]),
            ("2001:db8::1", vec!["2001:db8::1"]),
            ("fc00::1", vec![]),
            ("203.0.113.10:443", vec!["203.0.113.10"]),
            ("203.0.113.10:8443", vec!["203.0.113.10"]),
            ("192.168.0.10:443", vec![]),
            ("[2001:db8::1]:443", vec!["2001:db8::1"]),
            ("[2001:db8::1]", vec!["2001:db8::1"]),
            ("::ffff:10.0.0.1", vec![]),
            ("::ffff:203.0.113.10", vec!["203.0.113.10"]),
        ];
        for (input, want) in cases {
            assert_eq!(processor.process(input).unwrap(), want, "input {input}");
        }
        assert!(processor.process("not-an-ip").is_err());
    }

    #[test]
    fn test_process_cidrs() {
        let processor = Processor::default();
        assert!(processor.process("10.0.0.0/24").unwrap().is_empty());
        assert_eq!(
            processor.process("203.0.113.0/30").unwrap(),
            vec!["203.0.113.0", "203.0.113.1", "203.0.113.2", "203.0.113.3"]
        );
        assert_eq!(
            processor.process("2001:db8::/126").unwrap(),
            vec!["2001:db8::", "2001:db8::1", "2001:db8::2", "2001:db8::3"]
        );
        assert_eq!(processor.process("203.0.113.0/24").unwrap(), vec!["203.0.113.0/24"]);
        // overlaps 10.0.0.0/8 without being inside it
        assert_eq!(processor.process("8.0.0.0/6").unwrap(), vec!["8.0.0.0/6"]);
    }

    #[test]
    fn test_process_mapped_cidrs() {
        let processor = Processor::default();
        assert!(processor.process("::ffff:10.0.0.0/126").unwrap().is_empty());
        assert_eq!(
            processor.process("::ffff:203.0.113.0/126").unwrap(),
            vec!["203.0.113.0", "203.0.113.1", "203.0.113.2", "203.0.113.3"]
        );
        assert_eq!(
            processor.process("::ffff:203.0.113.0/120").unwrap(),
            vec!["203.0.113.0/24"]
        );
    }

    #[test]
    fn test_filter_stream() {
        let input = ["203.0.113.1", "192.168.1.10", "203.0.113.0/30", ""].join("\n");
        let (out, stats) = run(&input, &Options::default()).unwrap();
        assert_eq!(
            out,
            "203.0.113.1\n203.0.113.0\n203.0.113.1\n203.0.113.2\n203.0.113.3\n"
        );
        assert_eq!(stats.lines_read, 3);
        assert_eq!(stats.private_dropped, 1);
        assert_eq!(stats.blocks_expanded, 1);
        assert_eq!(stats.addresses_written, 5);
    }

    #[test]
    fn test_filter_trims_and_skips_blank() {
        let input = "\n   \n\t203.0.113.7  \r\n\n";
        let (out, stats) = run(input, &Options::default()).unwrap();
        assert_eq!(out, "203.0.113.7\n");
        assert_eq!(stats.blank_lines, 3);
    }

    #[test]
    fn test_filter_limit_option() {
        let (out, stats) = run("203.0.113.0/29\n", &Options::new(4)).unwrap();
        assert_eq!(out, "203.0.113.0/29\n");
        assert_eq!(stats.blocks_unexpanded, 1);

        let (out, _) = run("203.0.113.0/29\n", &Options::new(0)).unwrap();
        assert_eq!(out.lines().count(), 8);
    }

    #[test]
    fn test_filter_stops_at_bad_line() {
        let input = "203.0.113.1\nnot-an-ip\n203.0.113.2\n";
        let mut out = Vec::new();
        let err = filter(input.as_bytes(), &mut out, &Options::default()).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.category(), ErrorCategory::Parse);
        assert!(err.to_string().contains("not-an-ip"));
        assert!(out.is_empty(), "buffered output must not reach the sink");
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }
    }

    #[test]
    fn test_filter_drops_mapped_private_block() {
        let input = "::ffff:10.0.0.0/126\n::ffff:203.0.113.4/127\n";
        let (out, stats) = run(input, &Options::default()).unwrap();
        assert_eq!(out, "203.0.113.4\n203.0.113.5\n");
        assert_eq!(stats.private_dropped, 1);
        assert_eq!(stats.blocks_expanded, 1);
    }

    /// Accepts `capacity` writes, then fails.
    struct ShortSink {
        capacity: usize,
        writes: usize,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.writes == self.capacity {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            self.writes += 1;
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_filter_streams_large_expansion() {
        // 2^16 lines overflow the writer's buffer, so the sink sees writes
        // while the block is still being expanded.
        let mut sink = ShortSink {
            capacity: 1,
            writes: 0,
        };
        let err = filter(
            "198.51.0.0/16\n".as_bytes(),
            &mut sink,
            &Options::new(1 << 16),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.line(), Some(1));
        assert_eq!(sink.writes, 1);
    }

    #[test]
    fn test_filter_reports_write_failure() {
        let err = filter("203.0.113.1\n".as_bytes(), BrokenSink, &Options::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_filter_reports_invalid_utf8() {
        let input: &[u8] = b"203.0.113.1\n\xff\xfe\n";
        let err = filter(input, Vec::new(), &Options::default()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_stats_serialize() {
        let (_, stats) = run("203.0.113.1\n10.0.0.1\n", &Options::default()).unwrap();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"private_dropped\":1"));
        assert!(json.contains("\"addresses_written\":1"));
    }
}

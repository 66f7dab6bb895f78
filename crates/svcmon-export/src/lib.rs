//! Statsd line-protocol rendering of a metric snapshot.
//!
//! The output format is a boundary contract, byte-exact: one
//! newline-terminated line per metric, ordered by metric path,
//!
//! ```text
//! <host>.<path>:<value>|<type>
//! ```
//!
//! where `<type>` is `c` for counters and `g` for gauges, values fixed
//! to two decimals, and an unavailable gauge conventionally rendered as
//! `-1.00`. Transport is the caller's concern; this crate only formats.

use std::io::{self, Write};
use svcmon_common::types::{MetricSnapshot, MetricValue};

/// Writes one export cycle for `snapshot`, prefixing every path with
/// `host`.
pub fn export<W: Write>(w: &mut W, host: &str, snapshot: &MetricSnapshot) -> io::Result<()> {
    for (path, value) in snapshot.iter() {
        let v = match value {
            MetricValue::Counter(v) => v,
            MetricValue::Gauge(v) => v.unwrap_or(-1.0),
        };
        writeln!(w, "{host}.{path}:{v:.2}|{}", value.type_tag())?;
    }
    Ok(())
}

/// Renders one export cycle to a string.
pub fn render(host: &str, snapshot: &MetricSnapshot) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    export(&mut buf, host, snapshot).expect("in-memory write");
    String::from_utf8(buf).expect("export output is ascii")
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcmon_common::types::MetricSnapshot;

    #[test]
    fn export_is_byte_exact_and_path_ordered() {
        let mut snap = MetricSnapshot::new();
        snap.gauge("host.swap", Some(0.0));
        snap.counter("host.cpu", 0.0);
        snap.counter("host.cpu.user", 0.0);
        snap.gauge("host.load.1", None);
        snap.gauge("host.disk./", None);
        snap.counter("homebrew.mxcl.memcached.cpu.user", 0.0);
        snap.gauge("homebrew.mxcl.memcached.memory.rss", None);

        let expected = "\
MikeMBP.local.homebrew.mxcl.memcached.cpu.user:0.00|c
MikeMBP.local.homebrew.mxcl.memcached.memory.rss:-1.00|g
MikeMBP.local.host.cpu:0.00|c
MikeMBP.local.host.cpu.user:0.00|c
MikeMBP.local.host.disk./:-1.00|g
MikeMBP.local.host.load.1:-1.00|g
MikeMBP.local.host.swap:0.00|g
";
        assert_eq!(render("MikeMBP.local", &snap), expected);
    }

    #[test]
    fn values_are_fixed_two_decimal() {
        let mut snap = MetricSnapshot::new();
        snap.gauge("host.load.1", Some(1.2345));
        snap.counter("host.cpu", 99.9);
        assert_eq!(
            render("box", &snap),
            "box.host.cpu:99.90|c\nbox.host.load.1:1.23|g\n"
        );
    }

    #[test]
    fn empty_snapshot_exports_nothing() {
        assert_eq!(render("box", &MetricSnapshot::new()), "");
    }
}

use crate::types::{MetricSnapshot, MetricSource, MetricValue};

#[test]
fn snapshot_iterates_in_path_order() {
    let mut snap = MetricSnapshot::new();
    snap.gauge("host.swap", Some(12.0));
    snap.counter("host.cpu", 0.5);
    snap.gauge("host.load.1", None);

    let paths: Vec<&str> = snap.iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["host.cpu", "host.load.1", "host.swap"]);
}

#[test]
fn current_value_distinguishes_absent_from_unavailable() {
    let mut snap = MetricSnapshot::new();
    snap.gauge("host.load.1", None);
    snap.counter("host.cpu", 3.25);

    // Unavailable gauge and absent metric both read as None.
    assert_eq!(snap.current_value("host.load.1"), None);
    assert_eq!(snap.current_value("host.load.5"), None);
    assert_eq!(snap.current_value("host.cpu"), Some(3.25));
}

#[test]
fn type_tags() {
    assert_eq!(MetricValue::Counter(0.0).type_tag(), 'c');
    assert_eq!(MetricValue::Gauge(None).type_tag(), 'g');
}

#[test]
fn set_overwrites_existing_path() {
    let mut snap = MetricSnapshot::new();
    snap.counter("x", 1.0);
    snap.counter("x", 2.0);
    assert_eq!(snap.len(), 1);
    assert_eq!(snap.current_value("x"), Some(2.0));
}

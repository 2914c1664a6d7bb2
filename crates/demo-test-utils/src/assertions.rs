//! Custom test assertions for expressive tests
//!
//! Provides helpers for reading samples out of Prometheus text exposition.

/// Value of the first sample named `name` carrying every `(key, value)` label.
///
/// Comment lines (`# HELP`, `# TYPE`) are skipped. Label order does not matter.
///
/// # Example
/// ```
/// use demo_test_utils::metric_sample;
///
/// let body = "# TYPE hits counter\nhits{route=\"/a\",method=\"GET\"} 3\n";
/// assert_eq!(metric_sample(body, "hits", &[("method", "GET")]), Some(3.0));
/// assert_eq!(metric_sample(body, "hits", &[("method", "POST")]), None);
/// ```
pub fn metric_sample(body: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.rsplit_once(' '))
        .find(|(series, _)| {
            let series_name = series.split('{').next().unwrap_or_default();
            series_name == name
                && labels
                    .iter()
                    .all(|(k, v)| series.contains(&format!("{k}=\"{v}\"")))
        })
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Custom assertions for rendered metrics
///
/// # Example
/// ```rust,ignore
/// body
///     .assert_sample("http_requests_in_flight", &[], 1.0)
///     .assert_no_label_value("/api/users/42");
/// ```
pub trait ExpositionAssertions {
    /// Assert that a sample exists with exactly the given value
    fn assert_sample(&self, name: &str, labels: &[(&str, &str)], expected: f64) -> &Self;

    /// Assert that no sample line carries the given label value
    fn assert_no_label_value(&self, value: &str) -> &Self;
}

impl ExpositionAssertions for str {
    fn assert_sample(&self, name: &str, labels: &[(&str, &str)], expected: f64) -> &Self {
        let actual = metric_sample(self, name, labels);
        assert_eq!(
            actual,
            Some(expected),
            "sample {name} {labels:?} mismatch in exposition:\n{self}"
        );
        self
    }

    fn assert_no_label_value(&self, value: &str) -> &Self {
        let needle = format!("=\"{value}\"");
        let offending: Vec<&str> = self
            .lines()
            .filter(|line| !line.starts_with('#') && line.contains(&needle))
            .collect();
        assert!(
            offending.is_empty(),
            "label value {value:?} should not appear, found in: {offending:?}"
        );
        self
    }
}

impl ExpositionAssertions for String {
    fn assert_sample(&self, name: &str, labels: &[(&str, &str)], expected: f64) -> &Self {
        self.as_str().assert_sample(name, labels, expected);
        self
    }

    fn assert_no_label_value(&self, value: &str) -> &Self {
        self.as_str().assert_no_label_value(value);
        self
    }
}

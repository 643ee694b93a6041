//! ErrorCollector - path-level problems found during one drain

/// Append-only list of failing routes
///
/// No deduplication: a route visited twice is reported twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorCollector {
    errors: Vec<String>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, route: impl Into<String>) {
        self.errors.push(route.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Snapshot of the collected routes, in report order
    pub fn errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

use std::collections::HashSet;

/// Names seen so far in the single parsing pass.
#[derive(Debug, Default)]
pub(super) struct Symbols {
    variables: HashSet<String>,
    labels: HashSet<String>,
    // (label, position of the GOTO target) in reference order
    gotos: Vec<(String, usize)>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a variable is declared.
    pub fn declare_var(&mut self, name: &str) -> bool {
        self.variables.insert(name.to_string())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    /// Returns `false` if the label already exists.
    pub fn declare_label(&mut self, name: &str) -> bool {
        self.labels.insert(name.to_string())
    }

    pub fn reference_label(&mut self, name: &str, position: usize) {
        self.gotos.push((name.to_string(), position));
    }

    /// The first GOTO whose label was never declared.
    pub fn first_unresolved_label(&self) -> Option<(&str, usize)> {
        self.gotos
            .iter()
            .find(|(name, _)| !self.labels.contains(name))
            .map(|(name, position)| (name.as_str(), *position))
    }

    pub fn var_count(&self) -> usize {
        self.variables.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

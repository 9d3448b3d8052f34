//! Conversion options for classifier metadata.

/// Requests attached to a [`compile`](crate::convert::compile) call.
///
/// A plain converted model needs no options. Attaching class labels turns
/// the model into a classifier: the terminal output becomes a label
/// keyed probability dictionary and a predicted-label feature is added.
///
/// # Example
///
/// ```
/// use congelar::convert::ConvertOptions;
///
/// let options = ConvertOptions::new()
///     .with_class_labels(["a", "b", "c"])
///     .with_predicted_feature("pf");
/// assert!(options.is_classifier());
/// assert_eq!(options.predicted_feature(), Some("pf"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    class_labels: Option<Vec<String>>,
    predicted_feature: Option<String>,
    probabilities_output: Option<String>,
}

impl ConvertOptions {
    /// Options for a plain, non-classifier conversion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the model as a classifier over these labels.
    ///
    /// Labels map to terminal-layer columns in order, so the label count
    /// must equal the terminal layer width at compile time.
    #[must_use]
    pub fn with_class_labels<S: Into<String>>(
        mut self,
        labels: impl IntoIterator<Item = S>,
    ) -> Self {
        self.class_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Name the predicted-label output feature.
    ///
    /// Defaults to `"classLabel"` when labels are given and this is not.
    #[must_use]
    pub fn with_predicted_feature(mut self, name: &str) -> Self {
        self.predicted_feature = Some(name.to_string());
        self
    }

    /// Name the output that carries the probability dictionary.
    ///
    /// Must match one of the declared output names. When omitted the
    /// terminal output carries the dictionary.
    #[must_use]
    pub fn with_probabilities_output(mut self, name: &str) -> Self {
        self.probabilities_output = Some(name.to_string());
        self
    }

    /// Class labels, if this is a classifier conversion.
    #[must_use]
    pub fn class_labels(&self) -> Option<&[String]> {
        self.class_labels.as_deref()
    }

    /// Explicit predicted-label feature name, if any.
    #[must_use]
    pub fn predicted_feature(&self) -> Option<&str> {
        self.predicted_feature.as_deref()
    }

    /// Explicit probabilities output name, if any.
    #[must_use]
    pub fn probabilities_output(&self) -> Option<&str> {
        self.probabilities_output.as_deref()
    }

    /// Whether class labels were attached.
    #[must_use]
    pub fn is_classifier(&self) -> bool {
        self.class_labels.is_some()
    }
}

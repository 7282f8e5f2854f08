/// Directory name used by Hive-style writers for a null partition value.
pub const DEFAULT_HIVE_NULL_FALLBACK: &str = "__HIVE_DEFAULT_PARTITION__";

/// Options for dataset discovery and partition parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetOptions {
    ignore_prefixes: Vec<String>,
    hive_null_fallback: String,
}

impl DatasetOptions {
    /// Create a new builder for DatasetOptions
    ///
    /// # Example
    /// ```
    /// use trellis::DatasetOptions;
    ///
    /// let options = DatasetOptions::builder()
    ///     .ignore_prefixes(["."])
    ///     .hive_null_fallback("null")
    ///     .build();
    /// assert!(options.is_ignored(".hidden"));
    /// assert!(!options.is_ignored("_SUCCESS"));
    /// ```
    pub fn builder() -> DatasetOptionsBuilder {
        DatasetOptionsBuilder::default()
    }

    /// Name prefixes of files and directories skipped while walking a dataset
    pub fn ignore_prefixes(&self) -> &[String] {
        &self.ignore_prefixes
    }

    /// Directory value that stands for a null partition value
    pub fn hive_null_fallback(&self) -> &str {
        &self.hive_null_fallback
    }

    /// Whether a file or directory called `name` should be skipped
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            ignore_prefixes: vec![".".to_string(), "_".to_string()],
            hive_null_fallback: DEFAULT_HIVE_NULL_FALLBACK.to_string(),
        }
    }
}

/// Builder for DatasetOptions
#[derive(Clone, Debug, Default)]
pub struct DatasetOptionsBuilder {
    ignore_prefixes: Option<Vec<String>>,
    hive_null_fallback: Option<String>,
}

impl DatasetOptionsBuilder {
    /// Replace the ignored name prefixes (default: `.` and `_`)
    ///
    /// Hidden files and writer bookkeeping files such as `_SUCCESS` or
    /// `_delta_log` are skipped with the defaults.
    pub fn ignore_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the null partition directory value (default: `__HIVE_DEFAULT_PARTITION__`)
    pub fn hive_null_fallback(mut self, value: impl Into<String>) -> Self {
        self.hive_null_fallback = Some(value.into());
        self
    }

    /// Build the DatasetOptions
    pub fn build(self) -> DatasetOptions {
        let defaults = DatasetOptions::default();
        DatasetOptions {
            ignore_prefixes: self.ignore_prefixes.unwrap_or(defaults.ignore_prefixes),
            hive_null_fallback: self
                .hive_null_fallback
                .unwrap_or(defaults.hive_null_fallback),
        }
    }
}

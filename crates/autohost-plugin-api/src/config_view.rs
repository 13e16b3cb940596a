use std::collections::BTreeMap;

/// Read-only key/value view over a configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigView {
    values: BTreeMap<String, String>,
}

impl ConfigView {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of this view, `other` wins on conflicts
    pub fn merged_with(&self, other: &ConfigView) -> ConfigView {
        let mut values = self.values.clone();
        values.extend(other.values.clone());
        ConfigView { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigView {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

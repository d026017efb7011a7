//! Declaration annotations: `(key = "value", ...)` in the IDL.

use smol_str::SmolStr;

/// One annotation key with all values given for it, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub key: SmolStr,
    pub values: Vec<SmolStr>,
}

/// Ordered annotation list of a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(transparent))]
pub struct Annotations(pub Vec<Annotation>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `key`, appending to an existing entry.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|a| a.key == key) {
            Some(existing) => existing.values.push(value.into()),
            None => self.0.push(Annotation {
                key: key.into(),
                values: vec![value.into()],
            }),
        }
    }

    /// All values recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&[SmolStr]> {
        self.0
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_accumulate_per_key() {
        let annos = Annotations::new()
            .with("thrift.expand", "true")
            .with("go.tag", "x")
            .with("thrift.expand", "false");

        assert_eq!(annos.iter().count(), 2);
        let values = annos.get("thrift.expand").unwrap();
        assert_eq!(values, &["true", "false"]);
        assert!(annos.get("missing").is_none());
    }
}

/// Product option entity id → selected value, in product option order.
///
/// Cart serialization walks entries in insertion order, so the order in which
/// options are declared on the product is the order they appear in the cart
/// URL. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMapping {
    entries: Vec<(String, String)>,
}

impl AttributeMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, value: impl Into<String>) {
        let entity_id = entity_id.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(id, _)| *id == entity_id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((entity_id, value)),
        }
    }

    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == entity_id)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, entity_id: &str) -> bool {
        self.get(entity_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, value)| (id.as_str(), value.as_str()))
    }

    /// Entries whose value is non-empty; these are the ones sent to the cart.
    pub fn filled(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, value)| !value.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (id, value) in iter {
            mapping.insert(id, value);
        }
        mapping
    }
}

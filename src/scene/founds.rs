use indexmap::IndexSet;

/// Marker names located in one frame, in the order they were tested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Founds(IndexSet<String>);

impl Founds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, marker: impl Into<String>) -> bool {
        self.0.insert(marker.into())
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Founds {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

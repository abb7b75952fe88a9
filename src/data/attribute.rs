//! Attribute and schema definitions

/// Kind of an attribute
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    /// Continuous numeric attribute
    Numeric,
    /// Categorical attribute with a fixed, ordered label set
    Nominal(Vec<String>),
}

impl AttributeKind {
    /// Whether this is a nominal (categorical) attribute
    pub fn is_nominal(&self) -> bool {
        matches!(self, AttributeKind::Nominal(_))
    }

    /// Labels of a nominal attribute, empty for numeric
    pub fn labels(&self) -> &[String] {
        match self {
            AttributeKind::Nominal(labels) => labels,
            AttributeKind::Numeric => &[],
        }
    }
}

/// A named, typed attribute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
}

impl Attribute {
    /// Create a numeric attribute
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Create a nominal attribute with the given label set
    pub fn nominal(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(labels),
        }
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute kind
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }
}

/// Fixed schema shared by all records of a dataset
///
/// Holds the attribute list plus the optional designated target attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<Attribute>,
    target: Option<usize>,
}

impl Schema {
    /// Create a schema without a target attribute
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            target: None,
        }
    }

    /// Designate the target attribute by index
    pub fn with_target(mut self, index: usize) -> Self {
        self.target = Some(index);
        self
    }

    /// Number of attributes
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Attribute at the given index
    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Look up an attribute index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    /// Index of the target attribute, if designated
    pub fn target_index(&self) -> Option<usize> {
        self.target
    }

    /// The target attribute, if designated
    pub fn target_attribute(&self) -> Option<&Attribute> {
        self.target.and_then(|i| self.attributes.get(i))
    }

    /// Whether two schemas agree on attribute count and target definition
    ///
    /// Used by job pre-checks: train and test sets must describe the same
    /// data before a model trained on one can be scored on the other.
    pub fn compatible_with(&self, other: &Schema) -> bool {
        self.num_attributes() == other.num_attributes()
            && self.target == other.target
            && match (self.target_attribute(), other.target_attribute()) {
                (Some(a), Some(b)) => a.kind() == b.kind(),
                (None, None) => true,
                _ => false,
            }
    }
}

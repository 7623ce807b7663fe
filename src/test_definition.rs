//! Tests a launch runs, as far as listeners care about them.

/// A test (or batch of tests) attached to a launch.
pub trait TestDefinition {
    /// The naming capability, when this definition has a single name.
    fn as_named(&self) -> Option<&dyn NamedTest> {
        None
    }
}

/// A test that can be referred to by one human-readable name.
pub trait NamedTest {
    fn name(&self) -> &str;
}

/// A single test class, optionally narrowed to some of its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleTestClass {
    name: String,
    methods: Vec<String>,
}

impl SingleTestClass {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Restrict the run to the given methods.
    #[must_use]
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

impl NamedTest for SingleTestClass {
    fn name(&self) -> &str {
        &self.name
    }
}

impl TestDefinition for SingleTestClass {
    fn as_named(&self) -> Option<&dyn NamedTest> {
        Some(self)
    }
}

/// A batch of test classes. It has no single name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestClasses {
    classes: Vec<String>,
}

impl TestClasses {
    #[must_use]
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl TestDefinition for TestClasses {}

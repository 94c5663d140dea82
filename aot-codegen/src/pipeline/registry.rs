//! Generator registry.

use aotgen_core::{ConfigOption, Configuration};
use eyre::Result;
use indexmap::IndexMap;

use super::{Generator, PipelineError};
use crate::generators::{
    EagerComponentsGenerator, InlineResourcesGenerator, KnownMissingTypesGenerator,
};

type Factory = Box<dyn Fn() -> Box<dyn Generator> + Send + Sync>;

struct Entry {
    description: Option<String>,
    options: Vec<ConfigOption>,
    factory: Factory,
}

/// Documentation for one option key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDoc {
    pub key: String,
    pub description: String,
    pub default: String,
}

impl From<&ConfigOption> for OptionDoc {
    fn from(option: &ConfigOption) -> Self {
        Self {
            key: option.key().to_string(),
            description: option.description().to_string(),
            default: option.default_value().to_string(),
        }
    }
}

/// Documentation for a registered generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDoc {
    pub id: String,
    pub description: Option<String>,
    /// The `<id>.enabled` switch first, then declared options.
    pub options: Vec<OptionDoc>,
}

/// Factory of generators keyed by id.
///
/// Registration order is the default run order.
///
/// # Example
///
/// ```
/// use aotgen_codegen::pipeline::GeneratorRegistry;
///
/// let registry = GeneratorRegistry::builtin();
/// let ids: Vec<_> = registry.ids().collect();
/// assert_eq!(ids, ["resources.inline", "known.missing.types", "components.eager"]);
/// ```
#[derive(Default)]
pub struct GeneratorRegistry {
    entries: IndexMap<String, Entry>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in generators.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(|| InlineResourcesGenerator);
        registry.insert(|| KnownMissingTypesGenerator);
        registry.insert(|| EagerComponentsGenerator);
        registry
    }

    /// Register a generator factory.
    ///
    /// The factory is called once to read the generator's id, description and
    /// options.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicateGenerator`] if the id is taken.
    pub fn register<G, F>(&mut self, factory: F) -> Result<()>
    where
        G: Generator + 'static,
        F: Fn() -> G + Send + Sync + 'static,
    {
        let (id, entry) = Self::entry(factory);
        if self.entries.contains_key(&id) {
            return Err(PipelineError::DuplicateGenerator { id }.into());
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    // Built-in ids are distinct, so no duplicate check.
    fn insert<G, F>(&mut self, factory: F)
    where
        G: Generator + 'static,
        F: Fn() -> G + Send + Sync + 'static,
    {
        let (id, entry) = Self::entry(factory);
        self.entries.insert(id, entry);
    }

    fn entry<G, F>(factory: F) -> (String, Entry)
    where
        G: Generator + 'static,
        F: Fn() -> G + Send + Sync + 'static,
    {
        let instance = factory();
        let entry = Entry {
            description: instance.description().map(str::to_string),
            options: instance.options().to_vec(),
            factory: Box::new(move || Box::new(factory()) as Box<dyn Generator>),
        };
        (instance.id().to_string(), entry)
    }

    /// Check if a generator id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Instantiate a generator by id.
    pub fn create(&self, id: &str) -> Option<Box<dyn Generator>> {
        self.entries.get(id).map(|entry| (entry.factory)())
    }

    /// Documentation for every registered generator.
    pub fn docs(&self) -> Vec<GeneratorDoc> {
        self.entries
            .iter()
            .map(|(id, entry)| {
                let enabled = OptionDoc {
                    key: format!("{}.enabled", id),
                    description: format!("Enable the '{}' generator", id),
                    default: "false".to_string(),
                };
                GeneratorDoc {
                    id: id.clone(),
                    description: entry.description.clone(),
                    options: std::iter::once(enabled)
                        .chain(entry.options.iter().map(OptionDoc::from))
                        .collect(),
                }
            })
            .collect()
    }

    /// Every option of every registered generator, enable switches included.
    pub fn options(&self) -> Vec<OptionDoc> {
        self.docs().into_iter().flat_map(|doc| doc.options).collect()
    }

    /// Instantiate the generators a run uses.
    ///
    /// With an explicit `order`, exactly those generators run in that order.
    /// Otherwise every generator whose `<id>.enabled` is true runs, in
    /// registration order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownGenerator`] for an id that is not
    /// registered, and an error if an enable switch is not a boolean.
    pub fn select(
        &self,
        configuration: &Configuration,
        order: Option<&[String]>,
    ) -> Result<Vec<Box<dyn Generator>>> {
        match order {
            Some(ids) => ids
                .iter()
                .map(|id| {
                    self.create(id)
                        .ok_or_else(|| PipelineError::UnknownGenerator { id: id.clone() }.into())
                })
                .collect(),
            None => {
                let mut selected = Vec::new();
                for (id, entry) in &self.entries {
                    if configuration.is_enabled(id)? {
                        selected.push((entry.factory)());
                    }
                }
                Ok(selected)
            }
        }
    }
}
